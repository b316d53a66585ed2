//! Source file representation with line-start indexing for fast line/column lookup.

use crate::file_id::FileId;
use tycheck_common::ContentHash;

/// A source file registered for diagnostic rendering.
///
/// Stores the text together with precomputed line-start offsets so that
/// rendering many diagnostics against one file stays cheap.
pub struct SourceFile {
    /// The identifier of this file within its [`SourceDb`](crate::SourceDb).
    pub id: FileId,
    /// The name shown to users (project-relative, `/`-separated).
    pub name: String,
    /// The full text content of the file.
    pub content: String,
    /// Byte offsets of each line start (the first entry is always 0).
    line_starts: Vec<u32>,
    /// Hash of the file content.
    pub content_hash: ContentHash,
}

impl SourceFile {
    /// Creates a new `SourceFile` with precomputed line starts and content hash.
    pub fn new(id: FileId, name: String, content: String) -> Self {
        let line_starts = compute_line_starts(&content);
        let content_hash = ContentHash::from_text(&content);
        Self {
            id,
            name,
            content,
            line_starts,
            content_hash,
        }
    }

    /// Converts a byte offset into 1-indexed (line, column) coordinates.
    ///
    /// Columns count characters, not bytes. Offsets past the end clamp to the
    /// end of the file; offsets inside a multi-byte character clamp to its start.
    pub fn line_col(&self, byte_offset: u32) -> (u32, u32) {
        let offset = self.clamp_offset(byte_offset);
        let line_idx = self.line_index(offset);
        let line_start = self.line_starts[line_idx] as usize;
        let col = self.content[line_start..offset as usize].chars().count() as u32 + 1;
        (line_idx as u32 + 1, col)
    }

    /// Returns the number of lines in the file.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Returns the text of a 1-indexed line, without its line terminator.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line.max(1) - 1) as usize;
        let Some(&start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .map_or(self.content.len(), |&next| next as usize);
        self.content[start as usize..end].trim_end_matches(['\n', '\r'])
    }

    /// Returns a substring of the file content between byte offsets.
    pub fn snippet(&self, start: u32, end: u32) -> &str {
        let start = self.clamp_offset(start) as usize;
        let end = self.clamp_offset(end) as usize;
        &self.content[start..end.max(start)]
    }

    fn line_index(&self, offset: u32) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        }
    }

    fn clamp_offset(&self, byte_offset: u32) -> u32 {
        let mut offset = (byte_offset as usize).min(self.content.len());
        while !self.content.is_char_boundary(offset) {
            offset -= 1;
        }
        offset as u32
    }
}

/// Computes the byte offsets of each line start in the given content.
fn compute_line_starts(content: &str) -> Vec<u32> {
    let mut starts = vec![0u32];
    for (i, byte) in content.bytes().enumerate() {
        if byte == b'\n' {
            starts.push((i + 1) as u32);
        }
    }
    starts
}
