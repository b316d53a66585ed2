//! Database of the source texts referenced by one diagnostic report.

use crate::file_id::FileId;
use crate::resolved_span::ResolvedSpan;
use crate::source_file::SourceFile;
use crate::span::Span;

/// Owns the text of every file a report points into and resolves
/// [`FileId`] + byte offsets to line/column coordinates.
///
/// Texts are registered by the caller (the compiler reads them through its
/// host, which may serve overlay content rather than disk content), so the
/// database itself never touches the filesystem.
pub struct SourceDb {
    files: Vec<SourceFile>,
}

impl SourceDb {
    /// Creates an empty source database.
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Registers source text under a display name and returns its [`FileId`].
    pub fn add_source(&mut self, name: impl Into<String>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        self.files.push(SourceFile::new(id, name.into(), content));
        id
    }

    /// Returns the [`SourceFile`] for the given [`FileId`].
    ///
    /// # Panics
    ///
    /// Panics if the `FileId` was not issued by this database.
    pub fn get_file(&self, id: FileId) -> &SourceFile {
        &self.files[id.as_raw() as usize]
    }

    /// Replaces every display name with `rename(name)`. Texts are untouched.
    pub fn rename_files(&mut self, mut rename: impl FnMut(&str) -> String) {
        for file in &mut self.files {
            file.name = rename(&file.name);
        }
    }

    /// Returns the number of registered files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no files are registered.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Resolves a [`Span`] to human-readable line/column coordinates.
    pub fn resolve_span(&self, span: Span) -> ResolvedSpan {
        let file = self.get_file(span.file);
        let (start_line, start_col) = file.line_col(span.start);
        let (end_line, end_col) = file.line_col(span.end.max(span.start));
        ResolvedSpan {
            file_name: file.name.clone(),
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    /// Returns the source text corresponding to a [`Span`].
    pub fn snippet(&self, span: Span) -> &str {
        self.get_file(span.file).snippet(span.start, span.end)
    }
}

impl Default for SourceDb {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_get() {
        let mut db = SourceDb::new();
        let id = db.add_source("src/App.tsx", "hello world".to_string());
        assert_eq!(db.get_file(id).content, "hello world");
        assert_eq!(db.get_file(id).name, "src/App.tsx");
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn resolve_span() {
        let mut db = SourceDb::new();
        let id = db.add_source("src/a.ts", "abc\ndef\nghi".to_string());
        let resolved = db.resolve_span(Span::new(id, 4, 7));
        assert_eq!(resolved.file_name, "src/a.ts");
        assert_eq!((resolved.start_line, resolved.start_col), (2, 1));
        assert_eq!((resolved.end_line, resolved.end_col), (2, 4));
    }

    #[test]
    fn snippet() {
        let mut db = SourceDb::new();
        let id = db.add_source("a.ts", "hello world".to_string());
        assert_eq!(db.snippet(Span::new(id, 0, 5)), "hello");
    }

    #[test]
    fn rename_keeps_content() {
        let mut db = SourceDb::new();
        let id = db.add_source("src/gen/a.ts", "x".to_string());
        db.rename_files(|name| name.replace("src/gen", "@gen"));
        assert_eq!(db.get_file(id).name, "@gen/a.ts");
        assert_eq!(db.get_file(id).content, "x");
    }

    #[test]
    fn multiple_files() {
        let mut db = SourceDb::new();
        let a = db.add_source("a.ts", "one".to_string());
        let b = db.add_source("b.ts", "two".to_string());
        assert_ne!(a, b);
        assert_eq!(db.get_file(b).content, "two");
    }
}
