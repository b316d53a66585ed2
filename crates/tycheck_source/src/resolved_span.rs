//! Human-readable resolved source locations.

use std::fmt;

/// A span resolved to 1-based line/column coordinates.
///
/// `file_name` is the display name the file was registered under (usually a
/// project-relative path with `/` separators). Produced by
/// [`SourceDb::resolve_span`](crate::SourceDb::resolve_span).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// Display name of the source file.
    pub file_name: String,
    /// The starting line number (1-indexed).
    pub start_line: u32,
    /// The starting column number (1-indexed, in characters).
    pub start_col: u32,
    /// The ending line number (1-indexed).
    pub end_line: u32,
    /// The ending column number (1-indexed, in characters, exclusive).
    pub end_col: u32,
}

impl fmt::Display for ResolvedSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file_name, self.start_line, self.start_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_shows_start_only() {
        let rs = ResolvedSpan {
            file_name: "src/App.tsx".to_string(),
            start_line: 4,
            start_col: 9,
            end_line: 6,
            end_col: 2,
        };
        assert_eq!(rs.to_string(), "src/App.tsx:4:9");
    }
}
