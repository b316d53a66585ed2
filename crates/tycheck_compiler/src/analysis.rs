//! Per-file analysis results, stored in the build cache.
//!
//! Everything here is position-addressed by byte offsets into the file text
//! the analysis was computed from, so it stays valid across processes for as
//! long as the file keeps its version token.

use serde::{Deserialize, Serialize};
use tycheck_diagnostics::{Diagnostic, DiagnosticCode, Label, Severity};
use tycheck_source::{FileId, Span};

/// A half-open byte range within one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteRange {
    /// Inclusive start offset.
    pub start: u32,
    /// Exclusive end offset.
    pub end: u32,
}

impl ByteRange {
    /// Creates a range.
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Covers a tree-sitter node.
    pub fn of_node(node: tree_sitter::Node<'_>) -> Self {
        Self::new(node.start_byte() as u32, node.end_byte() as u32)
    }

    /// Places the range in a file.
    pub fn in_file(self, file: FileId) -> Span {
        Span::new(file, self.start, self.end)
    }
}

/// A diagnostic whose location is a byte range in the file that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedDiagnostic {
    /// Severity.
    pub severity: Severity,
    /// TypeScript diagnostic code.
    pub code: DiagnosticCode,
    /// Message text.
    pub message: String,
    /// Primary location.
    pub range: ByteRange,
    /// Related information in the same file.
    pub related: Vec<(ByteRange, String)>,
}

impl CachedDiagnostic {
    /// An error at `range`.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, range: ByteRange) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            range,
            related: Vec::new(),
        }
    }

    /// A suggestion at `range`.
    pub fn suggestion(code: DiagnosticCode, message: impl Into<String>, range: ByteRange) -> Self {
        Self {
            severity: Severity::Suggestion,
            ..Self::error(code, message, range)
        }
    }

    /// Adds related information.
    pub fn with_related(mut self, range: ByteRange, message: impl Into<String>) -> Self {
        self.related.push((range, message.into()));
        self
    }

    /// Converts into a [`Diagnostic`] located in `file`.
    pub fn to_diagnostic(&self, file: FileId) -> Diagnostic {
        let mut diag = Diagnostic::new(
            self.severity,
            self.code,
            self.message.clone(),
            self.range.in_file(file),
        );
        for (range, message) in &self.related {
            diag = diag.with_label(Label::new(range.in_file(file), message.clone()));
        }
        diag
    }
}

/// How a module specifier entered the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportKind {
    /// `import ... from "x"` or `import "x"`.
    Static,
    /// `export ... from "x"`.
    ReExport,
    /// `import("x")`.
    Dynamic,
    /// `import x = require("x")`.
    RequireAlias,
}

/// A binding imported by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedBinding {
    /// Name as exported by the target module.
    pub name: String,
    /// Location of the name.
    pub range: ByteRange,
}

/// One module specifier occurrence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRecord {
    /// The specifier text, without quotes.
    pub specifier: String,
    /// Location of the string literal, quotes included.
    pub range: ByteRange,
    /// How the specifier was used.
    pub kind: ImportKind,
    /// Location of the default binding, if the target's default export is used.
    pub default_binding: Option<ByteRange>,
    /// Names taken from the target's exports.
    pub named: Vec<NamedBinding>,
    /// `export * from "x"`: every export of the target is re-exported.
    pub star: bool,
}

impl ImportRecord {
    /// A record that only references the module.
    pub fn bare(specifier: impl Into<String>, range: ByteRange, kind: ImportKind) -> Self {
        Self {
            specifier: specifier.into(),
            range,
            kind,
            default_binding: None,
            named: Vec::new(),
            star: false,
        }
    }
}

/// What a module exports, as far as can be seen without type information.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    /// Names exported directly (declarations, clauses, `* as ns`).
    pub names: Vec<String>,
    /// The module has a default export.
    pub has_default: bool,
    /// The module uses `export =`; its shape is opaque.
    pub export_assignment: bool,
}

/// Everything the checker learns from one file in isolation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAnalysis {
    /// Syntax diagnostics plus per-file checks.
    pub diagnostics: Vec<CachedDiagnostic>,
    /// Module specifiers referenced by the file, in source order.
    pub imports: Vec<ImportRecord>,
    /// The file's exports.
    pub exports: ExportSummary,
    /// `declare module "name"` declarations (exact names or `*` patterns).
    pub declared_modules: Vec<String>,
}
