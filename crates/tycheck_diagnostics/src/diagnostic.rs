//! Structured diagnostic messages with severity, codes, and related information.

use crate::code::DiagnosticCode;
use crate::label::Label;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};
use tycheck_source::Span;

/// A structured diagnostic with a primary source location and optional
/// related-information labels.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The `TS` code identifying the kind of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The primary source span where the issue was detected.
    pub primary_span: Span,
    /// Related locations rendered beneath the primary snippet.
    pub labels: Vec<Label>,
}

impl Diagnostic {
    /// Creates a diagnostic with an explicit severity.
    pub fn new(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span: span,
            labels: Vec::new(),
        }
    }

    /// Creates a new error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Error, code, message, span)
    }

    /// Creates a new suggestion diagnostic.
    pub fn suggestion(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::new(Severity::Suggestion, code, message, span)
    }

    /// Adds a related-information label to this diagnostic.
    pub fn with_label(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_error() {
        let diag = Diagnostic::error(DiagnosticCode::TOKEN_EXPECTED, "'>' expected.", Span::DUMMY);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "'>' expected.");
        assert_eq!(diag.code.to_string(), "TS1005");
    }

    #[test]
    fn create_suggestion() {
        let diag = Diagnostic::suggestion(
            DiagnosticCode::REQUIRE_TO_IMPORT,
            "'require' call may be converted to an import.",
            Span::DUMMY,
        );
        assert_eq!(diag.severity, Severity::Suggestion);
        assert!(!diag.severity.is_error());
    }

    #[test]
    fn labels_accumulate() {
        let diag = Diagnostic::error(DiagnosticCode::JSX_CLOSING_TAG_MISMATCH, "m", Span::DUMMY)
            .with_label(Label::new(Span::DUMMY, "opened here"));
        assert_eq!(diag.labels.len(), 1);
    }
}
