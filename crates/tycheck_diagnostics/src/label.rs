//! Related-information labels attached to a diagnostic.

use serde::{Deserialize, Serialize};
use tycheck_source::Span;

/// A secondary source location that explains a diagnostic, rendered
/// beneath the primary snippet (e.g. "The parser expected to find a
/// '</div>' to match the '<div>' token here.").
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// The source span this label annotates.
    pub span: Span,
    /// The explanatory message.
    pub message: String,
}

impl Label {
    /// Creates a label for the given span.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }
}
