//! The result of one check call.

use serde::Serialize;

/// Rendered diagnostics, or nothing when no errors remain after filtering.
///
/// Serializes as `{"diagnostics": "..."}`, or `{}` when clean.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticsReport {
    /// Diagnostics in `tsc --pretty` layout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

impl DiagnosticsReport {
    /// A report without diagnostics.
    pub fn clean() -> Self {
        Self::default()
    }

    /// Returns `true` if no diagnostics were reported.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_serializes_empty() {
        let json = serde_json::to_string(&DiagnosticsReport::clean()).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn diagnostics_are_a_string_field() {
        let report = DiagnosticsReport {
            diagnostics: Some("src/A.tsx:1:1 - error TS1005: ';' expected.\n".into()),
        };
        let value: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert!(value["diagnostics"].as_str().unwrap().contains("TS1005"));
        assert!(!report.is_clean());
    }
}
