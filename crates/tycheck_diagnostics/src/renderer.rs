//! Diagnostic rendering in the layout of `tsc --pretty` (without color).

use crate::diagnostic::Diagnostic;
use tycheck_source::{SourceDb, SourceFile, Span};

const GUTTER_SEPARATOR: &str = " ";
const ELLIPSIS: &str = "...";
const RELATED_INDENT: &str = "    ";
const RELATED_HALF_INDENT: &str = "  ";

/// Trait for rendering diagnostics into formatted output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String;

    /// Renders a list of diagnostics, concatenated in order.
    fn render_all(&self, diags: &[Diagnostic], source_db: &SourceDb) -> String {
        diags.iter().map(|d| self.render(d, source_db)).collect()
    }
}

/// Renders diagnostics the way the TypeScript compiler's pretty formatter does.
///
/// Produces output like:
/// ```text
/// src/App.tsx:4:9 - error TS1005: '>' expected.
///
/// 4         }
///           ~
/// ```
/// Related information is rendered as indented location + snippet blocks
/// followed by the label message.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrettyRenderer;

impl PrettyRenderer {
    /// Creates a new renderer.
    pub fn new() -> Self {
        Self
    }
}

impl DiagnosticRenderer for PrettyRenderer {
    fn render(&self, diag: &Diagnostic, source_db: &SourceDb) -> String {
        let mut out = String::new();

        if !diag.primary_span.is_dummy() {
            let resolved = source_db.resolve_span(diag.primary_span);
            out.push_str(&format!("{resolved} - "));
        }
        out.push_str(&format!("{} {}: {}", diag.severity, diag.code, diag.message));

        if !diag.primary_span.is_dummy() {
            out.push('\n');
            let file = source_db.get_file(diag.primary_span.file);
            out.push_str(&code_span(file, diag.primary_span, ""));
        }

        if !diag.labels.is_empty() {
            out.push('\n');
            for label in &diag.labels {
                if !label.span.is_dummy() {
                    let resolved = source_db.resolve_span(label.span);
                    let file = source_db.get_file(label.span.file);
                    out.push('\n');
                    out.push_str(RELATED_HALF_INDENT);
                    out.push_str(&resolved.to_string());
                    out.push_str(&code_span(file, label.span, RELATED_INDENT));
                }
                out.push('\n');
                out.push_str(RELATED_INDENT);
                out.push_str(&label.message);
            }
        }

        out.push('\n');
        out
    }
}

/// Formats the source lines covered by `span` with a gutter and a `~` underline.
///
/// Spans longer than five lines are elided in the middle.
fn code_span(file: &SourceFile, span: Span, indent: &str) -> String {
    let (first_line, first_col) = file.line_col(span.start);
    let (last_line, last_col) = file.line_col(span.end.max(span.start));
    let (first_col, last_col) = ((first_col - 1) as usize, (last_col - 1) as usize);

    let has_more_than_five_lines = last_line - first_line >= 4;
    let mut gutter_width = (last_line.to_string()).len();
    if has_more_than_five_lines {
        gutter_width = gutter_width.max(ELLIPSIS.len());
    }

    let mut context = String::new();
    let mut line = first_line;
    while line <= last_line {
        context.push('\n');
        if has_more_than_five_lines && first_line + 1 < line && line < last_line - 1 {
            context.push_str(&format!(
                "{indent}{ELLIPSIS:>gutter_width$}{GUTTER_SEPARATOR}\n"
            ));
            line = last_line - 1;
        }

        let content = file.line_text(line).trim_end().replace('\t', " ");
        let chars: Vec<char> = content.chars().collect();
        context.push_str(&format!(
            "{indent}{line:>gutter_width$}{GUTTER_SEPARATOR}{content}\n"
        ));
        context.push_str(&format!("{indent}{:>gutter_width$}{GUTTER_SEPARATOR}", ""));

        if line == first_line {
            let start = first_col.min(chars.len());
            let end = if line == last_line {
                last_col.min(chars.len())
            } else {
                chars.len()
            };
            let lead: String = chars[..start]
                .iter()
                .map(|c| if c.is_whitespace() { *c } else { ' ' })
                .collect();
            context.push_str(&lead);
            context.push_str(&"~".repeat(end.saturating_sub(start).max(1)));
        } else if line == last_line {
            context.push_str(&"~".repeat(last_col.min(chars.len())));
        } else {
            context.push_str(&"~".repeat(chars.len()));
        }
        line += 1;
    }
    context
}
