//! Which diagnostics reach the user, and how internal paths are shown.

use std::path::Path;

use regex::{Captures, Regex};
use tycheck_config::DiagnosticsConfig;
use tycheck_diagnostics::Diagnostic;
use tycheck_source::SourceDb;

/// Drops diagnostics that are never actionable and hides internal paths.
///
/// A diagnostic survives if it is an error, its file is neither under the
/// internal directory nor inside a `node_modules` directory, and its message
/// contains none of the ignored substrings.
#[derive(Debug, Clone)]
pub struct DiagnosticFilter {
    internal_dir: String,
    internal_alias: String,
    ignore_messages: Vec<String>,
    internal_path: Regex,
}

impl DiagnosticFilter {
    /// Builds the filter for the project at `root`.
    pub fn new(root: &Path, config: &DiagnosticsConfig) -> Result<Self, regex::Error> {
        let internal_dir = config.internal_dir.trim_matches('/').replace('\\', "/");
        let root = root.to_string_lossy().replace('\\', "/");
        let pattern = format!(
            r#"(?:{}/)?{}/([^/\\\s'"():]+)"#,
            regex::escape(root.trim_end_matches('/')),
            regex::escape(&internal_dir)
        );
        Ok(Self {
            internal_dir,
            internal_alias: config.internal_alias.trim_end_matches('/').to_string(),
            ignore_messages: config.ignore_messages.clone(),
            internal_path: Regex::new(&pattern)?,
        })
    }

    /// Returns `true` if `diag` should be reported.
    pub fn keeps(&self, diag: &Diagnostic, sources: &SourceDb) -> bool {
        if !diag.severity.is_error() {
            return false;
        }
        if !diag.primary_span.is_dummy() {
            let name = &sources.get_file(diag.primary_span.file).name;
            if self.is_hidden_file(name) {
                return false;
            }
        }
        !self
            .ignore_messages
            .iter()
            .any(|needle| diag.message.contains(needle.as_str()))
    }

    /// Keeps the reportable diagnostics, in order, with internal paths in
    /// their messages rewritten.
    pub fn apply(&self, diags: Vec<Diagnostic>, sources: &SourceDb) -> Vec<Diagnostic> {
        diags
            .into_iter()
            .filter(|d| self.keeps(d, sources))
            .map(|mut d| {
                d.message = self.rewrite(&d.message);
                for label in &mut d.labels {
                    label.message = self.rewrite(&label.message);
                }
                d
            })
            .collect()
    }

    /// Rewrites internal paths in the file names shown on location lines.
    ///
    /// Source text is left alone so snippets and underlines stay aligned.
    pub fn rewrite_sources(&self, sources: &mut SourceDb) {
        sources.rename_files(|name| self.rewrite(name));
    }

    /// Replaces `<root>/<internal_dir>/<name>[.ts|.tsx|.d.ts]` with
    /// `<alias>/<name>` throughout `text`.
    pub fn rewrite(&self, text: &str) -> String {
        self.internal_path
            .replace_all(text, |caps: &Captures<'_>| {
                let name = &caps[1];
                let name = [".d.ts", ".tsx", ".ts"]
                    .iter()
                    .find_map(|ext| name.strip_suffix(ext))
                    .unwrap_or(name);
                format!("{}/{}", self.internal_alias, name)
            })
            .into_owned()
    }

    fn is_hidden_file(&self, name: &str) -> bool {
        let name = name.replace('\\', "/");
        let internal = name == self.internal_dir
            || name
                .strip_prefix(self.internal_dir.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
            || name.contains(&format!("/{}/", self.internal_dir));
        internal || name.split('/').any(|part| part == "node_modules")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tycheck_diagnostics::{DiagnosticCode, Label};
    use tycheck_source::Span;

    fn filter() -> DiagnosticFilter {
        DiagnosticFilter::new(Path::new("/work/app"), &DiagnosticsConfig::default()).unwrap()
    }

    fn error_in(db: &mut SourceDb, file: &str, message: &str) -> Diagnostic {
        let id = db.add_source(file, "let a = 1;\n".to_string());
        Diagnostic::error(DiagnosticCode::TOKEN_EXPECTED, message, Span::new(id, 0, 3))
    }

    #[test]
    fn keeps_ordinary_errors() {
        let mut db = SourceDb::new();
        let diag = error_in(&mut db, "src/App.tsx", "';' expected.");
        assert!(filter().keeps(&diag, &db));
    }

    #[test]
    fn drops_internal_and_vendored_files() {
        let mut db = SourceDb::new();
        let internal = error_in(&mut db, "src/__internal__/runtime.ts", "x");
        let vendored = error_in(&mut db, "node_modules/react/index.d.ts", "x");
        let nested = error_in(&mut db, "packages/ui/node_modules/x/a.ts", "x");
        let f = filter();
        assert!(!f.keeps(&internal, &db));
        assert!(!f.keeps(&vendored, &db));
        assert!(!f.keeps(&nested, &db));
    }

    #[test]
    fn similar_names_are_not_internal() {
        let mut db = SourceDb::new();
        let diag = error_in(&mut db, "src/__internal__x/a.ts", "x");
        assert!(filter().keeps(&diag, &db));
    }

    #[test]
    fn drops_ignored_messages_and_non_errors() {
        let mut db = SourceDb::new();
        let css = error_in(
            &mut db,
            "src/main.tsx",
            "Cannot find module './index.css' or its corresponding type declarations.",
        );
        let id = db.add_source("src/b.ts", "require('x')".to_string());
        let suggestion = Diagnostic::suggestion(
            DiagnosticCode::REQUIRE_TO_IMPORT,
            "'require' call may be converted to an import.",
            Span::new(id, 0, 12),
        );
        let f = filter();
        assert!(!f.keeps(&css, &db));
        assert!(!f.keeps(&suggestion, &db));
        assert!(f.apply(vec![css, suggestion], &db).is_empty());
    }

    #[test]
    fn rewrites_internal_paths() {
        let f = filter();
        assert_eq!(
            f.rewrite("Cannot find module '/work/app/src/__internal__/runtime.ts'."),
            "Cannot find module '@internal/runtime'."
        );
        assert_eq!(
            f.rewrite("src/__internal__/db.d.ts:3:1 - error"),
            "@internal/db:3:1 - error"
        );
        assert_eq!(f.rewrite("src/App.tsx:1:1"), "src/App.tsx:1:1");
    }

    #[test]
    fn rewrites_messages_but_not_source_text() {
        let mut db = SourceDb::new();
        let text = "import { y } from '../__internal__/sdk';\n";
        let id = db.add_source("src/App.tsx", text.to_string());
        let related = db.add_source("src/__internal__/sdk.ts", "export {};\n".to_string());
        let diag = Diagnostic::error(
            DiagnosticCode::NO_EXPORTED_MEMBER,
            "Module '\"src/__internal__/sdk.ts\"' has no exported member 'y'.",
            Span::new(id, 9, 10),
        )
        .with_label(Label::new(Span::new(related, 0, 6), "see src/__internal__/sdk.ts"));

        let f = filter();
        let kept = f.apply(vec![diag], &db);
        assert_eq!(kept[0].message, "Module '\"@internal/sdk\"' has no exported member 'y'.");
        assert_eq!(kept[0].labels[0].message, "see @internal/sdk");

        f.rewrite_sources(&mut db);
        assert_eq!(db.get_file(id).name, "src/App.tsx");
        assert_eq!(db.get_file(id).content, text);
        assert_eq!(db.get_file(related).name, "@internal/sdk");
    }

    #[test]
    fn custom_alias() {
        let config = DiagnosticsConfig {
            internal_dir: "src/__zite__".into(),
            internal_alias: "@zite".into(),
            ignore_messages: Vec::new(),
        };
        let f = DiagnosticFilter::new(Path::new("/p"), &config).unwrap();
        assert_eq!(f.rewrite("see /p/src/__zite__/client.tsx"), "see @zite/client");
    }
}
