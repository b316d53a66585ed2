//! Single-file analysis: parse, then collect everything cacheable.

use std::path::Path;

use tree_sitter::Parser;

use crate::analysis::FileAnalysis;
use crate::error::CompilationError;
use crate::lang::Lang;
use crate::{module, syntax};

/// Parses `text` as `lang` and analyses it in isolation.
///
/// The result depends only on the text, so it can be cached under the file's
/// version token.
pub fn analyze(path: &Path, lang: Lang, text: &str) -> Result<FileAnalysis, CompilationError> {
    let mut parser = Parser::new();
    parser
        .set_language(&lang.tree_sitter_language())
        .map_err(|e| CompilationError::Language {
            lang: lang.name(),
            reason: e.to_string(),
        })?;
    let tree = parser
        .parse(text, None)
        .ok_or_else(|| CompilationError::Parse {
            path: path.to_path_buf(),
        })?;

    let mut diagnostics = syntax::collect(&tree, text);
    let info = module::extract(&tree, text);
    diagnostics.extend(info.diagnostics);
    diagnostics.sort_by_key(|d| (d.range.start, d.code));

    Ok(FileAnalysis {
        diagnostics,
        imports: info.imports,
        exports: info.exports,
        declared_modules: info.declared_modules,
    })
}
