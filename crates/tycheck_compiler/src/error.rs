//! Fatal checker failures.

use std::path::PathBuf;

use tycheck_config::ConfigError;

/// A failure that aborts a whole check pass.
#[derive(Debug, thiserror::Error)]
pub enum CompilationError {
    /// The project configuration could not be loaded.
    #[error("invalid project configuration: {0}")]
    Config(#[from] ConfigError),

    /// The project root does not exist or is not a directory.
    #[error("project root {0} is not a directory")]
    MissingRoot(PathBuf),

    /// A tree-sitter grammar could not be loaded.
    #[error("failed to load {lang} grammar: {reason}")]
    Language {
        /// Language name.
        lang: &'static str,
        /// Loader message.
        reason: String,
    },

    /// The parser produced no tree for a file.
    #[error("parser produced no tree for {path}")]
    Parse {
        /// The file being parsed.
        path: PathBuf,
    },
}
