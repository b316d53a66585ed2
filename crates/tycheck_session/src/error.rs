//! Errors surfaced by [`Session::check`](crate::Session::check).

use tycheck_compiler::CompilationError;
use tycheck_overlay::InvalidEditError;

/// Why a check call failed.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    /// The batch was rejected before anything was applied.
    #[error(transparent)]
    InvalidEdit(#[from] InvalidEditError),

    /// The checker could not be set up or failed during the pass. Edits
    /// already applied stay applied.
    #[error(transparent)]
    Compilation(#[from] CompilationError),

    /// The configured internal directory does not yield a usable rewrite
    /// pattern.
    #[error("invalid diagnostics filter: {0}")]
    Filter(#[from] regex::Error),
}
