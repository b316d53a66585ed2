//! Error types for edit validation and disk access.

use std::path::PathBuf;

use crate::edit::EditKind;

/// An edit in a batch is missing a field its type requires.
///
/// Raised while validating a batch, before any edit in it is applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid edit at index {index}: '{kind}' requires '{field}'")]
pub struct InvalidEditError {
    /// Position of the offending edit in its batch.
    pub index: usize,
    /// The edit's type.
    pub kind: EditKind,
    /// Wire name of the missing or empty field.
    pub field: &'static str,
}

/// A disk read or stat failed.
///
/// Never escapes the host: callers see absent content or a default version
/// token instead.
#[derive(Debug, thiserror::Error)]
pub enum DiskReadError {
    /// Reading a file's content failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Reading a file's metadata failed.
    #[error("failed to stat {path}: {source}")]
    Stat {
        /// The file being inspected.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl DiskReadError {
    /// Returns `true` if the failure only means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        let source = match self {
            DiskReadError::Read { source, .. } | DiskReadError::Stat { source, .. } => source,
        };
        source.kind() == std::io::ErrorKind::NotFound
    }
}
