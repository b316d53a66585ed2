//! Version tokens that tell the compiler whether a file needs re-analysis.

use crate::hash::ContentHash;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// An opaque per-file version identifier.
///
/// Tokens come in three tiers, strongest first:
/// - [`Content`](VersionToken::Content) for text held in the in-memory overlay,
/// - [`Modified`](VersionToken::Modified) for untouched files on disk,
/// - [`Default`](VersionToken::Default) when the disk could not be queried.
///
/// The compiler only compares tokens for equality; a cached analysis is reused
/// iff the token it was computed under equals the current one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum VersionToken {
    /// Hash of the overlay content.
    Content(ContentHash),
    /// Disk modification time in nanoseconds since the Unix epoch.
    Modified(u128),
    /// Constant fallback for files whose metadata could not be read.
    Default,
}

impl VersionToken {
    /// Derives a token from in-memory text.
    pub fn of_content(text: &str) -> Self {
        VersionToken::Content(ContentHash::from_text(text))
    }

    /// Derives a token from a filesystem modification time.
    ///
    /// Times before the Unix epoch collapse to [`VersionToken::Default`].
    pub fn of_mtime(mtime: SystemTime) -> Self {
        match mtime.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => VersionToken::Modified(elapsed.as_nanos()),
            Err(_) => VersionToken::Default,
        }
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionToken::Content(hash) => write!(f, "{hash}"),
            VersionToken::Modified(nanos) => write!(f, "{nanos}"),
            VersionToken::Default => write!(f, "1"),
        }
    }
}
