//! Shared foundational types used across the tycheck workspace.
//!
//! This crate provides content hashing, the three-tier [`VersionToken`] used
//! to decide whether a file must be re-analysed, and lexical path helpers
//! shared by the overlay, the compiler, and the session.

#![warn(missing_docs)]

pub mod hash;
pub mod path;
pub mod version;

pub use hash::ContentHash;
pub use path::{display_relative, is_within, normalize_path, resolve_against};
pub use version::VersionToken;
