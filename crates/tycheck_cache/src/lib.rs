//! Persisted incremental build cache.
//!
//! The cache remembers, per source file, the version token the file had when
//! it was last analysed together with the analysis itself. A later pass reuses
//! the analysis of every file whose version token is unchanged. The whole
//! cache is stored as one checksummed binary artifact, which the session
//! treats as an opaque blob.

#![warn(missing_docs)]

pub mod artifact;
pub mod buildinfo;
pub mod cache;
pub mod changes;
pub mod error;

pub use buildinfo::{BuildInfo, FileRecord};
pub use cache::BuildCache;
pub use changes::ChangeSet;
pub use error::CacheError;
