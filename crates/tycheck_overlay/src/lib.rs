//! In-memory overlay of pending file edits layered over a project tree.
//!
//! [`OverlayStore`] records create/update/delete/move edits without touching
//! disk and answers existence, content, version, and directory queries
//! consistently with the edits applied so far. [`OverlayHost`] exposes those
//! answers to the checker through the [`CompilerHost`] trait, decorating a
//! [`DiskHost`] that serves every path the overlay does not know about.

#![warn(missing_docs)]

pub mod edit;
pub mod error;
pub mod host;
pub mod store;

pub use edit::{Edit, EditBatch, EditKind, RawEdit};
pub use error::{DiskReadError, InvalidEditError};
pub use host::{CompilerHost, DiskHost, OverlayHost};
pub use store::OverlayStore;
