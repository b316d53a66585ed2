//! The program session: apply a batch of virtual edits, check, report.
//!
//! A [`Session`] owns the overlay of pending edits and, once initialized, the
//! incremental [`Program`](tycheck_compiler::Program). Each
//! [`check`](Session::check) validates and applies a batch, runs one
//! diagnostic pass through an overlay-aware host, filters and renders the
//! surviving errors, and persists the build cache. [`SharedSession`]
//! serializes calls from several threads.

#![warn(missing_docs)]

pub mod error;
pub mod filter;
pub mod report;
pub mod session;
pub mod shared;

pub use error::CheckError;
pub use filter::DiagnosticFilter;
pub use report::DiagnosticsReport;
pub use session::{Session, SessionState};
pub use shared::SharedSession;
