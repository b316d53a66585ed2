//! Diagnostic creation, severity management, and TypeScript-style rendering.
//!
//! This crate provides structured [`Diagnostic`] messages with a severity,
//! a numeric `TS` code, a primary span and related-information [`Label`]s.
//! The thread-safe [`DiagnosticSink`] accumulates diagnostics while files are
//! analysed in parallel, and [`PrettyRenderer`] formats them the way `tsc
//! --pretty` does (minus color) so they can be shown directly to users.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod label;
pub mod renderer;
pub mod severity;
pub mod sink;

pub use code::DiagnosticCode;
pub use diagnostic::Diagnostic;
pub use label::Label;
pub use renderer::{DiagnosticRenderer, PrettyRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
