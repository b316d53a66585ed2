//! A focused TypeScript/TSX checker built on tree-sitter.
//!
//! [`Program`] discovers the files of a project through a
//! [`CompilerHost`](tycheck_overlay::CompilerHost), analyses each file once per
//! version token (syntax errors plus an import/export summary), and checks the
//! import graph across files on every pass. Per-file analyses live in a
//! [`BuildCache`](tycheck_cache::BuildCache) that can be persisted between
//! processes.

#![warn(missing_docs)]

pub mod analysis;
pub mod error;
pub mod lang;
pub mod module;
pub mod parse;
pub mod program;
pub mod resolve;
pub mod semantic;
pub mod syntax;

pub use analysis::{ByteRange, CachedDiagnostic, FileAnalysis};
pub use error::CompilationError;
pub use lang::Lang;
pub use program::{CheckOutput, PassStats, Program};
pub use resolve::{Resolution, Resolver};
