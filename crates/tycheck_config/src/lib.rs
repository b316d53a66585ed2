//! Parsing and validation of `tycheck.toml` project configuration files.
//!
//! The configuration plays the role a `tsconfig` plays for the TypeScript
//! compiler: which directories hold the program's root files, how module
//! specifiers are aliased, which ambient module patterns are declared, and
//! how the session filters and rewrites diagnostics. A project without a
//! `tycheck.toml` gets [`ProjectConfig::default`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
