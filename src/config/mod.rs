//! Configuration loading and layering.
//!
//! Handles `~/.geomancerrc` loading, environment variable overrides, and
//! merging of `[config]` sections found in checks files.

pub mod loader;

pub use loader::{ChecksConfig, CliConfig, Config, ConfigError, TermConfig};
