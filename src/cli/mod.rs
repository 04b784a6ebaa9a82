//! CLI command definitions and argument parsing.
//!
//! Uses clap derive macros for ergonomic argument definitions.

pub mod args;

/// One-line description shown at the top of `--help`.
pub const ABOUT: &str =
    "Load dotenv files and validate the environment against TOML or YAML checks files.";
