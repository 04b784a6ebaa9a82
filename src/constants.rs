//! App-wide constants.
//!
//! Centralises the tool name, file names and environment variable names
//! so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "geomancy";

/// Crate version, shown by `--version`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// User settings file in the home directory.
pub const SETTINGS_FILENAME: &str = ".geomancerrc";

/// Checks files with this name keep their checks under `[tool.geomancy]`.
pub const PYPROJECT_FILENAME: &str = "pyproject.toml";

/// Table under `[tool]` holding checks in a `pyproject.toml`.
pub const PYPROJECT_TOOL_SECTION: &str = "geomancy";

/// Checks files searched when none are given on the command line.
pub const DEFAULT_CHECKS_PATHS: &[&str] = &[
    "pyproject.toml",
    ".geomancy.??ml",
    "geomancy.??ml",
    "geomancy.yml",
    ".geomancy.yml",
];

/// Extensions parsed as TOML.
pub const TOML_EXTS: &[&str] = &[".toml"];

/// Extensions parsed as YAML.
pub const YAML_EXTS: &[&str] = &[".yml", ".yaml"];

/// Top-level checks-file sections merged into the config instead of loaded as checks.
pub const CONFIG_SECTION_ALIASES: &[&str] = &["config", "Config"];

// ── Environment variable names ──────────────────────────────────────

pub const ENV_USE_COLOR: &str = "GEOMANCY_USE_COLOR";
pub const ENV_NO_COLOR: &str = "NO_COLOR";
pub const ENV_PATH: &str = "PATH";
