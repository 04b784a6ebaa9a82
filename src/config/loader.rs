//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. `[config]` sections of checks files (see [`Config::update`])
//! 3. Environment variables
//! 4. `~/.geomancerrc`
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants;
use crate::env::Env;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config section: {0}")]
    InvalidSection(serde_json::Error),

    #[error("failed to render config as TOML: {0}")]
    RenderToml(#[from] toml::ser::Error),

    #[error("failed to render config as YAML: {0}")]
    RenderYaml(#[from] serde_yaml_ng::Error),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub cli: CliConfig,
    pub term: TermConfig,
    pub checks: ChecksConfig,
}

/// Checks file discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Paths (or glob patterns) searched when no checks files are given.
    pub checks_paths: Vec<String>,
    pub toml_exts: Vec<String>,
    pub yaml_exts: Vec<String>,
    /// Top-level checks-file sections treated as config.
    pub section_aliases: Vec<String>,
}

impl Default for CliConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            checks_paths: owned(constants::DEFAULT_CHECKS_PATHS),
            toml_exts: owned(constants::TOML_EXTS),
            yaml_exts: owned(constants::YAML_EXTS),
            section_aliases: owned(constants::CONFIG_SECTION_ALIASES),
        }
    }
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    pub use_color: bool,
    /// Indent nested checks by their depth.
    pub use_level: bool,
    /// Maximum width of heading rules.
    pub max_width: usize,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            use_color: true,
            use_level: true,
            max_width: 80,
        }
    }
}

/// Message templates for check results. `{name}` is replaced by the
/// checked value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecksConfig {
    pub env_msg: String,
    pub exec_msg: String,
    pub path_msg: String,
    pub platform_msg: String,
}

impl Default for ChecksConfig {
    fn default() -> Self {
        Self {
            env_msg: "Check environment variable '{name}'".to_string(),
            exec_msg: "Check executable '{name}'".to_string(),
            path_msg: "Check path '{name}'".to_string(),
            platform_msg: "Check platform '{name}'".to_string(),
        }
    }
}

/// Wrapper so printed config can be pasted into a checks file as-is.
#[derive(Serialize)]
struct ConfigDocument<'a> {
    config: &'a Config,
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads `~/.geomancerrc` when present, then applies environment
    /// variable overrides.
    pub fn load(env: &Env) -> Result<Self, ConfigError> {
        Self::load_from(Self::settings_path().as_deref(), env)
    }

    /// Load configuration from an explicit settings file.
    pub fn load_from(settings: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(path) = settings {
            if path.exists() {
                let section = Self::load_file(path)?;
                config.update(&section)?;
                debug!("loaded settings from {}", path.display());
            }
        }

        config.apply_env_vars(env);

        Ok(config)
    }

    /// Read a TOML settings file as a partial config.
    fn load_file(path: &Path) -> Result<serde_json::Value, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the user settings file path.
    fn settings_path() -> Option<PathBuf> {
        dirs::home_dir().map(|d| d.join(constants::SETTINGS_FILENAME))
    }

    /// Merge a partial config into this one.
    ///
    /// `section` mirrors the config layout (e.g. `{"term": {"use_color":
    /// false}}`). Keys are matched case-insensitively, nested tables are
    /// merged recursively, and any other value replaces the current one.
    pub fn update(&mut self, section: &serde_json::Value) -> Result<(), ConfigError> {
        let mut current = serde_json::to_value(&*self).map_err(ConfigError::InvalidSection)?;
        merge_values(&mut current, section);
        *self = serde_json::from_value(current).map_err(ConfigError::InvalidSection)?;
        Ok(())
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_USE_COLOR) {
            match val.to_lowercase().as_str() {
                "false" | "0" | "no" | "off" => self.term.use_color = false,
                "true" | "1" | "yes" | "on" => self.term.use_color = true,
                _ => warn!("ignoring invalid {} value: {val}", constants::ENV_USE_COLOR),
            }
        }
        if env.var(constants::ENV_NO_COLOR).is_ok_and(|v| !v.is_empty()) {
            self.term.use_color = false;
        }
    }

    /// Render the config as TOML under a `config` table.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(&ConfigDocument { config: self })?)
    }

    /// Render the config as YAML under a `config` key.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(&ConfigDocument { config: self })?)
    }
}

/// Recursively merge `patch` into `base`, lowercasing the patch's keys.
fn merge_values(base: &mut serde_json::Value, patch: &serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                let key = key.to_lowercase();
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}
