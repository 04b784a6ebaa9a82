//! Environment variable abstraction for testability.
//!
//! Production code uses [`Env::real()`] which delegates to [`std::env::var`]
//! and [`std::env::set_var`]. Tests use [`Env::from_vars()`] backed by a
//! `HashMap`, so dotenv parsing and loading can be exercised without
//! touching the process environment.

use std::collections::HashMap;

use thiserror::Error;

/// Errors when writing an environment variable.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum EnvError {
    #[error("invalid environment variable name '{0}'")]
    InvalidName(String),

    #[error("value of environment variable '{0}' contains a NUL byte")]
    NulInValue(String),
}

/// Environment variable reader and writer.
///
/// Passed explicitly through the dotenv parser, resolver and loader so the
/// live environment is a named input rather than hidden global state.
#[derive(Clone, Debug)]
pub struct Env {
    overrides: Option<HashMap<String, String>>,
}

impl Env {
    /// Create an `Env` that reads from and writes to the real process environment.
    pub fn real() -> Self {
        Self { overrides: None }
    }

    /// Create an `Env` backed by explicit key-value pairs.
    pub fn from_vars(vars: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        Self {
            overrides: Some(
                vars.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Create an empty in-memory `Env`.
    pub fn empty() -> Self {
        Self {
            overrides: Some(HashMap::new()),
        }
    }

    /// Look up an environment variable by name.
    ///
    /// A value that is not valid unicode is converted lossily, so every
    /// variable [`Env::is_set`] reports can also be read.
    pub fn var(&self, name: &str) -> Result<String, std::env::VarError> {
        match &self.overrides {
            Some(map) => map.get(name).cloned().ok_or(std::env::VarError::NotPresent),
            None => std::env::var_os(name)
                .map(|value| value.to_string_lossy().into_owned())
                .ok_or(std::env::VarError::NotPresent),
        }
    }

    /// Returns `true` if the variable is present (possibly empty).
    pub fn is_set(&self, name: &str) -> bool {
        match &self.overrides {
            Some(map) => map.contains_key(name),
            None => std::env::var_os(name).is_some(),
        }
    }

    /// Set an environment variable.
    ///
    /// For the real environment this mutates the process-wide table, so
    /// callers must not race it from several threads. Names that are empty
    /// or contain `=` or NUL, and values containing NUL, are rejected for
    /// both backends.
    pub fn set_var(&mut self, name: &str, value: &str) -> Result<(), EnvError> {
        if name.is_empty() || name.contains(['=', '\0']) {
            return Err(EnvError::InvalidName(name.to_string()));
        }
        if value.contains('\0') {
            return Err(EnvError::NulInValue(name.to_string()));
        }
        match &mut self.overrides {
            Some(map) => {
                map.insert(name.to_string(), value.to_string());
            }
            // SAFETY: the loader is single-threaded and documents that
            // concurrent calls need external synchronization.
            None => unsafe { std::env::set_var(name, value) },
        }
        Ok(())
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::real()
    }
}
