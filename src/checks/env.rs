//! Environment variable checks.

use regex::Regex;

use super::Evaluation;
use crate::dotenv::{ResolvedEnv, sub_env};
use crate::env::Env;

/// Check that a variable is set, non-empty and optionally matches a regex.
#[derive(Debug, Clone)]
pub struct EnvCheck {
    /// Variable name. May itself contain `{NAME}` references.
    pub variable: String,
    /// Pattern the value must match from its start.
    pub pattern: Option<String>,
    regex: Option<Regex>,
}

impl EnvCheck {
    pub fn new(variable: &str, pattern: Option<&str>) -> Result<Self, String> {
        let regex = pattern
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})"))
                    .map_err(|e| format!("invalid regex '{pattern}': {e}"))
            })
            .transpose()?;
        Ok(Self {
            variable: variable.trim().to_string(),
            pattern: pattern.map(str::to_string),
            regex,
        })
    }

    pub fn evaluate(&self, env: &Env) -> Evaluation {
        let name = sub_env(&self.variable, env, &ResolvedEnv::new(), "");

        let Ok(value) = env.var(&name) else {
            return Evaluation::fail(name, "missing");
        };
        if value.is_empty() {
            return Evaluation::fail(name, "empty string");
        }
        if let (Some(regex), Some(pattern)) = (&self.regex, &self.pattern) {
            if !regex.is_match(&value) {
                return Evaluation::fail(name, format!("value does not match regex '{pattern}'"));
            }
        }
        Evaluation::pass(name)
    }
}
