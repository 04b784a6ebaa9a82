//! Filesystem path checks.

use std::path::Path;

use strum::EnumString;

use super::Evaluation;
use crate::dotenv::{ResolvedEnv, sub_env};
use crate::env::Env;

/// Expected kind of filesystem entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum PathType {
    File,
    #[strum(serialize = "dir", serialize = "directory")]
    Dir,
}

/// Check that a path exists, optionally as a file or directory.
#[derive(Debug, Clone)]
pub struct PathCheck {
    /// Path, possibly with `{NAME}` references.
    pub path: String,
    pub path_type: Option<PathType>,
}

impl PathCheck {
    pub fn new(path: &str, path_type: Option<&str>) -> Result<Self, String> {
        let path_type = path_type
            .map(|t| {
                t.trim()
                    .parse::<PathType>()
                    .map_err(|_| format!("unknown path type '{t}' (expected 'file' or 'dir')"))
            })
            .transpose()?;
        Ok(Self {
            path: path.trim().to_string(),
            path_type,
        })
    }

    pub fn evaluate(&self, env: &Env) -> Evaluation {
        let resolved = sub_env(&self.path, env, &ResolvedEnv::new(), "");
        let path = Path::new(&resolved);

        if !path.exists() {
            return Evaluation::fail(resolved, "missing");
        }
        match self.path_type {
            Some(PathType::File) if !path.is_file() => Evaluation::fail(resolved, "not a file"),
            Some(PathType::Dir) if !path.is_dir() => Evaluation::fail(resolved, "not a directory"),
            _ => Evaluation::pass(resolved),
        }
    }
}
