//! Executable checks.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::Evaluation;
use super::version::{VersionSpec, find_version, name_and_version};
use crate::constants;
use crate::env::Env;

/// Check that an executable is on `PATH`, optionally with a minimum version.
#[derive(Debug, Clone)]
pub struct ExecCheck {
    pub program: String,
    pub version: Option<VersionSpec>,
}

impl ExecCheck {
    /// Parse a requirement such as `git` or `python3>=3.11`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (program, version) = name_and_version(s)?;
        Ok(Self { program, version })
    }

    pub fn evaluate(&self, env: &Env) -> Evaluation {
        let subject = match &self.version {
            Some(spec) => format!("{}{spec}", self.program),
            None => self.program.clone(),
        };

        let Some(path) = which(&self.program, env) else {
            return Evaluation::fail(subject, "missing");
        };
        debug!("found '{}' at {}", self.program, path.display());

        let Some(spec) = &self.version else {
            return Evaluation::pass(subject);
        };
        let Some(found) = program_version(&path) else {
            return Evaluation::fail(subject, "could not determine version");
        };
        match spec.matches(&found) {
            Some(true) => Evaluation::pass(subject),
            Some(false) => Evaluation::fail(subject, format!("found version {found}")),
            None => Evaluation::fail(subject, "could not determine version"),
        }
    }
}

/// Locate `program` in the directories listed by `PATH`.
///
/// A program given with a directory part is checked directly.
pub fn which(program: &str, env: &Env) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return is_executable(candidate).then(|| candidate.to_path_buf());
    }

    let path_var = env.var(constants::ENV_PATH).ok()?;
    std::env::split_paths(&path_var).find_map(|dir| {
        executable_names(program)
            .into_iter()
            .map(|name| dir.join(name))
            .find(|path| is_executable(path))
    })
}

#[cfg(windows)]
fn executable_names(program: &str) -> Vec<String> {
    let mut names = vec![program.to_string()];
    if Path::new(program).extension().is_none() {
        names.extend([".exe", ".cmd", ".bat"].map(|ext| format!("{program}{ext}")));
    }
    names
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> Vec<String> {
    vec![program.to_string()]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run `<program> --version` and pick the first version number it prints.
fn program_version(path: &Path) -> Option<String> {
    let output = Command::new(path)
        .arg("--version")
        .stdin(Stdio::null())
        .output()
        .ok()?;
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let version = find_version(&text).map(str::to_string);
    debug!("'{} --version' reported {version:?}", path.display());
    version
}
