//! Apply a dotenv file to an environment.

use std::path::Path;

use tracing::{debug, error};

use super::{ParseOptions, parse};
use crate::env::Env;

/// Load the dotenv file at `path` into `env`.
///
/// Variables already set in `env` are left alone unless `overwrite` is
/// `true`. Returns the number of variables set. An unreadable file is
/// logged and counts as zero variables, and a value the environment cannot
/// hold (one containing NUL) is logged and skipped; it never fails the caller.
pub fn load_env(path: &Path, overwrite: bool, env: &mut Env, options: &ParseOptions) -> usize {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            error!("could not read the environment file '{}': {e}", path.display());
            return 0;
        }
    };

    let parsed = parse(&text, env, options);
    for skipped in &parsed.skipped {
        debug!(
            "{}:{}: skipped line ({})",
            path.display(),
            skipped.line,
            skipped.reason
        );
    }

    let mut count = 0;
    for (name, value) in &parsed.vars {
        if !overwrite && env.is_set(name) {
            continue;
        }
        if let Err(e) = env.set_var(name, value) {
            error!("{}: could not set environment variable: {e}", path.display());
            continue;
        }
        count += 1;
        debug!("set environment variable {name}={value}");
    }
    debug!("set {count} environment variable(s) from {}", path.display());

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_env(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_loads_nothing() {
        let mut env = Env::empty();
        let count = load_env(
            Path::new("/tmp/geomancy_does_not_exist.env"),
            false,
            &mut env,
            &ParseOptions::default(),
        );
        assert_eq!(count, 0);
    }

    #[test]
    fn existing_variables_are_kept_without_overwrite() {
        let (_dir, path) = write_env("A=file\nB=file\n");
        let mut env = Env::from_vars([("A", "live")]);

        let count = load_env(&path, false, &mut env, &ParseOptions::default());
        assert_eq!(count, 1);
        assert_eq!(env.var("A").unwrap(), "live");
        assert_eq!(env.var("B").unwrap(), "file");
    }

    #[test]
    fn overwrite_replaces_existing_variables() {
        let (_dir, path) = write_env("A=file\nB=file\n");
        let mut env = Env::from_vars([("A", "live")]);

        let count = load_env(&path, true, &mut env, &ParseOptions::default());
        assert_eq!(count, 2);
        assert_eq!(env.var("A").unwrap(), "file");
    }

    #[test]
    fn second_load_without_overwrite_is_a_no_op() {
        let (_dir, path) = write_env("A=1\nB=${A}2\n");
        let mut env = Env::empty();

        assert_eq!(load_env(&path, false, &mut env, &ParseOptions::default()), 2);
        let snapshot = (env.var("A").unwrap(), env.var("B").unwrap());

        assert_eq!(load_env(&path, false, &mut env, &ParseOptions::default()), 0);
        assert_eq!((env.var("A").unwrap(), env.var("B").unwrap()), snapshot);
        assert_eq!(snapshot, ("1".to_string(), "12".to_string()));
    }
}
