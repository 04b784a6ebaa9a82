//! Loading checks files (TOML or YAML).

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use super::{Check, CheckError};
use crate::config::{Config, ConfigError};
use crate::constants;

/// Errors while loading a checks file.
#[derive(Error, Debug)]
pub enum ChecksFileError {
    #[error("failed to read checks file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML checks file {path}: {source}")]
    ParseToml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("failed to parse YAML checks file {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml_ng::Error,
    },

    #[error("invalid config section in {path}: {source}")]
    Config {
        path: PathBuf,
        source: ConfigError,
    },

    #[error("in {path}: {source}")]
    Check {
        path: PathBuf,
        source: CheckError,
    },
}

/// Load the checks in `path`.
///
/// Config sections (`[config]` by default) are merged into `config` and
/// removed before the rest is loaded as a check tree named after the file.
/// Returns `Ok(None)` for unsupported extensions and files without checks.
pub fn load_checks_file(path: &Path, config: &mut Config) -> Result<Option<Check>, ChecksFileError> {
    let Some(document) = read_document(path, config)? else {
        debug!("skipping {}: unsupported extension", path.display());
        return Ok(None);
    };

    let document = if path.file_name().is_some_and(|n| n == constants::PYPROJECT_FILENAME) {
        document
            .get("tool")
            .and_then(|tool| tool.get(constants::PYPROJECT_TOOL_SECTION))
            .cloned()
            .unwrap_or(Value::Null)
    } else {
        document
    };

    let Value::Object(map) = document else {
        return Ok(None);
    };

    let (sections, checks): (Map<String, Value>, Map<String, Value>) = map
        .into_iter()
        .partition(|(key, _)| config.cli.section_aliases.contains(key));

    for section in sections.values().filter(|s| s.is_object()) {
        config.update(section).map_err(|source| ChecksFileError::Config {
            path: path.to_path_buf(),
            source,
        })?;
    }

    Check::load(&Value::Object(checks), &path.display().to_string()).map_err(|source| {
        ChecksFileError::Check {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Parse the file by extension. `None` when the extension is not configured.
fn read_document(path: &Path, config: &Config) -> Result<Option<Value>, ChecksFileError> {
    let ext = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let is_toml = config.cli.toml_exts.contains(&ext);
    let is_yaml = config.cli.yaml_exts.contains(&ext);
    if !is_toml && !is_yaml {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|source| ChecksFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(Some(Value::Null));
    }

    let document = if is_toml {
        toml::from_str(&content).map_err(|source| ChecksFileError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?
    } else {
        serde_yaml_ng::from_str(&content).map_err(|source| ChecksFileError::ParseYaml {
            path: path.to_path_buf(),
            source,
        })?
    };
    Ok(Some(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checks::CheckKind;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_toml_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "geomancy.toml",
            "[Environment]\nHome = { checkEnv = \"HOME\" }\n[Executables.Git]\ncheckExec = \"git\"\n",
        );

        let mut config = Config::default();
        let check = load_checks_file(&path, &mut config).unwrap().unwrap();
        assert_eq!(check.name, path.display().to_string());
        let names: Vec<_> = check.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Environment", "Executables"]);
    }

    #[test]
    fn loads_yaml_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            ".geomancy.yaml",
            "Checks:\n  Path:\n    checkEnv: PATH\n    desc: The path\n",
        );

        let check = load_checks_file(&path, &mut Config::default()).unwrap().unwrap();
        let leaf = check.flatten()[2];
        assert_eq!(leaf.name, "Path");
        assert!(matches!(leaf.kind, CheckKind::Env(_)));
    }

    #[test]
    fn config_sections_update_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "geomancy.toml",
            "[config.term]\nuse_color = false\n\n[Home]\ncheckEnv = \"HOME\"\n",
        );

        let mut config = Config::default();
        let check = load_checks_file(&path, &mut config).unwrap().unwrap();
        assert!(!config.term.use_color);
        assert_eq!(check.children.len(), 1);
        assert_eq!(check.children[0].name, "Home");
    }

    #[test]
    fn pyproject_is_unwrapped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(
            dir.path(),
            "pyproject.toml",
            "[project]\nname = \"demo\"\n\n[tool.geomancy.Home]\ncheckEnv = \"HOME\"\n",
        );

        let check = load_checks_file(&path, &mut Config::default()).unwrap().unwrap();
        assert_eq!(check.children.len(), 1);
        assert_eq!(check.children[0].name, "Home");

        let path = write(dir.path(), "pyproject.toml", "[project]\nname = \"demo\"\n");
        assert!(load_checks_file(&path, &mut Config::default()).unwrap().is_none());
    }

    #[test]
    fn unsupported_extension_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "checks.json", "{}");
        assert!(load_checks_file(&path, &mut Config::default()).unwrap().is_none());
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "geomancy.toml", "not [valid");
        let err = load_checks_file(&path, &mut Config::default()).unwrap_err();
        assert!(matches!(err, ChecksFileError::ParseToml { .. }));
        assert!(err.to_string().contains("geomancy.toml"));

        let path = write(dir.path(), "geomancy.toml", "[Bad]\ncheckEnv = 1\n");
        let err = load_checks_file(&path, &mut Config::default()).unwrap_err();
        assert!(matches!(err, ChecksFileError::Check { .. }));
    }

    #[test]
    fn empty_yaml_has_no_checks() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "geomancy.yml", "");
        assert!(load_checks_file(&path, &mut Config::default()).unwrap().is_none());
    }
}
