//! Checks validate the current environment.
//!
//! A checks file deserializes into a tree of [`Check`] nodes: groups whose
//! children are other checks, and leaves that test one thing (a variable,
//! an executable, a path, the platform). Running the tree produces a
//! [`CheckOutcome`] tree with the same shape.

pub mod env;
pub mod exec;
pub mod file;
pub mod path;
pub mod platform;
pub mod version;

use serde::Serialize;
use serde_json::{Map, Value};
use strum::EnumString;
use thiserror::Error;

use crate::config::ChecksConfig;
use crate::env::Env;

pub use env::EnvCheck;
pub use exec::ExecCheck;
pub use file::{ChecksFileError, load_checks_file};
pub use path::PathCheck;
pub use platform::PlatformCheck;

/// Errors in a check definition.
#[derive(Error, Debug)]
pub enum CheckError {
    #[error("invalid check '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

impl CheckError {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        CheckError::Invalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Key naming the type of a leaf check in a checks file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString)]
pub enum CheckType {
    #[strum(serialize = "CheckEnv", serialize = "checkEnv")]
    Env,
    #[strum(serialize = "CheckExec", serialize = "checkExec")]
    Exec,
    #[strum(serialize = "CheckPath", serialize = "checkPath")]
    Path,
    #[strum(serialize = "CheckPlatform", serialize = "checkPlatform")]
    Platform,
}

/// What a check node tests.
#[derive(Debug, Clone)]
pub enum CheckKind {
    /// Passes when all children pass.
    Group,
    Env(EnvCheck),
    Exec(ExecCheck),
    Path(PathCheck),
    Platform(PlatformCheck),
}

/// A node in the check tree.
#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub desc: String,
    /// Disabled checks (and their children) are skipped.
    pub enabled: bool,
    pub kind: CheckKind,
    pub children: Vec<Check>,
}

/// Result of evaluating a single leaf check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// The checked value as shown in the message (e.g. the variable name).
    pub subject: String,
    pub passed: bool,
    /// Short status such as `passed` or `missing`.
    pub status: String,
}

impl Evaluation {
    pub fn pass(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            passed: true,
            status: "passed".to_string(),
        }
    }

    pub fn fail(subject: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            passed: false,
            status: status.into(),
        }
    }
}

/// Status of a check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Skipped,
}

/// The result of running a check and its children.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    /// Rendered message (group name, or the leaf's message template filled in).
    pub msg: String,
    pub status: Status,
    /// Leaf status text, e.g. `missing`. Empty for groups.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CheckOutcome>,
}

/// Leaf counts of an outcome tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl CheckOutcome {
    /// `true` unless this check or a child failed.
    pub fn passed(&self) -> bool {
        self.status != Status::Failed
    }

    /// Count the leaf outcomes below (and including) this node.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        self.tally(&mut summary);
        summary
    }

    fn tally(&self, summary: &mut Summary) {
        if !self.children.is_empty() {
            for child in &self.children {
                child.tally(summary);
            }
            return;
        }
        summary.total += 1;
        match self.status {
            Status::Passed => summary.passed += 1,
            Status::Failed => summary.failed += 1,
            Status::Skipped => summary.skipped += 1,
        }
    }
}

impl Check {
    /// Create a group check.
    pub fn group(name: impl Into<String>, children: Vec<Check>) -> Self {
        Self {
            name: name.into(),
            desc: String::new(),
            enabled: true,
            kind: CheckKind::Group,
            children,
        }
    }

    /// Build a check tree from a deserialized checks-file mapping.
    ///
    /// A mapping with a check-type key (`checkEnv`, `CheckExec`, ...) is a
    /// leaf; any other mapping is a group whose nested mappings are its
    /// children. Returns `Ok(None)` when the mapping holds no checks.
    pub fn load(value: &Value, name: &str) -> Result<Option<Check>, CheckError> {
        let Some(map) = value.as_object() else {
            return Ok(None);
        };

        let desc = map
            .get("desc")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let enabled = match map.get("enabled") {
            None => true,
            Some(Value::Bool(enabled)) => *enabled,
            Some(_) => return Err(CheckError::invalid(name, "'enabled' must be a boolean")),
        };

        if let Some(kind) = Self::load_leaf(map, name)? {
            return Ok(Some(Check {
                name: name.to_string(),
                desc,
                enabled,
                kind,
                children: Vec::new(),
            }));
        }

        let mut children = Vec::new();
        for (key, value) in map {
            if let Some(child) = Check::load(value, key)? {
                children.push(child);
            }
        }
        if children.is_empty() {
            return Ok(None);
        }

        Ok(Some(Check {
            name: name.to_string(),
            desc,
            enabled,
            kind: CheckKind::Group,
            children,
        }))
    }

    /// The leaf kind named by a check-type key in `map`, if any.
    fn load_leaf(map: &Map<String, Value>, name: &str) -> Result<Option<CheckKind>, CheckError> {
        let Some((check_type, value)) = map
            .iter()
            .find_map(|(key, value)| key.parse::<CheckType>().ok().map(|t| (t, value)))
        else {
            return Ok(None);
        };

        let value = value
            .as_str()
            .ok_or_else(|| CheckError::invalid(name, "check value must be a string"))?;

        let kind = match check_type {
            CheckType::Env => {
                let regex = map.get("regex").and_then(Value::as_str);
                CheckKind::Env(EnvCheck::new(value, regex).map_err(|e| CheckError::invalid(name, e))?)
            }
            CheckType::Exec => {
                CheckKind::Exec(ExecCheck::parse(value).map_err(|e| CheckError::invalid(name, e))?)
            }
            CheckType::Path => {
                let path_type = map.get("type").and_then(Value::as_str);
                CheckKind::Path(PathCheck::new(value, path_type).map_err(|e| CheckError::invalid(name, e))?)
            }
            CheckType::Platform => CheckKind::Platform(
                PlatformCheck::parse(value).map_err(|e| CheckError::invalid(name, e))?,
            ),
        };
        Ok(Some(kind))
    }

    /// Run this check (and its children) against `env`.
    pub fn run(&self, env: &Env, messages: &ChecksConfig) -> CheckOutcome {
        if !self.enabled {
            return CheckOutcome {
                name: self.name.clone(),
                msg: self.name.clone(),
                status: Status::Skipped,
                detail: "disabled".to_string(),
                children: Vec::new(),
            };
        }

        let (template, evaluation) = match &self.kind {
            CheckKind::Group => {
                let children: Vec<_> = self.children.iter().map(|c| c.run(env, messages)).collect();
                let status = if children.iter().all(CheckOutcome::passed) {
                    Status::Passed
                } else {
                    Status::Failed
                };
                return CheckOutcome {
                    name: self.name.clone(),
                    msg: self.name.clone(),
                    status,
                    detail: String::new(),
                    children,
                };
            }
            CheckKind::Env(check) => (&messages.env_msg, check.evaluate(env)),
            CheckKind::Exec(check) => (&messages.exec_msg, check.evaluate(env)),
            CheckKind::Path(check) => (&messages.path_msg, check.evaluate(env)),
            CheckKind::Platform(check) => (&messages.platform_msg, check.evaluate()),
        };

        CheckOutcome {
            name: self.name.clone(),
            msg: template.replace("{name}", &evaluation.subject),
            status: if evaluation.passed {
                Status::Passed
            } else {
                Status::Failed
            },
            detail: evaluation.status,
            children: Vec::new(),
        }
    }

    /// This check followed by all checks below it, depth first.
    pub fn flatten(&self) -> Vec<&Check> {
        let mut flattened = vec![self];
        for child in &self.children {
            flattened.extend(child.flatten());
        }
        flattened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: Value) -> Option<Check> {
        Check::load(&value, "root").unwrap()
    }

    #[test]
    fn check_type_aliases() {
        assert_eq!("checkEnv".parse::<CheckType>().unwrap(), CheckType::Env);
        assert_eq!("CheckEnv".parse::<CheckType>().unwrap(), CheckType::Env);
        assert_eq!("checkPlatform".parse::<CheckType>().unwrap(), CheckType::Platform);
        assert!("desc".parse::<CheckType>().is_err());
    }

    #[test]
    fn load_simple_leaf() {
        let check = load(json!({
            "CheckEnv": "PATH",
            "desc": "Check the existence of the $PATH environment variable"
        }))
        .unwrap();
        assert!(matches!(check.kind, CheckKind::Env(ref env) if env.variable == "PATH"));
        assert_eq!(check.desc, "Check the existence of the $PATH environment variable");
        assert!(check.children.is_empty());
    }

    #[test]
    fn load_nested_groups_in_order() {
        let check = load(json!({
            "checks": {
                "Environment": {
                    "desc": "Environment variables",
                    "Path": {"checkEnv": "PATH"},
                    "Home": {"checkEnv": "HOME", "enabled": false}
                },
                "Executables": {
                    "Git": {"checkExec": "git"}
                }
            }
        }))
        .unwrap();

        let names: Vec<_> = check.flatten().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["root", "checks", "Environment", "Path", "Home", "Executables", "Git"]
        );
        let home = check.flatten()[4];
        assert!(!home.enabled);
    }

    #[test]
    fn load_without_checks_is_none() {
        assert!(load(json!({"desc": "nothing here", "empty": {}})).is_none());
        assert!(load(json!("not a mapping")).is_none());
    }

    #[test]
    fn unsupported_check_types_are_ignored() {
        let check = load(json!({
            "Bucket": {"checkAWSS3": "my-bucket"},
            "Path": {"checkEnv": "PATH"}
        }))
        .unwrap();
        let names: Vec<_> = check.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Path"]);
    }

    #[test]
    fn load_rejects_invalid_definitions() {
        let err = Check::load(&json!({"Bad": {"checkEnv": 3}}), "root").unwrap_err();
        assert!(err.to_string().contains("Bad"), "got: {err}");

        let err = Check::load(&json!({"checkEnv": "A", "regex": "("}), "root").unwrap_err();
        assert!(err.to_string().contains("regex"), "got: {err}");

        let err = Check::load(&json!({"checkEnv": "A", "enabled": "no"}), "root").unwrap_err();
        assert!(err.to_string().contains("enabled"), "got: {err}");
    }

    #[test]
    fn run_group_aggregates_children() {
        let check = load(json!({
            "Present": {"checkEnv": "PRESENT"},
            "Missing": {"checkEnv": "MISSING"},
            "Disabled": {"checkEnv": "MISSING", "enabled": false}
        }))
        .unwrap();

        let env = Env::from_vars([("PRESENT", "yes")]);
        let outcome = check.run(&env, &ChecksConfig::default());

        assert!(!outcome.passed());
        assert_eq!(outcome.children[0].status, Status::Passed);
        assert_eq!(outcome.children[0].msg, "Check environment variable 'PRESENT'");
        assert_eq!(outcome.children[1].status, Status::Failed);
        assert_eq!(outcome.children[1].detail, "missing");
        assert_eq!(outcome.children[2].status, Status::Skipped);
        assert_eq!(
            outcome.summary(),
            Summary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1
            }
        );
    }

    #[test]
    fn run_uses_configured_messages() {
        let check = load(json!({"checkEnv": "PRESENT"})).unwrap();
        let messages = ChecksConfig {
            env_msg: "Variable {name}".to_string(),
            ..ChecksConfig::default()
        };
        let outcome = check.run(&Env::from_vars([("PRESENT", "1")]), &messages);
        assert!(outcome.passed());
        assert_eq!(outcome.msg, "Variable PRESENT");
    }

    #[test]
    fn flatten_is_depth_first() {
        let leaf = |name: &str| Check::group(name, Vec::new());
        let root = Check::group(
            "root",
            vec![
                Check::group("sub1", vec![leaf("sub11"), leaf("sub12")]),
                leaf("sub2"),
            ],
        );
        let names: Vec<_> = root.flatten().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["root", "sub1", "sub11", "sub12", "sub2"]);
    }
}
