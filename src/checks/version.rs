//! Version requirements such as `>=3.11` or `~=1.2`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;

/// Leading dotted number of a version string (`6.18.44-fc` gives `6.18.44`).
static NUMERIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)*").unwrap());

/// `name`, optionally followed by an operator and a version.
static REQUIREMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^\s<>=!~]+)\s*(?:(==|!=|>=|<=|~=|>|<)\s*(\S+))?\s*$").unwrap()
});

/// Comparison operator of a version requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
    Ge,
    Le,
    Gt,
    Lt,
    /// `~=`: at least this version, within the same release series.
    Compatible,
}

impl FromStr for Op {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" => Ok(Op::Eq),
            "!=" => Ok(Op::Ne),
            ">=" => Ok(Op::Ge),
            "<=" => Ok(Op::Le),
            ">" => Ok(Op::Gt),
            "<" => Ok(Op::Lt),
            "~=" => Ok(Op::Compatible),
            _ => Err(format!("unknown version operator: {s}")),
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Op::Eq => "==",
            Op::Ne => "!=",
            Op::Ge => ">=",
            Op::Le => "<=",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Compatible => "~=",
        };
        write!(f, "{s}")
    }
}

/// A parsed version with the number of components that were written.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Release {
    version: Version,
    precision: usize,
}

impl Release {
    /// Parse the first dotted number in `s`, padding to three components.
    fn parse(s: &str) -> Option<Self> {
        let numeric = NUMERIC_RE.find(s)?.as_str();
        let parts: Vec<u64> = numeric
            .split('.')
            .map(str::parse)
            .collect::<Result<_, _>>()
            .ok()?;
        let part = |i: usize| parts.get(i).copied().unwrap_or(0);
        Some(Self {
            version: Version::new(part(0), part(1), part(2)),
            precision: parts.len().min(3),
        })
    }
}

/// A requirement like `>=3.11`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    pub op: Op,
    required: Release,
    text: String,
}

impl VersionSpec {
    pub fn new(op: Op, version: &str) -> Result<Self, String> {
        let required =
            Release::parse(version).ok_or_else(|| format!("invalid version: {version}"))?;
        Ok(Self {
            op,
            required,
            text: version.to_string(),
        })
    }

    /// Whether the version found in `found` satisfies this requirement.
    ///
    /// `==` and `!=` compare only as many components as the requirement
    /// spells out, so `==3.11` accepts `3.11.4`.
    pub fn matches(&self, found: &str) -> Option<bool> {
        let found = Release::parse(found)?.version;
        let required = &self.required.version;
        let prefix_eq = || {
            let n = self.required.precision;
            [found.major, found.minor, found.patch][..n]
                == [required.major, required.minor, required.patch][..n]
        };

        Some(match self.op {
            Op::Eq => prefix_eq(),
            Op::Ne => !prefix_eq(),
            Op::Ge => found >= *required,
            Op::Le => found <= *required,
            Op::Gt => found > *required,
            Op::Lt => found < *required,
            Op::Compatible => {
                found >= *required
                    && match self.required.precision {
                        3 => found.major == required.major && found.minor == required.minor,
                        2 => found.major == required.major,
                        _ => true,
                    }
            }
        })
    }
}

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.text)
    }
}

/// Split `python3>=3.8` into `("python3", Some(>=3.8))`.
pub fn name_and_version(s: &str) -> Result<(String, Option<VersionSpec>), String> {
    let caps = REQUIREMENT_RE
        .captures(s)
        .ok_or_else(|| format!("invalid requirement: '{s}'"))?;
    let name = caps[1].to_string();
    let spec = match (caps.get(2), caps.get(3)) {
        (Some(op), Some(version)) => Some(VersionSpec::new(op.as_str().parse()?, version.as_str())?),
        _ => None,
    };
    Ok((name, spec))
}

/// The first dotted version number in free text such as `git version 2.43.0`.
pub fn find_version(text: &str) -> Option<&str> {
    NUMERIC_RE.find(text).map(|m| m.as_str())
}
