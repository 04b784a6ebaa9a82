//! Operating system checks.

use std::process::Command;

use super::Evaluation;
use super::version::{VersionSpec, name_and_version};

const PLATFORMS: &[&str] = &["Linux", "macOS", "Windows"];

/// Check the operating system and, optionally, its release version.
#[derive(Debug, Clone)]
pub struct PlatformCheck {
    /// One of `Linux`, `macOS` or `Windows`.
    pub platform: &'static str,
    pub version: Option<VersionSpec>,
    raw: String,
}

impl PlatformCheck {
    /// Parse a value such as `linux` or `macOS>=14`.
    pub fn parse(s: &str) -> Result<Self, String> {
        let (name, version) = name_and_version(s)?;
        let platform = PLATFORMS
            .iter()
            .find(|p| p.eq_ignore_ascii_case(&name))
            .copied()
            .ok_or_else(|| format!("unknown platform '{name}' (expected linux, macos or windows)"))?;
        Ok(Self {
            platform,
            version,
            raw: s.trim().to_string(),
        })
    }

    pub fn evaluate(&self) -> Evaluation {
        self.evaluate_with(current_platform(), current_version().as_deref())
    }

    /// Evaluate against a given platform name and release.
    pub fn evaluate_with(&self, platform: Option<&str>, release: Option<&str>) -> Evaluation {
        if platform != Some(self.platform) {
            return Evaluation::fail(&self.raw, "wrong platform");
        }
        let Some(spec) = &self.version else {
            return Evaluation::pass(&self.raw);
        };
        match release.and_then(|release| spec.matches(release)) {
            Some(true) => Evaluation::pass(&self.raw),
            Some(false) => Evaluation::fail(
                &self.raw,
                format!("found version {}", release.unwrap_or_default()),
            ),
            None => Evaluation::fail(&self.raw, "could not determine version"),
        }
    }
}

/// Name of the running platform, if it is one we know.
pub fn current_platform() -> Option<&'static str> {
    match std::env::consts::OS {
        "linux" => Some("Linux"),
        "macos" => Some("macOS"),
        "windows" => Some("Windows"),
        _ => None,
    }
}

/// Release version of the running OS.
pub fn current_version() -> Option<String> {
    let text = match std::env::consts::OS {
        "linux" => std::fs::read_to_string("/proc/sys/kernel/osrelease").ok()?,
        "macos" => command_output("sw_vers", &["-productVersion"])?,
        "windows" => command_output("cmd", &["/c", "ver"])?,
        _ => return None,
    };
    super::version::find_version(&text).map(str::to_string)
}

fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_platform_names() {
        assert_eq!(PlatformCheck::parse("linux").unwrap().platform, "Linux");
        assert_eq!(PlatformCheck::parse("MacOS>=14").unwrap().platform, "macOS");
        assert!(PlatformCheck::parse("beos").is_err());
        assert!(PlatformCheck::parse("linux>=x").is_err());
    }

    #[test]
    fn wrong_platform_fails() {
        let check = PlatformCheck::parse("windows").unwrap();
        let result = check.evaluate_with(Some("Linux"), Some("6.18.44"));
        assert_eq!(result, Evaluation::fail("windows", "wrong platform"));
    }

    #[test]
    fn version_is_compared() {
        let check = PlatformCheck::parse("linux>=5.10").unwrap();
        assert!(check.evaluate_with(Some("Linux"), Some("6.18.44-fc")).passed);

        let result = check.evaluate_with(Some("Linux"), Some("4.19.0"));
        assert_eq!(result.status, "found version 4.19.0");

        let result = check.evaluate_with(Some("Linux"), None);
        assert_eq!(result.status, "could not determine version");
    }

    #[test]
    fn current_platform_matches_build_target() {
        if cfg!(target_os = "linux") {
            assert_eq!(current_platform(), Some("Linux"));
            let check = PlatformCheck::parse("linux").unwrap();
            assert!(check.evaluate().passed);
        }
    }
}
