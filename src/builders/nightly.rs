use anyhow::{Context, Result, bail};
use regex::Regex;
use std::process::Command;
use std::str::FromStr;

use crate::builders::specifier::Specifier;

/// Organization assumed when an override token carries no `org/` qualifier.
/// The `[tool.requirements-gen] default-org` setting can replace it.
pub const DEFAULT_ORG: &str = "scipp";

const WHEEL_BASE: &str = "https://github.com/scipp/scipp/releases/download/nightly/scipp-nightly";
const WHEEL_SUFFIX: &str = "manylinux_2_17_x86_64.manylinux2014_x86_64.whl";

/// One entry of the `--nightly` override list: a bare repository name or an
/// `org/repo` pair.
///
/// The raw form is kept alongside the resolved pair because filtering
/// matches it against specifier text exactly as given. That is a plain
/// string-prefix test, so `foo` also drops a `foobar==1.0` entry; the
/// validator warns about such tokens, generation does not second-guess them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideToken {
    pub raw: String,
    pub org: String,
    pub repo: String,
}

impl OverrideToken {
    pub fn parse(raw: &str, default_org: &str) -> Self {
        match raw.split_once('/') {
            Some((org, repo)) => Self {
                raw: raw.to_string(),
                org: org.to_string(),
                repo: repo.to_string(),
            },
            None => Self {
                raw: raw.to_string(),
                org: default_org.to_string(),
                repo: raw.to_string(),
            },
        }
    }

    /// Splits a comma-separated `--nightly` value. An empty value means no
    /// overrides; stray commas yield empty tokens, which the validator
    /// reports but generation accepts as given.
    pub fn parse_list(value: &str, default_org: &str) -> Vec<Self> {
        if value.is_empty() {
            return Vec::new();
        }
        value
            .split(',')
            .map(|token| Self::parse(token, default_org))
            .collect()
    }

    /// The scipp wheel is published per interpreter version under the
    /// nightly release tag; every other override installs straight from the
    /// repository's main branch.
    pub fn wants_prebuilt_wheel(&self) -> bool {
        self.org == "scipp" && self.repo == "scipp"
    }

    /// Synthesizes the nightly replacement specifier for this token.
    pub fn as_nightly(&self, python: Option<&PythonVersion>) -> Result<Specifier> {
        if self.wants_prebuilt_wheel() {
            let python = python
                .context("A Python version is required to pick the scipp nightly wheel")?;
            let tag = python.cp_tag();
            return Ok(Specifier::synthesized(format!(
                "{WHEEL_BASE}-{tag}-{tag}-{WHEEL_SUFFIX}"
            )));
        }
        Ok(Specifier::synthesized(format!(
            "{} @ git+https://github.com/{}/{}@main",
            self.repo, self.org, self.repo
        )))
    }
}

/// Builds the nightly variant of a dependency list.
///
/// Base entries whose text starts with any raw override token are dropped,
/// then one synthesized entry per token is appended in override-list order.
pub fn build_nightly_list(
    base: &[Specifier],
    overrides: &[OverrideToken],
    python: Option<&PythonVersion>,
) -> Result<Vec<Specifier>> {
    let mut nightly: Vec<Specifier> = base
        .iter()
        .filter(|dep| {
            !overrides
                .iter()
                .any(|token| dep.as_str().starts_with(token.raw.as_str()))
        })
        .cloned()
        .collect();

    for token in overrides {
        nightly.push(token.as_nightly(python)?);
    }

    Ok(nightly)
}

/// Interpreter version that selects the `cpXY` tag of the prebuilt wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
}

impl PythonVersion {
    /// The `cp311`-style wheel tag. It appears twice in the wheel file name.
    pub fn cp_tag(&self) -> String {
        format!("cp{}{}", self.major, self.minor)
    }

    /// Asks the Python on PATH for its version.
    ///
    /// Tried only when an override actually needs the wheel tag and no
    /// `--python-version` was given, so runs without a scipp override never
    /// touch the interpreter.
    pub fn detect() -> Result<Self> {
        for exe in ["python3", "python"] {
            let Ok(output) = Command::new(exe).arg("--version").output() else {
                continue;
            };
            if !output.status.success() {
                continue;
            }
            let stdout = String::from_utf8_lossy(&output.stdout);
            // Old interpreters print the version banner to stderr.
            let banner = if stdout.trim().is_empty() {
                String::from_utf8_lossy(&output.stderr).into_owned()
            } else {
                stdout.into_owned()
            };
            if let Some(version) = Self::from_banner(&banner) {
                return Ok(version);
            }
        }
        bail!("Could not detect a Python interpreter on PATH, pass --python-version instead")
    }

    fn from_banner(banner: &str) -> Option<Self> {
        let re = Regex::new(r"Python (\d+)\.(\d+)").ok()?;
        let caps = re.captures(banner)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
        })
    }
}

impl FromStr for PythonVersion {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (major, minor) = value
            .trim()
            .split_once('.')
            .context("Python version must look like '3.11'")?;
        Ok(Self {
            major: major.parse().context("Invalid Python major version")?,
            minor: minor.parse().context("Invalid Python minor version")?,
        })
    }
}
