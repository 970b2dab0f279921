use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::builders::specifier::Specifier;

/// Errors about the manifest's content, as opposed to filesystem failures,
/// which propagate untouched.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// The manifest parsed fine but declares no dependencies.
    #[error("No dependencies found under 'project.dependencies' in {}", .0.display())]
    MissingDependencies(PathBuf),
}

/// Raw deserialization target for the pyproject-style manifest. Unknown
/// tables and keys are ignored, only the parts this tool consumes are
/// modeled.
#[derive(Debug, Deserialize, Clone)]
pub struct PyprojectDoc {
    pub project: Option<ProjectTable>,
    pub tool: Option<ToolTable>,
}

/// The `[project]` table.
#[derive(Debug, Deserialize, Clone)]
pub struct ProjectTable {
    pub name: Option<String>,
    pub dependencies: Option<Vec<String>>,
}

/// The `[tool]` table, narrowed to this tool's own section.
#[derive(Debug, Deserialize, Clone)]
pub struct ToolTable {
    #[serde(rename = "requirements-gen")]
    pub requirements_gen: Option<ToolSettings>,
}

/// Optional `[tool.requirements-gen]` settings: defaults that the command
/// line overrides field by field.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ToolSettings {
    /// Directory the `.in` files are written to.
    #[serde(rename = "output-dir")]
    pub output_dir: Option<PathBuf>,
    /// Default override tokens applied when `--nightly` is absent.
    pub nightly: Option<Vec<String>>,
    /// Organization assumed for bare override tokens.
    #[serde(rename = "default-org")]
    pub default_org: Option<String>,
}

impl PyprojectDoc {
    /// The ordered dependency list, trimmed. An absent or empty declaration
    /// is a `ManifestError` naming the offending manifest, never a default.
    pub fn dependencies(&self, origin: &Path) -> Result<Vec<Specifier>, ManifestError> {
        let declared = self
            .project
            .as_ref()
            .and_then(|project| project.dependencies.as_ref());
        match declared {
            Some(entries) if !entries.is_empty() => {
                Ok(entries.iter().map(|entry| Specifier::new(entry)).collect())
            }
            _ => Err(ManifestError::MissingDependencies(origin.to_path_buf())),
        }
    }

    pub fn settings(&self) -> ToolSettings {
        self.tool
            .as_ref()
            .and_then(|tool| tool.requirements_gen.clone())
            .unwrap_or_default()
    }

    pub fn project_name(&self) -> Option<&str> {
        self.project.as_ref().and_then(|project| project.name.as_deref())
    }
}

/// Abstracts where the manifest comes from, so the engine and the tests do
/// not care whether it was a real file.
pub trait ManifestSource {
    fn load(&self) -> Result<PyprojectDoc>;
    fn manifest_path(&self) -> &Path;
}

/// Reads the manifest from disk. One load per invocation; the document is
/// handed around after that, the file is never re-read or mutated.
pub struct ManifestReader {
    manifest_path: PathBuf,
}

impl ManifestReader {
    pub fn new(manifest_path: PathBuf) -> Self {
        Self { manifest_path }
    }
}

impl ManifestSource for ManifestReader {
    fn load(&self) -> Result<PyprojectDoc> {
        let content = fs::read_to_string(&self.manifest_path)
            .with_context(|| format!("Failed to read {}", self.manifest_path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.manifest_path.display()))
    }

    fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}
