use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::PathBuf;

use crate::builders::nightly::{self, OverrideToken, PythonVersion};
use crate::builders::reporter::FileStatus;
use crate::builders::specifier::Specifier;
use crate::builders::writer::{self, OutputSink};
use crate::core::manifest::PyprojectDoc;

/// Logical name of the released-versions list.
pub const BASE_NAME: &str = "base";
/// Logical name of the main-branch variant.
pub const NIGHTLY_NAME: &str = "nightly";

/// One rendered requirements file, as it would land in the sink.
#[derive(Debug)]
pub struct GeneratedFile {
    pub name: String,
    pub target: String,
    pub specifiers: Vec<Specifier>,
    pub contents: String,
}

/// Orchestrates a run: holds the loaded manifest and the output sink, and
/// turns them into the base and nightly requirement lists.
pub struct RequirementsEngine {
    manifest_path: PathBuf,
    doc: PyprojectDoc,
    sink: Box<dyn OutputSink>,
}

impl RequirementsEngine {
    pub fn new(manifest_path: PathBuf, doc: PyprojectDoc, sink: Box<dyn OutputSink>) -> Self {
        Self {
            manifest_path,
            doc,
            sink,
        }
    }

    /// The trimmed dependency list from the manifest.
    pub fn dependencies(&self) -> Result<Vec<Specifier>> {
        Ok(self.doc.dependencies(&self.manifest_path)?)
    }

    pub fn project_name(&self) -> Option<&str> {
        self.doc.project_name()
    }

    /// Renders both lists against the sink's current contents without
    /// writing anything. This is the dry-run path, and the basis for
    /// `check` and `status`.
    pub fn preview(
        &self,
        overrides: &[OverrideToken],
        python: Option<&PythonVersion>,
    ) -> Result<Vec<GeneratedFile>> {
        let base = self.dependencies()?;
        let nightly_list = nightly::build_nightly_list(&base, overrides, python)?;
        Ok(vec![
            self.render_one(BASE_NAME, base)?,
            self.render_one(NIGHTLY_NAME, nightly_list)?,
        ])
    }

    /// Rewrites `base.in` and `nightly.in`.
    ///
    /// Both files are rendered, custom regions included, before the first
    /// write. A failure while reading the manifest or building the nightly
    /// list therefore cannot leave only one file updated.
    pub fn generate(
        &mut self,
        overrides: &[OverrideToken],
        python: Option<&PythonVersion>,
    ) -> Result<Vec<GeneratedFile>> {
        let files = self.preview(overrides, python)?;
        for file in &files {
            self.sink.write(&file.name, &file.contents)?;
        }
        Ok(files)
    }

    /// Names the output files whose current contents differ from what
    /// `generate` would write right now. Empty means up to date.
    pub fn check(
        &self,
        overrides: &[OverrideToken],
        python: Option<&PythonVersion>,
    ) -> Result<Vec<String>> {
        let mut stale = Vec::new();
        for file in self.preview(overrides, python)? {
            match self.sink.read_existing(&file.name)? {
                Some(existing) if existing == file.contents => {}
                Some(_) => stale.push(format!("{} is out of date", file.target)),
                None => stale.push(format!("{} is missing", file.target)),
            }
        }
        Ok(stale)
    }

    /// Collects the per-file summaries shown by the `status` command.
    pub fn file_statuses(
        &self,
        overrides: &[OverrideToken],
        python: Option<&PythonVersion>,
    ) -> Result<Vec<FileStatus>> {
        let mut statuses = Vec::new();
        for file in self.preview(overrides, python)? {
            let existing = self.sink.read_existing(&file.name)?;
            let custom_lines = existing
                .as_deref()
                .map(|text| writer::custom_region(text).lines().count())
                .unwrap_or(0);
            statuses.push(FileStatus {
                up_to_date: existing.as_deref() == Some(file.contents.as_str()),
                exists: existing.is_some(),
                custom_lines,
                generated_count: file.specifiers.len(),
                modified: self
                    .sink
                    .modified(&file.name)?
                    .map(DateTime::<Local>::from),
                name: file.name,
                path: file.target,
            });
        }
        Ok(statuses)
    }

    fn render_one(&self, name: &str, specifiers: Vec<Specifier>) -> Result<GeneratedFile> {
        let custom = match self.sink.read_existing(name)? {
            Some(text) => writer::custom_region(&text).to_string(),
            None => String::new(),
        };
        let contents = writer::render(&custom, &specifiers);
        Ok(GeneratedFile {
            name: name.to_string(),
            target: self.sink.describe(name),
            specifiers,
            contents,
        })
    }
}
