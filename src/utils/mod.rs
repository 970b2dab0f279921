use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::builders::nightly::{DEFAULT_ORG, OverrideToken, PythonVersion};
use crate::builders::reporter::{ConsoleReporter, StatusReporter};
use crate::builders::specifier::Specifier;
use crate::builders::validator::{ConfigValidator, StandardValidator};
use crate::builders::writer::FileSink;
use crate::core::engine::RequirementsEngine;
use crate::core::manifest::{ManifestReader, ManifestSource};

/// Options shared by every command. They mirror the command line; gaps are
/// filled from the manifest's `[tool.requirements-gen]` table.
pub struct RunOptions {
    pub manifest: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub nightly: Option<String>,
    pub python_version: Option<String>,
}

/// Everything a command needs after the manifest has been read once and the
/// command line has been merged with the tool settings.
pub struct ResolvedRun {
    pub engine: RequirementsEngine,
    pub overrides: Vec<OverrideToken>,
    pub python: Option<PythonVersion>,
}

/// Reads the manifest and merges it with the command-line options.
///
/// The manifest is loaded exactly once per invocation; the engine keeps the
/// parsed document from here on.
pub fn resolve(options: &RunOptions) -> Result<ResolvedRun> {
    let reader = ManifestReader::new(options.manifest.clone());
    let doc = reader.load()?;
    let settings = doc.settings();

    let default_org = settings
        .default_org
        .clone()
        .unwrap_or_else(|| DEFAULT_ORG.to_string());

    // A present --nightly flag wins outright, even when empty; the settings
    // table only fills in for an absent flag.
    let overrides: Vec<OverrideToken> = match options.nightly.as_deref() {
        Some(value) => OverrideToken::parse_list(value, &default_org),
        None => settings
            .nightly
            .clone()
            .unwrap_or_default()
            .iter()
            .map(|token| OverrideToken::parse(token, &default_org))
            .collect(),
    };

    let python = resolve_python(options, &overrides)?;

    let out_dir = options
        .output_dir
        .clone()
        .or(settings.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let sink = Box::new(FileSink::new(out_dir));

    Ok(ResolvedRun {
        engine: RequirementsEngine::new(reader.manifest_path().to_path_buf(), doc, sink),
        overrides,
        python,
    })
}

fn resolve_python(
    options: &RunOptions,
    overrides: &[OverrideToken],
) -> Result<Option<PythonVersion>> {
    if let Some(value) = options.python_version.as_deref() {
        return Ok(Some(value.parse::<PythonVersion>()?));
    }
    if overrides.iter().any(OverrideToken::wants_prebuilt_wheel) {
        return Ok(Some(PythonVersion::detect()?));
    }
    Ok(None)
}

pub fn run_generate(options: &RunOptions, dry_run: bool) -> Result<()> {
    let mut run = resolve(options)?;

    if dry_run {
        for file in run.engine.preview(&run.overrides, run.python.as_ref())? {
            println!("--- {} ---", file.target);
            print!("{}", file.contents);
        }
        println!("✓ Dry run, nothing written");
        return Ok(());
    }

    for file in run.engine.generate(&run.overrides, run.python.as_ref())? {
        println!("✓ Wrote {} ({} entries)", file.target, file.specifiers.len());
    }
    Ok(())
}

pub fn run_check(options: &RunOptions) -> Result<()> {
    let run = resolve(options)?;
    let stale = run.engine.check(&run.overrides, run.python.as_ref())?;

    if stale.is_empty() {
        println!("✓ Requirements files are up to date");
        return Ok(());
    }
    for line in &stale {
        println!("⚠️  {line}");
    }
    anyhow::bail!("Requirements files need regeneration, run 'requirements-gen generate'");
}

pub fn run_list(options: &RunOptions, format: &str) -> Result<()> {
    let run = resolve(options)?;
    let dependencies = run.engine.dependencies()?;

    match format {
        "json" => println!(
            "{}",
            serde_json::to_string_pretty(&dependencies).context("Failed to serialize to JSON")?
        ),
        "yaml" => print!(
            "{}",
            serde_yaml::to_string(&dependencies).context("Failed to serialize to YAML")?
        ),
        _ => {
            for dep in &dependencies {
                println!("{}", dep.as_str());
            }
        }
    }
    Ok(())
}

pub fn run_status(options: &RunOptions) -> Result<()> {
    let run = resolve(options)?;
    if let Some(name) = run.engine.project_name() {
        println!("Requirements for {name}:");
    }
    let statuses = run.engine.file_statuses(&run.overrides, run.python.as_ref())?;
    ConsoleReporter::new().generate_status_report(&statuses)
}

pub fn run_validate(options: &RunOptions) -> Result<()> {
    let run = resolve(options)?;
    let dependencies: Vec<Specifier> = run.engine.dependencies()?;

    let validator = StandardValidator::new();
    let mut issues = validator.validate_manifest(&dependencies)?;
    issues.extend(validator.validate_overrides(&dependencies, &run.overrides)?);

    if issues.is_empty() {
        println!("✓ Manifest and overrides look good");
        Ok(())
    } else {
        println!("⚠️  Found issues:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Validation failed");
    }
}
