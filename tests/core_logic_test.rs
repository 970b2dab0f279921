use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use requirements_gen::builders::nightly::{OverrideToken, PythonVersion};
use requirements_gen::builders::specifier::Specifier;
use requirements_gen::builders::validator::{ConfigValidator, StandardValidator};
use requirements_gen::builders::writer::{CUSTOM_AUTO_SEPARATOR, FileSink};
use requirements_gen::core::engine::RequirementsEngine;
use requirements_gen::core::manifest::{ManifestReader, ManifestSource};

fn setup_project(dependencies: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(
        &manifest,
        format!("[project]\nname = \"demo\"\ndependencies = {dependencies}\n"),
    )
    .unwrap();
    (dir, manifest)
}

fn engine_for(manifest: &Path, out_dir: &Path) -> RequirementsEngine {
    let reader = ManifestReader::new(manifest.to_path_buf());
    let doc = reader.load().unwrap();
    RequirementsEngine::new(
        reader.manifest_path().to_path_buf(),
        doc,
        Box::new(FileSink::new(out_dir.to_path_buf())),
    )
}

#[test]
fn test_generate_writes_both_files() {
    let (dir, manifest) = setup_project("[\"foo==1.0\", \"bar==2.0\"]");

    let mut engine = engine_for(&manifest, dir.path());
    engine.generate(&[], None).unwrap();

    let base = fs::read_to_string(dir.path().join("base.in")).unwrap();
    let nightly = fs::read_to_string(dir.path().join("nightly.in")).unwrap();

    assert_eq!(base, format!("{CUSTOM_AUTO_SEPARATOR}foo==1.0\nbar==2.0\n"));
    assert_eq!(nightly, base);
}

#[test]
fn test_nightly_override_replaces_matching_entries() {
    let (dir, manifest) = setup_project("[\"foo==1.0\", \"bar==2.0\"]");

    let mut engine = engine_for(&manifest, dir.path());
    let overrides = vec![OverrideToken::parse("foo", "scipp")];
    engine.generate(&overrides, None).unwrap();

    let base = fs::read_to_string(dir.path().join("base.in")).unwrap();
    let nightly = fs::read_to_string(dir.path().join("nightly.in")).unwrap();

    assert!(base.contains("foo==1.0"));
    assert_eq!(
        nightly,
        format!("{CUSTOM_AUTO_SEPARATOR}bar==2.0\nfoo @ git+https://github.com/scipp/foo@main\n")
    );
}

#[test]
fn test_scipp_override_selects_nightly_wheel() {
    let (dir, manifest) = setup_project("[\"scipp==23.8\", \"numpy>=1.20\"]");
    let python = PythonVersion {
        major: 3,
        minor: 11,
    };

    for token in ["scipp", "scipp/scipp"] {
        let mut engine = engine_for(&manifest, dir.path());
        let overrides = vec![OverrideToken::parse(token, "scipp")];
        engine.generate(&overrides, Some(&python)).unwrap();

        let nightly = fs::read_to_string(dir.path().join("nightly.in")).unwrap();
        assert!(nightly.contains("scipp-nightly"), "{nightly}");
        assert_eq!(nightly.matches("cp311").count(), 2);
    }
}

#[test]
fn test_custom_section_is_preserved_on_disk() {
    let (dir, manifest) = setup_project("[\"foo==1.0\"]");

    let custom = "# hand-written pins\nlegacy-tool<9\n";
    fs::write(
        dir.path().join("base.in"),
        format!("{custom}{CUSTOM_AUTO_SEPARATOR}removed==0.0\n"),
    )
    .unwrap();

    let mut engine = engine_for(&manifest, dir.path());
    engine.generate(&[], None).unwrap();

    let base = fs::read_to_string(dir.path().join("base.in")).unwrap();
    assert_eq!(base, format!("{custom}{CUSTOM_AUTO_SEPARATOR}foo==1.0\n"));
}

#[test]
fn test_file_without_marker_loses_its_content() {
    let (dir, manifest) = setup_project("[\"foo==1.0\"]");

    fs::write(dir.path().join("base.in"), "no marker anywhere\n").unwrap();

    let mut engine = engine_for(&manifest, dir.path());
    engine.generate(&[], None).unwrap();

    let base = fs::read_to_string(dir.path().join("base.in")).unwrap();
    assert_eq!(base, format!("{CUSTOM_AUTO_SEPARATOR}foo==1.0\n"));
}

#[test]
fn test_reruns_are_byte_identical() {
    let (dir, manifest) = setup_project("[\"foo==1.0\", \"bar==2.0\"]");

    let mut engine = engine_for(&manifest, dir.path());
    engine.generate(&[], None).unwrap();
    let first = fs::read_to_string(dir.path().join("base.in")).unwrap();

    let mut engine = engine_for(&manifest, dir.path());
    engine.generate(&[], None).unwrap();
    let second = fs::read_to_string(dir.path().join("base.in")).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_check_detects_manifest_drift() {
    let (dir, manifest) = setup_project("[\"foo==1.0\"]");

    let mut engine = engine_for(&manifest, dir.path());
    engine.generate(&[], None).unwrap();
    assert!(engine.check(&[], None).unwrap().is_empty());

    fs::write(
        &manifest,
        "[project]\nname = \"demo\"\ndependencies = [\"foo==1.0\", \"added==3.0\"]\n",
    )
    .unwrap();

    let engine = engine_for(&manifest, dir.path());
    let stale = engine.check(&[], None).unwrap();
    assert_eq!(stale.len(), 2);
    assert!(stale[0].contains("out of date"));
}

#[test]
fn test_missing_dependencies_produces_no_files() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("pyproject.toml");
    fs::write(&manifest, "[project]\nname = \"demo\"\n").unwrap();

    let mut engine = engine_for(&manifest, dir.path());
    assert!(engine.generate(&[], None).is_err());

    assert!(!dir.path().join("base.in").exists());
    assert!(!dir.path().join("nightly.in").exists());
}

#[test]
fn test_validator_flags_prefix_overmatch() {
    let dependencies = vec![Specifier::new("foobar==1.0")];
    let overrides = vec![
        OverrideToken::parse("foo", "scipp"),
        OverrideToken::parse("", "scipp"),
    ];

    let validator = StandardValidator::new();
    let issues = validator
        .validate_overrides(&dependencies, &overrides)
        .unwrap();

    assert!(issues.iter().any(|issue| issue.contains("foobar")));
    assert!(issues.iter().any(|issue| issue.contains("empty token")));
}
