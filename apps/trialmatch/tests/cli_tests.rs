//! Integration tests for reference loading and command execution.

#![allow(clippy::unwrap_used, clippy::panic)]

use clap::Parser;
use std::io::Write;
use std::path::Path;
use trialmatch::cli::{self, Cli};
use trialmatch::config::load_manual_config;
use trialmatch::reference::load_ontology;
use trialmatch_core::{ManualConfig, TrialMatchError};

const LUNG_REFERENCE: &str = r#"{
    "nodes": [
        {"code": "162", "term": "cancer"},
        {"code": "1324", "term": "lung cancer", "parents": ["162"]},
        {"code": "3905", "term": "lung carcinoma", "parents": ["1324"]},
        {"code": "3908", "term": "lung non-small cell carcinoma", "parents": ["3905"]},
        {"code": "1612", "term": "breast cancer", "parents": ["162"]}
    ]
}"#;

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

fn run(args: &[&str]) -> Result<(), TrialMatchError> {
    let cli = Cli::try_parse_from(args).unwrap();
    cli::execute(cli)
}

// =============================================================================
// LOADING
// =============================================================================

#[test]
fn test_load_json_reference() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);

    let graph = load_ontology(&path, None).unwrap();
    assert_eq!(graph.node_count(), 5);
    assert!(graph.code_closure("3908").contains("1324"));
}

#[test]
fn test_missing_reference_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = load_ontology(&dir.path().join("absent.json"), None);
    assert!(matches!(result, Err(TrialMatchError::IoError(_))));
}

#[test]
fn test_directory_is_not_a_reference() {
    let dir = tempfile::tempdir().unwrap();
    assert!(load_ontology(dir.path(), None).is_err());
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "manual.toml",
        r#"
        main_cancer_codes = ["1324"]

        [additional_parents]
        "1612" = ["1324"]
        "#,
    );

    let config = load_manual_config(Some(&path)).unwrap();
    assert_eq!(config.main_cancer_codes.len(), 1);
    assert_eq!(config.neuroendocrine_codes, ManualConfig::default().neuroendocrine_codes);

    let reference = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);
    let graph = load_ontology(&reference, Some(config)).unwrap();
    assert!(graph.code_closure("1612").contains("1324"));
}

#[test]
fn test_no_config_path_uses_defaults() {
    assert_eq!(load_manual_config(None).unwrap(), ManualConfig::default());
}

// =============================================================================
// COMMANDS
// =============================================================================

#[test]
fn test_query_commands_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);
    let ontology = path.to_str().unwrap();

    run(&["trialmatch", "-O", ontology, "status"]).unwrap();
    run(&["trialmatch", "-O", ontology, "--json-mode", "closure", "3908,1612"]).unwrap();
    run(&["trialmatch", "-O", ontology, "classify", "3908", "--targets", "1324"]).unwrap();
    run(&[
        "trialmatch", "-O", ontology, "tiers", "3908", "--pass", "1324", "--fail", "1612",
    ])
    .unwrap();
}

#[test]
fn test_classify_without_targets_rejected_by_parser() {
    assert!(Cli::try_parse_from(["trialmatch", "classify", "3908"]).is_err());
}

#[test]
fn test_snapshot_roundtrip_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);
    let snapshot = dir.path().join("ontology.tmon");

    run(&[
        "trialmatch",
        "-q",
        "-O",
        json.to_str().unwrap(),
        "snapshot",
        "-o",
        snapshot.to_str().unwrap(),
    ])
    .unwrap();

    let from_json = load_ontology(&json, None).unwrap();
    let from_snapshot = load_ontology(&snapshot, None).unwrap();
    assert_eq!(from_snapshot.node_count(), from_json.node_count());
    assert_eq!(from_snapshot.code_closure("3908"), from_json.code_closure("3908"));
}

#[test]
fn test_snapshot_keeps_embedded_config_without_flag() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);
    let manual = write_file(
        dir.path(),
        "manual.toml",
        r#"
        [additional_parents]
        "1612" = ["1324"]
        "#,
    );
    let snapshot = dir.path().join("ontology.tmon");

    run(&[
        "trialmatch",
        "-q",
        "-O",
        json.to_str().unwrap(),
        "-C",
        manual.to_str().unwrap(),
        "snapshot",
        "-o",
        snapshot.to_str().unwrap(),
    ])
    .unwrap();

    let cli = Cli::try_parse_from(["trialmatch", "-O", snapshot.to_str().unwrap(), "status"]).unwrap();
    let graph = cli::load_graph(&cli).unwrap();
    assert!(graph.code_closure("1612").contains("1324"));
    assert_eq!(graph.code_closure("1612"), load_ontology(&snapshot, None).unwrap().code_closure("1612"));
    run(&["trialmatch", "-O", snapshot.to_str().unwrap(), "closure", "1612"]).unwrap();
}

#[test]
fn test_explicit_config_replaces_snapshot_config() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);
    let manual = write_file(
        dir.path(),
        "manual.toml",
        r#"
        [additional_parents]
        "1612" = ["1324"]
        "#,
    );
    let plain = write_file(dir.path(), "plain.toml", "main_cancer_codes = []\n");
    let snapshot = dir.path().join("ontology.tmon");

    run(&[
        "trialmatch",
        "-q",
        "-O",
        json.to_str().unwrap(),
        "-C",
        manual.to_str().unwrap(),
        "snapshot",
        "-o",
        snapshot.to_str().unwrap(),
    ])
    .unwrap();

    let cli = Cli::try_parse_from([
        "trialmatch",
        "-O",
        snapshot.to_str().unwrap(),
        "-C",
        plain.to_str().unwrap(),
        "status",
    ])
    .unwrap();
    let graph = cli::load_graph(&cli).unwrap();
    assert!(!graph.code_closure("1612").contains("1324"));
}

#[test]
fn test_snapshot_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let json = write_file(dir.path(), "ontology.json", LUNG_REFERENCE);
    let target = dir.path().join("nope").join("out.tmon");

    let result = run(&[
        "trialmatch",
        "-O",
        json.to_str().unwrap(),
        "snapshot",
        "-o",
        target.to_str().unwrap(),
    ]);
    assert!(matches!(result, Err(TrialMatchError::IoError(_))));
}
