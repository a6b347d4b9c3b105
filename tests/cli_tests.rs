//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn esri_metadata_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_esri-metadata"))
}

fn fixture(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("data");
    path.push(name);
    path
}

fn run(args: &[&str]) -> Output {
    Command::new(esri_metadata_bin())
        .args(args)
        .output()
        .expect("Failed to execute command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

// ============================================================================
// Get Command Tests
// ============================================================================

#[test]
fn test_cli_get_value() {
    let file = fixture("full_labelled.xml");
    let output = run(&["get", path_str(&file), "dataIdInfo.idCitation.resTitle"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "Title");
}

#[test]
fn test_cli_get_attribute_in_list() {
    let file = fixture("full_labelled.xml");
    let output = run(&["get", path_str(&file), "dataIdInfo.tpCat[1].TopicCatCd.value"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "015");
}

#[test]
fn test_cli_get_container_prints_json() {
    let file = fixture("full_labelled.xml");
    let output = run(&["get", path_str(&file), "dataIdInfo.idPoC.role"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["RoleCd"]["value"], "007");
}

#[test]
fn test_cli_get_unknown_field_fails() {
    let file = fixture("full_labelled.xml");
    let output = run(&["get", path_str(&file), "dataIdInfo.nope"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope"));
}

#[test]
fn test_cli_get_invalid_value_fails() {
    let file = fixture("invalid_data.xml");
    let output = run(&["get", path_str(&file), "Esri.scaleRange.minScale.text"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value"));
}

// ============================================================================
// Editing Command Tests
// ============================================================================

#[test]
fn test_cli_set_writes_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.xml");
    let file = fixture("empty.xml");

    let output = run(&[
        "set",
        path_str(&file),
        "dataIdInfo.idCitation.resTitle",
        "Roads",
        "--output",
        path_str(&out),
    ]);
    assert!(output.status.success());

    let output = run(&["get", path_str(&out), "dataIdInfo.idCitation.resTitle"]);
    assert_eq!(stdout(&output), "Roads");
}

#[test]
fn test_cli_set_rejects_invalid_input() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.xml");
    let file = fixture("empty.xml");

    let output = run(&[
        "set",
        path_str(&file),
        "Esri.CreaDate.text",
        "yesterday",
        "--output",
        path_str(&out),
    ]);
    assert!(!output.status.success());
    assert!(!out.exists());
}

#[test]
fn test_cli_delete_and_append() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.xml");
    let file = fixture("full_labelled.xml");

    let output = run(&["delete", path_str(&file), "dataIdInfo.tpCat[0]", "-o", path_str(&out)]);
    assert!(output.status.success());
    let output = run(&["get", path_str(&out), "dataIdInfo.tpCat[0].TopicCatCd.value"]);
    assert_eq!(stdout(&output), "015");

    let output = run(&["append", path_str(&out), "dataIdInfo.tpCat"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "dataIdInfo.tpCat[1]");
}

// ============================================================================
// JSON Command Tests
// ============================================================================

#[test]
fn test_cli_json() {
    let file = fixture("full_labelled.xml");
    let output = run(&["json", path_str(&file), "dataIdInfo.searchKeys"]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["keyword"], serde_json::json!(["Tags", "Roads"]));
}

#[test]
fn test_cli_config_root_tag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("options.json");
    std::fs::write(&config, r#"{"root_tag": "other"}"#).unwrap();
    let file = fixture("full_labelled.xml");

    let output = run(&["--config", path_str(&config), "json", path_str(&file)]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "null");
}
