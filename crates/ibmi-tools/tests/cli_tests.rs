//! Integration tests for the ibmi-tools CLI.

use std::path::{Path, PathBuf};
use std::process::Command;

use ibmi_encoding::{pack_decimal, CP037};
use rust_decimal::Decimal;

/// Job log fixture shared with the parser tests.
fn joblog_fixture() -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.push("ibmi-joblog");
    path.push("tests");
    path.push("fixtures");
    path.push("QPJOBLOG_en.txt");
    path
}

/// Run the CLI with given arguments and return (stdout, stderr, success).
fn run_cli(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_ibmi-tools"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

const SCHEMA: &str = r#"{
  "library": "APPLIB",
  "name": "CUSTOMER",
  "parsing_offset": 4,
  "columns": [
    {"name": "CUSNO", "data_type": "DECIMAL", "size": 5, "precision": 0, "column_text": "Customer number"},
    {"name": "NAME", "data_type": "CHAR", "size": 6}
  ]
}"#;

fn row(dir: &Path, file: &str, cusno: i64, name: &str) -> PathBuf {
    let mut data = vec![0u8; 4];
    data.extend(pack_decimal(&Decimal::from(cusno), 5, 0).unwrap());
    data.extend(CP037.encode(&format!("{:<6}", name)).unwrap());
    let path = dir.join(file);
    std::fs::write(&path, data).unwrap();
    path
}

#[test]
fn test_help_command() {
    let (stdout, _, success) = run_cli(&["--help"]);
    assert!(success);
    assert!(stdout.contains("joblog"));
    assert!(stdout.contains("joesd"));
}

#[test]
fn test_joblog_summary() {
    let fixture = joblog_fixture();
    let (stdout, stderr, success) = run_cli(&["joblog", fixture.to_str().unwrap()]);
    assert!(success, "Command failed with stderr: {}", stderr);
    assert!(stdout.contains("712703/RADDATZ/QPADEV0001"), "Output: {}", stdout);
    assert!(stdout.contains("QGPL/QDFTJOBD"), "Output: {}", stdout);
    assert!(stdout.contains("MCH3601"), "Output: {}", stdout);
}

#[test]
fn test_joblog_json_with_filter() {
    let fixture = joblog_fixture();
    let (stdout, stderr, success) = run_cli(&[
        "joblog",
        fixture.to_str().unwrap(),
        "--json",
        "--severity",
        "40",
    ]);
    assert!(success, "Command failed with stderr: {}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["job"], "712703/RADDATZ/QPADEV0001");
    assert_eq!(json["messages"].as_array().unwrap().len(), 2);
    assert_eq!(json["messages"][0]["id"], "CPF9801");
    assert_eq!(json["messages"][1]["type"], "Escape");
}

#[test]
fn test_joblog_rejects_plain_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "just some notes\n").unwrap();

    let (_, stderr, success) = run_cli(&["joblog", path.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("Failed to load job log"), "Stderr: {}", stderr);
}

#[test]
fn test_joesd_compare() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("customer.json");
    std::fs::write(&schema, SCHEMA).unwrap();
    let before = row(dir.path(), "before.bin", 42, "ALPHA");
    let after = row(dir.path(), "after.bin", 42, "BETA");

    let (stdout, stderr, success) = run_cli(&[
        "joesd",
        "--schema",
        schema.to_str().unwrap(),
        "--data",
        before.to_str().unwrap(),
        "--compare",
        after.to_str().unwrap(),
        "--library",
        "APPLIB",
        "--object",
        "CUSTOMER",
        "--json",
    ]);
    assert!(success, "Command failed with stderr: {}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["table"], "APPLIB/CUSTOMER");
    assert_eq!(json["record"]["fields"][0]["label"], "CUSNO (Customer number)");
    assert_eq!(json["record"]["fields"][1]["value"]["value"], "ALPHA ");
    assert_eq!(json["compare"]["different"], true);
    assert_eq!(json["compare"]["field_highlights"], serde_json::json!([false, true]));
}

#[test]
fn test_joesd_wrong_object() {
    let dir = tempfile::tempdir().unwrap();
    let schema = dir.path().join("customer.json");
    std::fs::write(&schema, SCHEMA).unwrap();
    let data = row(dir.path(), "row.bin", 1, "X");

    let (_, _, success) = run_cli(&[
        "joesd",
        "--schema",
        schema.to_str().unwrap(),
        "--data",
        data.to_str().unwrap(),
        "--library",
        "APPLIB",
        "--object",
        "ORDERS",
    ]);
    assert!(!success);
}
