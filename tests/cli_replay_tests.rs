// Integration tests for the lineprof binary: replay a recorded trace and
// check each output format.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SCENARIO: &str = r#"{"file": "f.rb", "line": 1, "at_us": 0}
{"file": "f.rb", "line": 2, "at_us": 100}
{"file": "f.rb", "line": 1, "at_us": 250}
"#;

const MIXED: &str = r#"{"file": "foo.src", "line": 1, "at_us": 0}
{"file": "foo.src", "line": 2, "at_us": 10}
{"file": "bar.src", "line": 1, "at_us": 20}
{"file": "bar.src", "line": 2, "at_us": 30}
{"file": "foo.src", "line": 3, "at_us": 40}
{"file": "foo.src", "line": 4, "at_us": 45}
"#;

fn write_trace(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_json_output_single_file() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);

    let output = Command::cargo_bin("lineprof")
        .unwrap()
        .arg("--target")
        .arg("f.rb")
        .arg("--format")
        .arg("json")
        .arg(&trace)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let lines = value["f.rb"].as_array().unwrap();
    assert_eq!(lines[1], 100);
    assert_eq!(lines[2], 150);
    // Storage grew once, to line 1 plus the default padding
    assert_eq!(lines.len(), 1 + 100);
}

#[test]
fn test_json_output_pattern_excludes_unmatched() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "mixed.jsonl", MIXED);

    let output = Command::cargo_bin("lineprof")
        .unwrap()
        .args(["-t", "/^foo/", "--format", "json"])
        .arg(&trace)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let object = value.as_object().unwrap();
    assert_eq!(object.len(), 1);
    assert_eq!(value["foo.src"][1], 10);
    // bar.src is untracked, so foo.src's interval on line 2 stays open
    assert_eq!(value["foo.src"][2], 30);
    assert_eq!(value["foo.src"][3], 5);
}

#[test]
fn test_csv_output() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);

    let mut cmd = Command::cargo_bin("lineprof").unwrap();
    cmd.args(["-t", "f.rb", "--format", "csv"]).arg(&trace);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("file,line,time_us"))
        .stdout(predicate::str::contains("f.rb,1,100"))
        .stdout(predicate::str::contains("f.rb,2,150"));
}

#[test]
fn test_text_summary_on_stderr() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);

    let mut cmd = Command::cargo_bin("lineprof").unwrap();
    cmd.args(["-t", "f.rb"]).arg(&trace);

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Line Timing Summary"))
        .stderr(predicate::str::contains("f.rb"));
}

#[test]
fn test_line_padding_flag() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);

    let output = Command::cargo_bin("lineprof")
        .unwrap()
        .args(["-t", "f.rb", "--format", "json", "--line-padding", "3"])
        .arg(&trace)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["f.rb"].as_array().unwrap().len(), 4);
}

#[test]
fn test_config_file() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);
    let config = write_trace(&dir, "lineprof.toml", "line_padding = 8\n");

    let output = Command::cargo_bin("lineprof")
        .unwrap()
        .args(["-t", "f.rb", "--format", "json", "--config"])
        .arg(&config)
        .arg(&trace)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["f.rb"].as_array().unwrap().len(), 9);
}

#[test]
fn test_invalid_pattern_fails() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);

    let mut cmd = Command::cargo_bin("lineprof").unwrap();
    cmd.args(["-t", "/(oops/"]).arg(&trace);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid profile target"));
}

#[test]
fn test_zero_padding_rejected() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "trace.jsonl", SCENARIO);

    let mut cmd = Command::cargo_bin("lineprof").unwrap();
    cmd.args(["-t", "f.rb", "--line-padding", "0"]).arg(&trace);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line_padding"));
}

#[test]
fn test_missing_trace_fails() {
    let mut cmd = Command::cargo_bin("lineprof").unwrap();
    cmd.args(["-t", "f.rb", "/nonexistent/trace.jsonl"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load trace"));
}

#[test]
fn test_malformed_trace_names_line() {
    let dir = TempDir::new().unwrap();
    let trace = write_trace(&dir, "bad.jsonl", "{\"file\": \"f.rb\", \"line\": 1, \"at_us\": 0}\n{oops\n");

    let mut cmd = Command::cargo_bin("lineprof").unwrap();
    cmd.args(["-t", "f.rb"]).arg(&trace);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}
