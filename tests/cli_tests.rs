//! Integration tests for the CLI interface

mod common;

use assert_cmd::Command;
use common::SCENARIO_JSONL;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn procminer() -> Command {
    let mut cmd = Command::cargo_bin("procminer").unwrap();
    for var in [
        "PROCMINER_CONFIG",
        "PROCMINER_TIME_UNIT",
        "PROCMINER_DAY_BUCKET",
        "PROCMINER_PARTITIONS",
        "PROCMINER_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn write_events(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("claims.jsonl");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help_flag() {
    procminer()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("analyze"));
}

#[test]
fn test_analyze_text_report() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, SCENARIO_JSONL);

    procminer()
        .arg("analyze")
        .arg(&events)
        .args(["--partitions", "2", "--description", "claims handling"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Log: claims"))
        .stdout(predicate::str::contains("Description: claims handling"))
        .stdout(predicate::str::contains("Events:          4"))
        .stdout(predicate::str::contains("Cases:           2"))
        .stdout(predicate::str::contains("Alice -> Bob  1"))
        .stdout(predicate::str::contains("Bob -> Alice  1"));
}

#[test]
fn test_analyze_json_report() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, SCENARIO_JSONL);

    let output = procminer()
        .arg("analyze")
        .arg(&events)
        .args(["--format", "json", "--name", "scenario", "--time-unit", "hour"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["summary"]["log_name"], "scenario");
    assert_eq!(report["summary"]["time_unit"], "hour");
    assert_eq!(report["summary"]["number_of_process_instances"], 2);
    let mean = report["summary"]["case_duration_stats"]["mean"].as_f64().unwrap();
    assert!((mean - 13.5 / 60.0).abs() < 1e-12);
}

#[test]
fn test_config_file_and_flags() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, SCENARIO_JSONL);
    let config = dir.path().join("procminer.toml");
    fs::write(&config, "time_unit = \"second\"\nlog_name = \"from-config\"\n").unwrap();

    procminer()
        .arg("--config")
        .arg(&config)
        .arg("analyze")
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("Log: from-config"))
        .stdout(predicate::str::contains("duration (second)"));
}

#[test]
fn test_env_override() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, SCENARIO_JSONL);

    procminer()
        .env("PROCMINER_TIME_UNIT", "hour")
        .arg("analyze")
        .arg(&events)
        .assert()
        .success()
        .stdout(predicate::str::contains("duration (hour)"));
}

#[test]
fn test_day_bucket_flag_with_negative_offset() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, SCENARIO_JSONL);

    procminer()
        .arg("analyze")
        .arg(&events)
        .args(["--day-bucket", "-10:00"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-12-31"));
}

#[test]
fn test_missing_events_file() {
    let dir = TempDir::new().unwrap();

    procminer()
        .arg("analyze")
        .arg(dir.path().join("absent.jsonl"))
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_malformed_line_exit_code() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, "{\"case_id\": \"1\"\n");

    procminer()
        .arg("analyze")
        .arg(&events)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_invalid_event_exit_code() {
    let dir = TempDir::new().unwrap();
    let events = write_events(
        &dir,
        r#"{"case_id":"1","activity":"a","start":"2024-01-01T10:00:00Z","end":"2024-01-01T09:00:00Z"}"#,
    );

    procminer()
        .arg("analyze")
        .arg(&events)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("ends before it starts"));
}

#[test]
fn test_zero_partitions_exit_code() {
    let dir = TempDir::new().unwrap();
    let events = write_events(&dir, SCENARIO_JSONL);

    procminer()
        .arg("analyze")
        .arg(&events)
        .args(["--partitions", "0"])
        .assert()
        .code(2);
}
