//! Smoke tests for the alerts-e2e CLI

#![allow(deprecated)] // Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Command for the alerts-e2e binary with a clean suite environment
fn alerts_e2e() -> Command {
    let mut cmd = Command::cargo_bin("alerts-e2e").expect("alerts-e2e binary should exist");
    for var in [
        "ALERTS_E2E_BASE_URL",
        "ALERTS_E2E_API_URL",
        "ALERTS_E2E_SCREEN",
        "ALERTS_E2E_USER",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_help_flag() {
    alerts_e2e()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_no_args_fails() {
    alerts_e2e().assert().failure();
}

#[test]
fn test_run_help_mentions_simulate() {
    alerts_e2e()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--simulate"))
        .stdout(predicate::str::contains("--screen"));
}

// ============================================================================
// List
// ============================================================================

#[test]
fn test_list_prints_scenarios() {
    alerts_e2e()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Alerts List: should handle searching by summary",
        ))
        .stdout(predicate::str::contains("Alert Creation: should create an alert"));
}

#[test]
fn test_list_filter_without_match_fails() {
    alerts_e2e()
        .args(["list", "--filter", "nothing like this"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no scenario matches"));
}

// ============================================================================
// Run against the simulator
// ============================================================================

#[test]
fn test_run_simulated_suite_passes() {
    alerts_e2e()
        .args(["--color", "never", "run", "--simulate"])
        .assert()
        .success()
        .stderr(predicate::str::contains("PASSED 30 scenarios"));
}

#[test]
fn test_run_simulated_filtered_json() {
    let output = alerts_e2e()
        .args([
            "run",
            "--simulate",
            "--screen",
            "mobile",
            "--filter",
            "Alert Details",
            "--format",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert!(results.iter().all(|r| r["screen"] == "mobile"));
    assert!(results.iter().all(|r| r["passed"] == true));
}

#[test]
fn test_run_quiet_prints_nothing_on_success() {
    alerts_e2e()
        .args(["-q", "run", "--simulate", "--filter", "favorites"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_run_invalid_screen_fails() {
    alerts_e2e()
        .args(["run", "--simulate", "--screen", "tablet"])
        .assert()
        .failure();
}

#[test]
fn test_run_rejects_non_http_base_url() {
    alerts_e2e()
        .args(["run", "--simulate", "--base-url", "ftp://example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_config_shows_defaults() {
    alerts_e2e()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://localhost:3030"))
        .stdout(predicate::str::contains("user_name: E2E User"));
}

#[test]
fn test_config_merges_file_env_and_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("suite.yaml");
    fs::write(
        &path,
        "base_url: http://staging:3030\nuser_name: File User\nassert_timeout_ms: 9000\n",
    )
    .unwrap();

    alerts_e2e()
        .env("ALERTS_E2E_BASE_URL", "http://from-env:8080")
        .args(["config", "--config"])
        .arg(&path)
        .args(["--user", "Flag User"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_url: http://from-env:8080"))
        .stdout(predicate::str::contains("user_name: Flag User"))
        .stdout(predicate::str::contains("assert_timeout_ms: 9000"));
}

#[test]
fn test_config_missing_file_fails() {
    alerts_e2e()
        .args(["config", "--config", "/nonexistent/suite.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}
