//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory.

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-p", "csr-cli", "--"])
        .args(args)
        .env("CSR_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_help() {
    let (code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(code, 0, "help failed");
    assert!(stdout.contains("test"));
    assert!(stdout.contains("result"));
}

#[test]
fn test_config_get() {
    let (code, stdout, _) = run_cli(&["config", "get", "aptitude.time_budget_min"]);
    assert_eq!(code, 0, "config get failed");
    assert!(!stdout.trim().is_empty());
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (code, _, _) = run_cli(&["config", "get", "aptitude.no_such_key"]);
    assert_ne!(code, 0);
}

#[test]
fn test_streams_outputs_json() {
    let (code, stdout, _) = run_cli(&["streams"]);
    assert_eq!(code, 0, "streams failed");
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_ok());
}

#[test]
fn test_seed_then_jobs_list() {
    let (code, _, _) = run_cli(&["seed"]);
    assert_eq!(code, 0, "seed failed");

    let (code, stdout, _) = run_cli(&["jobs", "list"]);
    assert_eq!(code, 0, "jobs list failed");
    let jobs: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(jobs.as_array().is_some());
}

#[test]
fn test_result_reports_flags() {
    let (code, stdout, _) = run_cli(&["result"]);
    assert_eq!(code, 0, "result failed");
    let report: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(report.get("aptitude_completed").is_some());
    assert!(report.get("personality_completed").is_some());
}
