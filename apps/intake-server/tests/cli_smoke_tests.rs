//! CLI smoke tests for the intake-server binary
//!
//! These tests verify help output, configuration validation and the
//! one-shot `submit` command against an in-memory database.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

/// Helper to run the intake-server binary with given arguments
fn run_intake_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_intake-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute intake-server")
}

/// Helper to run the intake-server binary with timeout
async fn run_intake_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_intake-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

/// Minimal config rooted in `dir` so logs and databases stay inside the temp dir.
fn write_config(dir: &Path, extra: &str) -> String {
    let config_path = dir.join("intake.yaml");
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 0

database:
  url: "sqlite://database/intake.db"

logging:
  default:
    console_level: "off"
    file: "logs/intake.log"
    file_level: info
    max_backups: 1
    max_size_mb: 1
{extra}
"#,
        home = dir.to_string_lossy().replace('\\', "/"),
    );
    std::fs::write(&config_path, content).expect("Failed to write config file");
    config_path.to_string_lossy().to_string()
}

fn write_form(dir: &Path, body: &str) -> String {
    let path = dir.join("form.json");
    std::fs::write(&path, body).expect("Failed to write form file");
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_intake_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("intake-server"), "Should contain binary name");
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("submit"), "Should contain 'submit' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_intake_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("intake-server"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_intake_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid") || stderr.contains("unexpected"),
        "Should contain error message about invalid command"
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_intake_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config") || stderr.contains("file") || stderr.contains("found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");

    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_intake_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("yaml") || stderr.contains("parse") || stderr.contains("format"),
        "Should mention YAML parsing issue: {}",
        stderr
    );
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
modules:
  patient_intake:
    max_dependants: 5
    default_medical_aid_name: DISCOVERY
"#,
    );

    let output = run_intake_server(&["--config", &config_path, "check"]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        output.status.success(),
        "Should succeed with valid config\nSTDOUT: {stdout}\nSTDERR: {stderr}"
    );
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("max_dependants: 5"));
}

#[test]
fn test_cli_check_rejects_unknown_module_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
modules:
  patient_intake:
    max_dependents: 5
"#,
    );

    let output = run_intake_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Typo in module config should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("patient_intake"), "STDERR: {stderr}");
}

#[test]
fn test_cli_check_rejects_non_sqlite_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("pg.yaml");
    std::fs::write(
        &config_path,
        format!(
            "server:\n  home_dir: \"{}\"\ndatabase:\n  url: \"postgresql://localhost/intake\"\n",
            temp_dir.path().to_string_lossy().replace('\\', "/")
        ),
    )
    .expect("Failed to write config file");

    let output = run_intake_server(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "STDERR: {stderr}");
}

#[test]
fn test_cli_mock_flag_overrides_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("mock.yaml");
    std::fs::write(
        &config_path,
        format!(
            "server:\n  home_dir: \"{}\"\ndatabase:\n  url: \"postgresql://localhost/nonexistent\"\n",
            temp_dir.path().to_string_lossy().replace('\\', "/")
        ),
    )
    .expect("Failed to write config file");

    let output = run_intake_server(&["--config", config_path.to_str().unwrap(), "--mock", "check"]);

    assert!(
        output.status.success(),
        "Should succeed with mock database even if the configured one is unsupported: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sqlite::memory:"));
}

#[test]
fn test_cli_print_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_intake_server(&["--config", &config_path, "--port", "9123", "--print-config"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9123"), "CLI port should win: {stdout}");
}

#[test]
fn test_cli_submit_cash_patient() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");
    let form = write_form(
        temp_dir.path(),
        r#"{
            "patientFullName": "Jane Doe",
            "patientIdNumber": "8001015009087",
            "paymentType": "CASH",
            "medicalAidName": "GEMS",
            "dependants": [{"dependantFullName": "Kid", "dependantGender": "MALE", "dependantDateOfBirth": ""}]
        }"#,
    );

    let output = run_intake_server(&["--config", &config_path, "--mock", "submit", &form]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Submit should succeed\nSTDOUT: {stdout}\nSTDERR: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Submitting..."));
    assert!(stdout.contains("Data sent"));

    let json_start = stdout.find('{').expect("created patient json");
    let created: serde_json::Value =
        serde_json::from_str(&stdout[json_start..]).expect("valid json");
    assert_eq!(created["paymentType"], "CASH");
    assert_eq!(created["patientFullName"], "Jane Doe");
    assert!(created.get("medicalAidName").is_none());
    assert_eq!(created["dependants"], serde_json::json!([]));
}

#[test]
fn test_cli_submit_persists_to_sqlite_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");
    let form = write_form(
        temp_dir.path(),
        r#"{
            "patientFullName": "John Smith",
            "patientIdNumber": "7505055009081",
            "paymentType": "MEDICAL_AID",
            "homeAddress": "1 Long St",
            "medicalAidHolderFullName": "John Smith",
            "medicalAidHolderIdNumber": "7505055009081",
            "medicalAidHolderPhone": "0820000000",
            "medicalAidName": "DISCOVERY",
            "medicalAidNumber": "D123",
            "hasDependants": true,
            "dependants": [{"dependantFullName": "Amy Smith", "dependantGender": "FEMALE", "dependantDateOfBirth": "2015-06-01"}]
        }"#,
    );

    let output = run_intake_server(&["--config", &config_path, "submit", &form]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "STDOUT: {stdout}\nSTDERR: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Data sent"));
    assert!(stdout.contains("Amy Smith"));
    assert!(temp_dir.path().join("database/intake.db").is_file());
}

#[test]
fn test_cli_submit_invalid_form_reports_generic_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");
    let form = write_form(
        temp_dir.path(),
        r#"{"patientFullName": "", "patientIdNumber": "", "paymentType": "CASH"}"#,
    );

    let output = run_intake_server(&["--config", &config_path, "--mock", "submit", &form]);

    assert!(!output.status.success(), "Invalid form should fail");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Error sending data"), "STDOUT: {stdout}");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/patientFullName"), "STDERR: {stderr}");
}

#[test]
fn test_cli_submit_missing_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_intake_server(&[
        "--config",
        &config_path,
        "--mock",
        "submit",
        "/nonexistent/form.json",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot read form file"), "STDERR: {stderr}");
}

#[tokio::test]
async fn test_cli_run_command_with_mock_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let result = run_intake_server_with_timeout(
        &["--config", &config_path, "--mock", "run"],
        Duration::from_secs(5),
    )
    .await;

    match result {
        Err(err) => {
            // Timeout is expected - server was running
            assert!(
                err.to_string().contains("elapsed"),
                "Server failed to start: {err}"
            );
        }
        Ok(output) => {
            panic!(
                "Server exited early\nSTDOUT: {}\nSTDERR: {}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }
}

#[test]
fn test_cli_run_rejects_bad_bind_address() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("bad_host.yaml");
    std::fs::write(
        &config_path,
        format!(
            "server:\n  home_dir: \"{}\"\n  host: \"not a host\"\n",
            temp_dir.path().to_string_lossy().replace('\\', "/")
        ),
    )
    .expect("Failed to write config file");

    let output = run_intake_server(&["--config", config_path.to_str().unwrap(), "--mock", "run"]);

    assert!(!output.status.success(), "Should fail with invalid bind address");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid bind address"), "STDERR: {stderr}");
}

#[test]
fn test_cli_subcommand_help() {
    for (sub, needle) in [("run", "server"), ("check", "configuration"), ("submit", "JSON")] {
        let output = run_intake_server(&[sub, "--help"]);
        assert!(output.status.success(), "{sub} --help should succeed");
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains(sub) || stdout.to_lowercase().contains(&needle.to_lowercase()),
            "{sub} help: {stdout}"
        );
    }
}
