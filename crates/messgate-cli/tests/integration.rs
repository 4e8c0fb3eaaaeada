//! Integration tests for CLI commands.

use serde_json::json;
use std::io::Write;
use std::process::{Command, Stdio};
use tempfile::TempDir;

// Nothing listens here; calls fail fast with a transport error.
const DEAD_API: &str = "http://127.0.0.1:9/api";

fn make_form(slot_start: &str, slot_end: &str) -> serde_json::Value {
    json!({
        "title": "Lunch Entry - Boys Mess",
        "startTime": "2025-03-01T09:00",
        "endTime": "2025-03-01T11:00",
        "slots": [
            {
                "degree": "BTECH",
                "semester": "6",
                "startTime": slot_start,
                "endTime": slot_end
            }
        ]
    })
}

fn write_form(form: &serde_json::Value) -> (TempDir, String) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("event.json");
    std::fs::write(&path, serde_json::to_string_pretty(form).unwrap()).unwrap();
    let path = path.to_str().unwrap().to_string();
    (temp_dir, path)
}

fn messgate() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_messgate"));
    command
        .env_remove("MESSGATE_API_URL")
        .env_remove("MESSGATE_AUTH_TOKEN")
        .env_remove("RUST_LOG");
    command
}

fn run_cli(args: &[&str]) -> (bool, String, String) {
    let output = messgate()
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn run_cli_with_stdin(args: &[&str], stdin: &str) -> (bool, String, String) {
    let mut child = messgate()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

#[test]
fn test_check_event_valid() {
    let (_temp_dir, path) = write_form(&make_form("2025-03-01T09:00", "2025-03-01T10:00"));

    let (success, stdout, _) = run_cli(&["check-event", &path]);
    assert!(success);
    assert!(stdout.contains("Event form is valid."));
}

#[test]
fn test_check_event_slot_before_event() {
    let (_temp_dir, path) = write_form(&make_form("2025-03-01T08:30", "2025-03-01T09:30"));

    let (success, stdout, _) = run_cli(&["check-event", &path]);
    assert!(!success);
    assert!(stdout.contains("Slot 1: starts before event starts."));
    assert!(!stdout.contains("Event title is required."));
}

#[test]
fn test_check_event_json_output() {
    let (_temp_dir, path) = write_form(&make_form("2025-03-01T10:30", "2025-03-01T09:30"));

    let (success, stdout, _) = run_cli(&["check-event", &path, "--json"]);
    assert!(!success);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON");
    assert_eq!(report["canSubmit"], false);
    assert_eq!(
        report["slots"],
        json!(["Slot 1: end time must be after start time."])
    );
    assert_eq!(report["event"], json!([]));
}

#[test]
fn test_check_event_from_stdin() {
    let form = json!({ "title": "", "slots": [] });

    let (success, stdout, _) = run_cli_with_stdin(&["check-event"], &form.to_string());
    assert!(!success);
    assert!(stdout.contains("Event title is required."));
    assert!(stdout.contains("At least one slot is required."));
}

#[test]
fn test_check_event_missing_file() {
    let (success, _, stderr) = run_cli(&["check-event", "/nonexistent/event.json"]);
    assert!(!success);
    assert!(stderr.contains("Error: Failed to read file"));
}

#[test]
fn test_check_event_unknown_degree() {
    let mut form = make_form("2025-03-01T09:00", "2025-03-01T10:00");
    form["slots"][0]["degree"] = json!("PHD");
    let (_temp_dir, path) = write_form(&form);

    let (success, _, stderr) = run_cli(&["check-event", &path]);
    assert!(!success);
    assert!(stderr.contains("Error: Invalid event form"));
}

#[test]
fn test_create_event_refuses_invalid_form_offline() {
    let (_temp_dir, path) = write_form(&make_form("2025-03-01T10:30", "2025-03-01T11:30"));

    let (success, _, stderr) = run_cli(&["create-event", &path, "--api-url", DEAD_API]);
    assert!(!success);
    assert!(stderr.contains("Slot 1: ends after event ends."));
    assert!(stderr.contains("Error: Please fix the form errors before creating the event."));
}

#[test]
fn test_extract_command() {
    let (success, stdout, _) = run_cli(&["extract", r#"{"tokenId":"ABC123","name":"Asha R"}"#]);
    assert!(success);
    assert_eq!(stdout.trim(), "ABC123");

    let (success, stdout, _) = run_cli(&["extract", r#"'"XYZ"'"#]);
    assert!(success);
    assert_eq!(stdout.trim(), "XYZ");
}

#[test]
fn test_extract_malformed_payload() {
    let (success, stdout, stderr) = run_cli(&["extract", "{bad json"]);
    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error: No token id found in scan"));
}

#[test]
fn test_classify_command() {
    let (success, stdout, _) = run_cli(&["classify", "used"]);
    assert!(success);
    assert_eq!(stdout.trim(), "USED Used [WARN]");

    let (success, stdout, _) = run_cli(&["classify", "revoked"]);
    assert!(success);
    assert_eq!(stdout.trim(), "REVOKED Unknown [--]");
}

#[test]
fn test_verify_blank_token() {
    let (success, _, stderr) = run_cli(&["verify", "   ", "--api-url", DEAD_API]);
    assert!(!success);
    assert!(stderr.contains("Error: token id is required"));
}

#[test]
fn test_verify_unreachable_service() {
    let (success, stdout, _) = run_cli(&[
        "verify",
        "ABC123",
        "--api-url",
        DEAD_API,
        "--timeout-secs",
        "2",
    ]);
    assert!(!success);
    assert_eq!(stdout.trim(), "[ERROR] Verification failed");
}

#[test]
fn test_invalid_api_url() {
    let (success, _, stderr) = run_cli(&["stats", "--api-url", "localhost:5000"]);
    assert!(!success);
    assert!(stderr.contains("Error: invalid configuration"));
}

#[test]
fn test_api_url_from_environment() {
    let output = messgate()
        .env("MESSGATE_API_URL", "not-a-url")
        .args(["entries"])
        .output()
        .expect("Failed to execute CLI");
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("api url must start with http:// or https://"));
}
