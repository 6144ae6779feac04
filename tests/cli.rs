//! Integration tests: run the chanlog binary.

use std::process::Command;

fn chanlog() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_chanlog"));
    cmd.env_remove("CHANLOG_CONFIG")
        .env_remove("CHANLOG_BACKEND_URL")
        .arg("--log-stderr");
    cmd
}

#[test]
fn binary_prints_version() {
    let output = chanlog()
        .arg("--version")
        .output()
        .expect("Failed to execute binary");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "Expected version in output, got: {}",
        stdout
    );
}

#[test]
fn search_without_query_prints_placeholder_offline() {
    let output = chanlog()
        .args(["--format", "text", "--backend", "http://127.0.0.1:1", "/search"])
        .output()
        .expect("Failed to execute binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Search parameter is missing in URL");
}

#[test]
fn unreachable_backend_fails_with_load_placeholder() {
    let output = chanlog()
        .args(["--format", "text", "--backend", "http://127.0.0.1:1", "/latest"])
        .output()
        .expect("Failed to execute binary");

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "Could not load logs");
}
