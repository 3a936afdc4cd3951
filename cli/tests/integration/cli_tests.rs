//! CLI structure, state handling and error reporting, exercised through the
//! built binary.

#![allow(clippy::expect_used, deprecated)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn vzkit(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("vzkit").expect("vzkit binary should exist");
    cmd.current_dir(dir)
        .env_remove("VZKIT_CONFIG")
        .env_remove("VZKIT_STATE")
        .env_remove("VZKIT_INSTANCE")
        .env_remove("VZKIT_PLATFORM")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn write_state(dir: &Path, instance: &str, body: &str) {
    let kitchen = dir.join(".kitchen");
    std::fs::create_dir_all(&kitchen).expect("mkdir");
    std::fs::write(kitchen.join(format!("{instance}.json")), body).expect("write state");
}

// --- Help and version ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    let dir = TempDir::new().expect("tempdir");
    vzkit(dir.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Disposable Virtuozzo containers"));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = TempDir::new().expect("tempdir");
    vzkit(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("create"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    let dir = TempDir::new().expect("tempdir");
    vzkit(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("vzkit"));
}

#[test]
fn test_unknown_command_fails() {
    let dir = TempDir::new().expect("tempdir");
    vzkit(dir.path()).arg("converge").assert().code(2);
}

// --- status ---

#[test]
fn test_status_without_state_reports_not_created() {
    let dir = TempDir::new().expect("tempdir");
    vzkit(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}

#[test]
fn test_status_accepts_any_no_color_value_alongside_flag() {
    let dir = TempDir::new().expect("tempdir");
    for value in ["1", "yes", ""] {
        vzkit(dir.path())
            .env("NO_COLOR", value)
            .args(["--no-color", "status"])
            .assert()
            .success()
            .stdout(predicate::str::contains("not created"));
    }
}

#[test]
fn test_status_json_without_state() {
    let dir = TempDir::new().expect("tempdir");
    let output = vzkit(dir.path())
        .args(["status", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["instance"], "default");
    assert_eq!(value["created"], false);
}

#[test]
fn test_status_json_reads_recorded_container_for_instance() {
    let dir = TempDir::new().expect("tempdir");
    write_state(
        dir.path(),
        "web01",
        r#"{"ct_id":"abc-123","hostname":"203.0.113.5"}"#,
    );
    let output = vzkit(dir.path())
        .args(["status", "--json", "--instance", "web01"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["created"], true);
    assert_eq!(value["ct_id"], "abc-123");
    assert_eq!(value["hostname"], "203.0.113.5");
}

#[test]
fn test_status_with_corrupt_state_fails() {
    let dir = TempDir::new().expect("tempdir");
    write_state(dir.path(), "default", "{not json");
    vzkit(dir.path())
        .arg("status")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("parsing state file"));
}

// --- destroy ---

#[test]
fn test_destroy_without_state_is_a_no_op() {
    let dir = TempDir::new().expect("tempdir");
    vzkit(dir.path())
        .arg("destroy")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to destroy"));
}

#[test]
fn test_destroy_with_invalid_endpoint_keeps_state() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join(".kitchen.vz.yml"), "socket: ftp://x\n").expect("write");
    write_state(dir.path(), "default", r#"{"ct_id":"abc-123"}"#);
    vzkit(dir.path())
        .args(["destroy", "--yes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid endpoint 'ftp://x'"));
    let raw = std::fs::read_to_string(dir.path().join(".kitchen/default.json")).expect("read");
    assert!(raw.contains("abc-123"));
}

// --- create ---

#[test]
fn test_create_with_unsupported_scheme_fails_before_any_command() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join(".kitchen.vz.yml"), "socket: ftp://x\n").expect("write");
    vzkit(dir.path())
        .args(["create", "--platform", "centos-7.2"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid endpoint 'ftp://x'"));
    assert!(!dir.path().join(".kitchen").exists());
}

#[test]
fn test_create_json_error_carries_code() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join(".kitchen.vz.yml"), "socket: ftp://x\n").expect("write");
    let output = vzkit(dir.path())
        .args(["create", "--json", "--platform", "centos-7.2"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["error"], true);
    assert_eq!(value["code"], "invalid_endpoint");
}

#[test]
fn test_create_without_platform_or_template_is_invalid_config() {
    let dir = TempDir::new().expect("tempdir");
    let output = vzkit(dir.path())
        .args(["create", "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["code"], "invalid_config");
}

#[test]
fn test_create_rejects_shell_metacharacters_in_username() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join(".kitchen.vz.yml"),
        "username: \"kitchen; rm -rf /\"\nostemplate: centos-7-x86_64\n",
    )
    .expect("write");
    vzkit(dir.path())
        .arg("create")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("username"));
}

#[test]
fn test_create_refuses_when_container_already_recorded() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join(".kitchen.vz.yml"), "ostemplate: centos-7-x86_64\n")
        .expect("write");
    write_state(dir.path(), "default", r#"{"ct_id":"abc-123"}"#);
    vzkit(dir.path())
        .arg("create")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already has container abc-123"));
}

/// With no hypervisor installed the very first command fails; the assigned
/// identity must still be on disk so `destroy` can clean up.
#[cfg(unix)]
#[test]
fn test_failed_create_records_identity_for_cleanup() {
    let dir = TempDir::new().expect("tempdir");
    if Path::new("/usr/sbin/vzctl").exists() {
        return;
    }
    std::fs::write(dir.path().join(".kitchen.vz.yml"), "ostemplate: centos-7-x86_64\n")
        .expect("write");
    let kitchen = dir.path().join(".kitchen");
    std::fs::create_dir_all(&kitchen).expect("mkdir");
    std::fs::write(kitchen.join("kitchen_id_rsa"), "PRIVATE").expect("write key");
    std::fs::write(kitchen.join("kitchen_id_rsa.pub"), "ssh-rsa AAAA kitchen_key\n")
        .expect("write key");

    vzkit(dir.path())
        .args(["create", "--quiet"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("creating container"));

    let raw = std::fs::read_to_string(kitchen.join("default.json")).expect("state");
    let state: serde_json::Value = serde_json::from_str(&raw).expect("json");
    assert!(state["ct_id"].as_str().is_some_and(|id| id.len() == 36));
    assert!(state.get("hostname").is_none());
}
