//! CLI option interaction tests
//!
//! These run the binary but never reach the network: every case exits
//! during argument parsing or configuration validation.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

/// Command running in an empty directory with no NETSELECT_* variables set
fn create_test_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("netselect").unwrap();
    cmd.current_dir(dir.path());
    for key in netselect::models::config::env_keys::ALL {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn test_help() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--attempts"))
        .stdout(predicate::str::contains("--concurrency"))
        .stdout(predicate::str::contains("--unprivileged"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    for flag in ["-v", "--version"] {
        create_test_cmd(&dir)
            .arg(flag)
            .assert()
            .success()
            .stdout(predicate::str::starts_with(format!("netselect {}", env!("CARGO_PKG_VERSION"))));
    }
}

#[test]
fn test_env_help() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--env-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("NETSELECT_HOSTS"))
        .stdout(predicate::str::contains("NETSELECT_LOG_FORMAT"));
}

#[test]
fn test_no_hosts_is_config_error() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .arg("--no-color")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("CONFIG"));
}

#[test]
fn test_malformed_url_fails_before_probing() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--no-color", "://bad"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("ADDRESS"));
}

#[test]
fn test_zero_attempts_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--no-color", "-a", "0", "192.0.2.1"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Attempts must be at least 1"));
}

#[test]
fn test_attempts_beyond_sequence_range_rejected() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--no-color", "-a", "65536", "192.0.2.1"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Attempts cannot exceed 65535"));
}

#[test]
fn test_scheme_without_authority_rejected() {
    let dir = TempDir::new().unwrap();
    for address in ["https:/path", "http:example.com", "example.com:443"] {
        create_test_cmd(&dir)
            .args(["--no-color", address])
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("ADDRESS"));
    }
}

#[test]
fn test_zero_concurrency_and_output_rejected() {
    let dir = TempDir::new().unwrap();
    for args in [["-c", "0"], ["-o", "0"]] {
        create_test_cmd(&dir)
            .arg("--no-color")
            .args(args)
            .arg("192.0.2.1")
            .assert()
            .code(1);
    }
}

#[test]
fn test_timeout_out_of_range() {
    let dir = TempDir::new().unwrap();
    for value in ["0", "301", "abc"] {
        create_test_cmd(&dir)
            .args(["-t", value, "192.0.2.1"])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("--timeout"));
    }
}

#[test]
fn test_conflicting_color_flags() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--color", "--no-color", "192.0.2.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Cannot specify both --color and --no-color"));
}

#[test]
fn test_conflicting_privilege_flags() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--no-color", "--privileged", "--unprivileged", "192.0.2.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--unprivileged"));
}

#[test]
fn test_bad_log_format() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--no-color", "--log-format", "yaml", "192.0.2.1"])
        .assert()
        .code(1);
}

#[test]
fn test_env_file_values_are_validated() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".env"), "NETSELECT_HOSTS=192.0.2.1\nNETSELECT_ATTEMPTS=0\n").unwrap();

    create_test_cmd(&dir)
        .arg("--no-color")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Attempts must be at least 1"));
}

#[test]
fn test_unknown_flag() {
    let dir = TempDir::new().unwrap();
    create_test_cmd(&dir)
        .args(["--frobnicate", "192.0.2.1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--frobnicate"));
}
