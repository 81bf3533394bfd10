//! Smoke tests for the Adosum CLI.
//!
//! These tests verify basic CLI behavior without any network access:
//! - `ados --version` outputs version info
//! - `ados --help` outputs help text
//! - missing or malformed arguments fail with a usage error

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a Command for the ados binary with a clean environment, so ambient
/// ADO_*/OLLAMA_* variables can't satisfy required arguments.
fn ados() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_ados"));
    for var in [
        "WORK_ITEM_IDS",
        "ADO_URL",
        "ADO_PROJECT_NAME",
        "ADO_PAT",
        "OLLAMA_HOST",
        "OLLAMA_MODEL",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_version_flag() {
    ados()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ados"));
}

#[test]
fn test_help_flag() {
    ados()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("--ids"))
        .stdout(predicate::str::contains("--ado-url"))
        .stdout(predicate::str::contains("--project"));
}

#[test]
fn test_help_flag_short() {
    ados()
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_missing_required_args_fails() {
    ados()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--ids"));
}

#[test]
fn test_non_numeric_id_fails() {
    ados()
        .args([
            "--ids",
            "1,notanid",
            "--ado-url",
            "https://dev.azure.com/contoso",
            "--project",
            "Platform",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("notanid"));
}

#[test]
fn test_unknown_flag_fails() {
    ados()
        .arg("--frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}
