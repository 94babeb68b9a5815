//! Smoke tests for the CLI surface

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
fn help_lists_subcommands() {
    Command::cargo_bin("groundwork")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("setup")
                .and(predicate::str::contains("clean"))
                .and(predicate::str::contains("rebuild"))
                .and(predicate::str::contains("status")),
        );
}

#[test]
fn version_prints() {
    Command::cargo_bin("groundwork")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("groundwork"));
}

#[test]
fn unknown_subcommand_fails() {
    Command::cargo_bin("groundwork")
        .unwrap()
        .arg("frobnicate")
        .assert()
        .failure();
}

#[test]
fn nonexistent_workspace_folder_is_an_error() {
    let tmp = TempDir::new().unwrap();
    Command::cargo_bin("groundwork")
        .unwrap()
        .current_dir(tmp.path())
        .args(["--workspace-folder", "does-not-exist", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("resolve working directory"));
}

#[test]
fn explicit_missing_config_file_is_an_error() {
    let tmp = TempDir::new().unwrap();
    Command::cargo_bin("groundwork")
        .unwrap()
        .current_dir(tmp.path())
        .args(["--config", "nope.toml", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"));
}
