//! Integration tests for the command line interface

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

#[test]
#[allow(deprecated)]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("helpdesk").unwrap();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("migrate")
                .and(predicate::str::contains("seed"))
                .and(predicate::str::contains("serve")),
        );
}

#[test]
#[allow(deprecated)]
fn test_migrate_creates_database() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("helpdesk").unwrap();

    cmd.current_dir(&temp_dir)
        .arg("migrate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Database ready at"));

    assert!(temp_dir.path().join("helpdesk.db").exists());
}

#[test]
#[allow(deprecated)]
fn test_migrate_json_output() {
    let temp_dir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("helpdesk").unwrap();

    cmd.current_dir(&temp_dir)
        .arg("--json")
        .arg("migrate")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"status\": \"ok\"")
                .and(predicate::str::contains("Database ready").not()),
        );
}

#[test]
#[allow(deprecated)]
fn test_migrate_honors_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("helpdesk.toml");
    std::fs::write(&config_path, "[database]\npath = \"custom.db\"\n").unwrap();

    let mut cmd = Command::cargo_bin("helpdesk").unwrap();
    cmd.current_dir(&temp_dir)
        .arg("--config")
        .arg("helpdesk.toml")
        .arg("migrate")
        .assert()
        .success();

    assert!(temp_dir.path().join("custom.db").exists());
    assert!(!temp_dir.path().join("helpdesk.db").exists());
}

#[test]
#[allow(deprecated)]
fn test_seed_prints_credentials_once() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("helpdesk").unwrap();
    cmd.current_dir(&temp_dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("Demo data seeded")
                .and(predicate::str::contains("admin@helpdesk.local"))
                .and(predicate::str::contains("client@helpdesk.local")),
        );

    // Seeding again keeps the accounts and does not leak a new password.
    let mut cmd = Command::cargo_bin("helpdesk").unwrap();
    cmd.current_dir(&temp_dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("already present, password unchanged"));
}

#[test]
#[allow(deprecated)]
fn test_unknown_command_fails() {
    let mut cmd = Command::cargo_bin("helpdesk").unwrap();

    cmd.arg("frobnicate").assert().failure();
}
