//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    let mut cmd = Command::cargo_bin("clientdesk").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("clientdesk").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--mongodb-uri"))
        .stdout(predicate::str::contains("--in-memory"))
        .stdout(predicate::str::contains("0.0.0.0:8080"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = Command::cargo_bin("clientdesk").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("clientdesk"));
}

#[test]
fn test_serve_fails_fast_on_bad_uri() {
    let mut cmd = Command::cargo_bin("clientdesk").unwrap();
    cmd.env_remove("MONGODB_URI")
        .arg("serve")
        .arg("--bind")
        .arg("127.0.0.1:0")
        .arg("--mongodb-uri")
        .arg("not-a-mongodb-uri");

    cmd.assert().failure();
}
