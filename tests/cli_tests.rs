use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_review_actions() {
    Command::cargo_bin("gerrit-review")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("submit"))
        .stdout(predicate::str::contains("push"));
}

#[test]
fn missing_connection_fails_before_any_network_attempt() {
    // No git repo, no --host: configuration error, not an ssh error
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("gerrit-review")
        .unwrap()
        .current_dir(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not configured"));
}

#[test]
fn missing_project_names_the_flag_to_pass() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("gerrit-review")
        .unwrap()
        .current_dir(dir.path())
        .args(["--host", "jdoe@review.example.com", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--project"));
}

#[test]
fn push_rejects_unsafe_branch_names() {
    let dir = tempfile::tempdir().unwrap();
    Command::cargo_bin("gerrit-review")
        .unwrap()
        .current_dir(dir.path())
        .args(["push", ";rm -rf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}
