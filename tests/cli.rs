//! CLI test cases.
//!
//! Anything that needs a live model is covered by the mock-server tests in
//! `recognize.rs`; here we only check argument handling.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

/// Create a new `Command` with our binary.
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("ocr-relay").unwrap();
    // Keep ambient credentials out of the tests.
    cmd.env_remove("OPENAI_API_KEY");
    cmd.env_remove("OPENAI_API_BASE");
    cmd
}

#[test]
fn test_help() {
    cmd().arg("--help").assert().success();
}

#[test]
fn test_version() {
    cmd().arg("--version").assert().success();
}

#[test]
fn test_missing_api_key() {
    cmd()
        .arg("does-not-matter.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OPENAI_API_KEY"));
}

#[test]
fn test_missing_image_file() {
    cmd()
        .env("OPENAI_API_KEY", "sk-test")
        .arg("no-such-image.png")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-image.png"));
}
