//! Smoke tests for the clientpack binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn clientpack(workdir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("clientpack").unwrap();
    cmd.current_dir(workdir)
        .env_remove("CLIENTPACK_WORKDIR")
        .env("CLIENTPACK_COLOR", "never");
    cmd
}

#[test]
fn test_version() {
    let temp = tempfile::tempdir().unwrap();

    clientpack(temp.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(concat!(
            "clientpack ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_no_command_prints_hint() {
    let temp = tempfile::tempdir().unwrap();

    clientpack(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("clientpack --help"));
}

#[test]
fn test_list_empty_store() {
    let temp = tempfile::tempdir().unwrap();

    clientpack(temp.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No client dependencies registered"));
}

#[test]
fn test_path_rejects_absolute() {
    let temp = tempfile::tempdir().unwrap();

    clientpack(temp.path())
        .args(["path", "/etc/passwd"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected a relative path"));
}

#[test]
fn test_invalid_workdir() {
    let temp = tempfile::tempdir().unwrap();

    clientpack(temp.path())
        .args(["--workdir", "does-not-exist", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid working directory"));
}

#[test]
fn test_discover_reports_contributors() {
    let temp = tempfile::tempdir().unwrap();
    fs::create_dir_all(temp.path().join("contributors")).unwrap();
    fs::write(
        temp.path().join("contributors/charts.toml"),
        "[[dependency]]\npackage = \"d3\"\n",
    )
    .unwrap();

    clientpack(temp.path())
        .arg("discover")
        .assert()
        .success()
        .stdout(predicate::str::contains("charts_d3"));
}
