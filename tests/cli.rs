use assert_cmd::Command;
use predicates::prelude::*;

fn jangbu(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("jangbu").unwrap();
    cmd.env("HOME", home);
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    jangbu(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("seed"))
        .stdout(predicate::str::contains("status"));
}

#[test]
fn test_init_then_status() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = home.path().join("data");

    jangbu(home.path())
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready"));

    jangbu(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Transactions: 0"))
        .stdout(predicate::str::contains("Snapshots:    0"));
}

#[test]
fn test_seed_missing_workbook_fails() {
    let home = tempfile::tempdir().unwrap();
    let data_dir = home.path().join("data");
    jangbu(home.path())
        .args(["init", "--data-dir"])
        .arg(&data_dir)
        .assert()
        .success();

    jangbu(home.path())
        .args(["seed", "expenses", "/no/such/workbook.xlsx", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Workbook not found"));
}

#[test]
fn test_status_without_init_points_at_init() {
    let home = tempfile::tempdir().unwrap();
    jangbu(home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("jangbu init"));
}
