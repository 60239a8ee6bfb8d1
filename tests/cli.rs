use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn planner(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("planner").unwrap();
    cmd.env("PLANNER_DATA_DIR", data_dir.path())
        .env_remove("PLANNER_GITHUB_TOKEN")
        .env_remove("PLANNER_LOG");
    cmd
}

#[test]
fn person_add_then_list() {
    let data_dir = TempDir::new().unwrap();

    planner(&data_dir)
        .args(["person", "add", "Alex Yeoh", "-p", "87438807", "-t", "friends"])
        .assert()
        .success()
        .stdout(predicate::str::contains("New person added"));

    planner(&data_dir)
        .args(["person", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alex Yeoh"))
        .stdout(predicate::str::contains("1 person(s) listed"));
}

#[test]
fn duplicate_person_is_rejected() {
    let data_dir = TempDir::new().unwrap();

    planner(&data_dir)
        .args(["person", "add", "Alex Yeoh"])
        .assert()
        .success();
    planner(&data_dir)
        .args(["person", "add", "Alex Yeoh"])
        .assert()
        .failure();
}

#[test]
fn expense_add_then_list() {
    let data_dir = TempDir::new().unwrap();

    planner(&data_dir)
        .args([
            "expense", "add", "Lunch", "-c", "Food", "-x", "6.50", "-d", "2024-03-01",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("New expense added"));

    planner(&data_dir)
        .args(["expense", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lunch"))
        .stdout(predicate::str::contains("1 expense(s)"));
}

#[test]
fn invalid_cost_is_rejected() {
    let data_dir = TempDir::new().unwrap();

    planner(&data_dir)
        .args(["expense", "add", "Lunch", "-c", "Food", "-x", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid cost"));
}

#[test]
fn local_backup_then_restore_round_trip() {
    let data_dir = TempDir::new().unwrap();
    let backup_dir = TempDir::new().unwrap();
    let backup = backup_dir.path().to_str().unwrap();

    planner(&data_dir)
        .args(["person", "add", "Alex Yeoh"])
        .assert()
        .success();
    planner(&data_dir)
        .args(["backup", backup])
        .assert()
        .success()
        .stdout(predicate::str::contains("AddressBook backed up to"));

    planner(&data_dir)
        .args(["person", "add", "Bernice Yu"])
        .assert()
        .success();
    planner(&data_dir)
        .args(["restore", backup])
        .assert()
        .success()
        .stdout(predicate::str::contains("Data restore successful (2 books)"));

    planner(&data_dir)
        .args(["person", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Alex Yeoh"))
        .stdout(predicate::str::contains("Bernice Yu").not());
}

#[test]
fn restore_from_missing_file_fails() {
    let data_dir = TempDir::new().unwrap();
    let missing = data_dir.path().join("nowhere.bak");

    planner(&data_dir)
        .args(["restore", missing.to_str().unwrap(), "--book", "address"])
        .assert()
        .failure();
}

#[test]
fn remote_restore_without_reference_fails() {
    let data_dir = TempDir::new().unwrap();

    planner(&data_dir)
        .args(["restore", "github", "--token", "ghp_unused"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("online backup"));
}

#[test]
fn config_shows_paths() {
    let data_dir = TempDir::new().unwrap();

    planner(&data_dir)
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Data directory"))
        .stdout(predicate::str::contains("(none)"));
}
