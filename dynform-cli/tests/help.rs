use std::fs;

use assert_cmd::cargo::{self};
use predicates::str::contains;

#[test]
fn prints_help() {
    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(contains("dynform"))
        .stdout(contains("--store-dir"));
}

#[test]
fn exports_stored_entries_to_stdout() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join("submittedData.json"),
        r#"{"User Information":[{"firstName":"Ada","lastName":"Lovelace","age":"36"}]}"#,
    )
    .expect("seed store");

    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("--store-dir")
        .arg(dir.path())
        .args(["--export", "-", "--no-pretty"])
        .assert()
        .success()
        .stdout(contains(
            r#"{"User Information":[{"firstName":"Ada","lastName":"Lovelace","age":"36"}]}"#,
        ));
}

#[test]
fn export_of_missing_store_is_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("--store-dir")
        .arg(dir.path().join("absent"))
        .args(["--export", "-"])
        .assert()
        .success()
        .stdout(contains("{}"));
}

#[test]
fn export_refuses_to_overwrite_without_force() {
    let dir = tempfile::tempdir().expect("tempdir");
    let target = dir.path().join("entries.json");
    fs::write(&target, "keep").expect("seed target");

    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("--store-dir")
        .arg(dir.path())
        .arg("--export")
        .arg(&target)
        .assert()
        .failure()
        .stderr(contains("already exists"));
    assert_eq!(fs::read_to_string(&target).expect("target"), "keep");
}

#[test]
fn rejects_unknown_category() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut cmd = cargo::cargo_bin_cmd!("dynform");
    cmd.arg("--store-dir")
        .arg(dir.path())
        .args(["--category", "Shipping", "--export", "-"])
        .assert()
        .failure()
        .stderr(contains("unknown form type 'Shipping'"));
}
