use assert_cmd::prelude::*;
use assert_fs::prelude::*;
use predicates::prelude::*;
use std::process::Command;

fn cli() -> Command {
    let mut cmd = Command::cargo_bin("culvert_design_cli").unwrap();
    cmd.env_remove("CULVERT_TABLE");
    cmd
}

#[test]
fn lookup_tabulated_size() {
    cli()
        .args(["lookup", "A", "10.5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("L = 12.750"))
        .stdout(predicate::str::contains("(tabulated)"));
}

#[test]
fn lookup_interpolated_size() {
    cli()
        .args(["lookup", "A", "11.25"])
        .assert()
        .success()
        .stdout(predicate::str::contains("L = 13.375"))
        .stdout(predicate::str::contains("(interpolated)"));
}

#[test]
fn lookup_out_of_range_fails() {
    cli()
        .args(["lookup", "A", "96"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the supported range"));
}

#[test]
fn lookup_unknown_class_fails() {
    cli()
        .args(["lookup", "Q", "12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown shape class"));
}

#[test]
fn dimension_command() {
    cli()
        .args(["dimension", "A", "12", "L"])
        .assert()
        .success()
        .stdout(predicate::str::diff("14.000\n"));
}

#[test]
fn classes_command() {
    cli()
        .arg("classes")
        .assert()
        .success()
        .stdout(predicate::str::contains("A: 10.500 - 48.000 (H, L, W)"))
        .stdout(predicate::str::contains("B: 12.000 - 60.000 (H, L, T, W)"));
}

#[test]
fn custom_table_from_flag_and_env() {
    let dir = assert_fs::TempDir::new().unwrap();
    let table = dir.child("table.json");
    table
        .write_str(r#"{"C": {"6": {"L": 8.0}, "8": {"L": 10.0}}}"#)
        .unwrap();

    cli()
        .args(["--table", table.path().to_str().unwrap(), "lookup", "C", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("L = 9.000"));

    cli()
        .env("CULVERT_TABLE", table.path())
        .args(["classes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C: 6.000 - 8.000 (L)"));
    dir.close().unwrap();
}

#[test]
fn validate_rejects_malformed_table() {
    let dir = assert_fs::TempDir::new().unwrap();
    let good = dir.child("good.json");
    good.write_str(r#"{"A": {"1": {"L": 1.0}, "2": {"L": 2.0}}}"#)
        .unwrap();
    let bad = dir.child("bad.json");
    bad.write_str(r#"{"A": {"1": {"L": 1.0}, "2": {"W": 2.0}}}"#)
        .unwrap();

    cli()
        .args(["validate", good.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid table: 1 classes"));
    cli()
        .args(["validate", bad.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed table"));
    dir.close().unwrap();
}

#[test]
fn batch_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let input = dir.child("requests.csv");
    input.write_str("A,10.5\nA,11.25\nZ,3\n").unwrap();
    let output = dir.child("results.csv");

    cli()
        .args([
            "batch",
            input.path().to_str().unwrap(),
            output.path().to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 3 results"))
        .stdout(predicate::str::contains("(1 failed)"));

    output.assert(predicate::str::contains("A,11.25,interpolated,"));
    output.assert(predicate::str::contains("Z,3,error,"));
    dir.close().unwrap();
}

#[test]
fn export_command() {
    let dir = assert_fs::TempDir::new().unwrap();
    let output = dir.child("export.json");

    cli()
        .args(["export", output.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    output.assert(predicate::path::exists());
    cli()
        .args(["validate", output.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid table: 2 classes"));
    dir.close().unwrap();
}
