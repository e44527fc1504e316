use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn cli(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("expense_core_cli").unwrap();
    cmd.arg("--home").arg(home).env("NO_COLOR", "1");
    cmd
}

fn add(home: &Path, title: &str, amount: &str, date: &str, kind: &str) {
    cli(home)
        .args(["add", "--title", title, "--amount", amount, "--date", date, "--type", kind])
        .assert()
        .success()
        .stdout(contains("Added"));
}

fn stored_ids(home: &Path) -> Vec<String> {
    let raw = fs::read_to_string(home.join("data").join("expenses.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn add_then_list_shows_period_rows_and_totals() {
    let home = tempdir().unwrap();
    add(home.path(), "Salary", "2500", "2024-02-26T09:00:00", "income");
    add(home.path(), "Rent", "900", "2024-03-01", "expense");
    add(home.path(), "Next period", "10", "2024-03-26", "expense");

    cli(home.path())
        .args(["list", "--date", "2024-03-10"])
        .assert()
        .success()
        .stdout(contains("March 2024"))
        .stdout(contains("+$2500.00"))
        .stdout(contains("-$900.00"))
        .stdout(contains("Mar 1, 2024"))
        .stdout(contains("Total: $1600.00"))
        .stdout(contains("Next period").not());
}

#[test]
fn list_navigation_moves_between_periods() {
    let home = tempdir().unwrap();
    add(home.path(), "February rent", "900", "2024-02-01", "expense");

    cli(home.path())
        .args(["list", "--date", "2024-03-10", "--prev", "1"])
        .assert()
        .success()
        .stdout(contains("February 2024"))
        .stdout(contains("February rent"));
}

#[test]
fn invalid_amount_is_rejected() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["add", "--title", "Bad", "--amount", "ten"])
        .assert()
        .failure()
        .stderr(contains("Invalid amount"));
}

#[test]
fn delete_requires_confirmation_when_not_interactive() {
    let home = tempdir().unwrap();
    add(home.path(), "Coffee", "3.5", "2024-03-02", "expense");
    let id = stored_ids(home.path()).remove(0);

    cli(home.path())
        .args(["delete", &id])
        .assert()
        .failure()
        .stderr(contains("--yes"));
    assert_eq!(stored_ids(home.path()).len(), 1);

    cli(home.path())
        .args(["delete", &id, "--yes"])
        .assert()
        .success()
        .stdout(contains("Deleted"));
    assert!(stored_ids(home.path()).is_empty());
}

#[test]
fn edit_changes_only_the_given_fields() {
    let home = tempdir().unwrap();
    add(home.path(), "Coffee", "3.5", "2024-03-02", "expense");
    let id = stored_ids(home.path()).remove(0);

    cli(home.path())
        .args(["edit", &id, "--amount", "4.25"])
        .assert()
        .success()
        .stdout(contains("-$4.25"));

    cli(home.path())
        .args(["list", "--date", "2024-03-02"])
        .assert()
        .success()
        .stdout(contains("Coffee"))
        .stdout(contains("-$4.25"));
}

#[test]
fn export_then_import_roundtrip() {
    let home = tempdir().unwrap();
    let exports = tempdir().unwrap();
    add(home.path(), "Salary", "2500", "2024-02-27", "income");
    add(home.path(), "Rent", "900", "2024-03-01", "expense");

    cli(home.path())
        .args(["export", "--dir"])
        .arg(exports.path())
        .assert()
        .success()
        .stdout(contains("Exported 2 transactions"));

    let exported = fs::read_dir(exports.path())
        .unwrap()
        .next()
        .unwrap()
        .unwrap()
        .path();
    let name = exported.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("expenses-") && name.ends_with(".json"));

    let other = tempdir().unwrap();
    cli(other.path())
        .arg("import")
        .arg(&exported)
        .assert()
        .success()
        .stdout(contains("Imported 2 transactions"));
    assert_eq!(stored_ids(other.path()), stored_ids(home.path()));
}

#[test]
fn rejected_import_reports_and_keeps_data() {
    let home = tempdir().unwrap();
    add(home.path(), "Rent", "900", "2024-03-01", "expense");
    let bad = home.path().join("bad.json");
    fs::write(&bad, r#"{"not":"an array"}"#).unwrap();

    cli(home.path())
        .arg("import")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(contains("Import rejected"));
    assert_eq!(stored_ids(home.path()).len(), 1);
}

#[test]
fn chart_draws_one_line_per_bucket() {
    let home = tempdir().unwrap();
    add(home.path(), "Lunch", "30", "2024-02-26T12:00:00", "expense");
    add(home.path(), "Gift", "50", "2024-02-26T15:00:00", "income");

    let assert = cli(home.path())
        .args(["chart", "--date", "2024-03-10", "--type", "all"])
        .assert()
        .success()
        .stdout(contains("Total: $80.00"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let bars = stdout.lines().filter(|line| line.contains(" | ")).count();
    assert_eq!(bars, 29, "Feb 26 through Mar 25, 2024");
}

#[test]
fn period_prints_window_boundaries() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["period", "--date", "2024-01-10"])
        .assert()
        .success()
        .stdout(contains("January 2024"))
        .stdout(contains("Start: 2023-12-26"))
        .stdout(contains("End:   2024-01-25"))
        .stdout(contains("Days:  31"));
}

#[test]
fn config_set_changes_currency_symbol() {
    let home = tempdir().unwrap();
    cli(home.path())
        .args(["config", "set", "currency_symbol", "€"])
        .assert()
        .success();
    add(home.path(), "Bread", "2", "2024-03-03", "expense");
    cli(home.path())
        .args(["list", "--date", "2024-03-03"])
        .assert()
        .success()
        .stdout(contains("-€2.00"));
    cli(home.path())
        .args(["config", "set", "default_view", "decade"])
        .assert()
        .failure();
}

#[test]
fn version_reports_package_version() {
    let home = tempdir().unwrap();
    cli(home.path())
        .arg("version")
        .assert()
        .success()
        .stdout(contains(env!("CARGO_PKG_VERSION")));
}
