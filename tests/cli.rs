use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const OUTLINE: &str = "\
# sample outline
fruit
  apple
  banana [disabled]
  cherry
  date
  elderberry [hidden]
  fig
vegetables
  leek
";

fn write_outline(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("outline.txt");
    fs::write(&path, OUTLINE).unwrap();
    path
}

fn arborist() -> Command {
    Command::cargo_bin("arborist").unwrap()
}

#[test]
fn print_shows_the_expanded_tree() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .arg("--print")
        .assert()
        .success()
        .stdout(predicate::str::contains("[ ] fruit\n  [ ] apple\n"))
        .stdout(predicate::str::contains("  [ ] banana (disabled)\n"))
        .stdout(predicate::str::contains("elderberry").not())
        .stdout(predicate::str::contains("last selected: (none)"));
}

#[test]
fn range_skips_hidden_and_disabled_entries() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--range", "fruit/apple", "fruit/fig"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "selected: fruit/apple, fruit/cherry, fruit/date, fruit/fig\n",
        ))
        .stdout(predicate::str::contains("last selected: fruit/fig\n"));
}

#[test]
fn repeated_select_accumulates_in_multiple_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--select", "fruit/apple", "--select", "vegetables/leek"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: fruit/apple, vegetables/leek\n"));
}

#[test]
fn single_mode_keeps_the_last_selection() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--mode", "single"])
        .args(["--select", "fruit/apple", "--select", "fruit/cherry"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: fruit/cherry\n"));
}

#[test]
fn vetoed_range_applies_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--veto", "fruit/date"])
        .args(["--range", "fruit/apple", "fruit/fig"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: fruit/apple\n"))
        .stderr(predicate::str::contains("range fruit/apple fruit/fig: not applied"));
}

#[test]
fn veto_blocks_only_its_item() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--select", "fruit/apple", "--select", "fruit/fig"])
        .args(["--veto", "fruit/fig"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: fruit/apple\n"))
        .stdout(predicate::str::contains("  [ ] fig\n"))
        .stderr(predicate::str::contains("select fruit/fig: not applied"));
}

#[test]
fn clear_empties_the_selection() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--select", "fruit/apple", "--clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains("selected: \nlast selected: (none)\n"));
}

#[test]
fn disabled_entries_cannot_be_selected() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--select", "fruit/banana"])
        .assert()
        .success()
        .stderr(predicate::str::contains("select fruit/banana: not applied"));
}

#[test]
fn unknown_items_fail() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .args(["--print", "--select", "fruit/kiwi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No such item: fruit/kiwi"));
}

#[test]
fn unknown_mode_is_rejected() {
    arborist()
        .args(["--print", "--mode", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown selection mode"));
}

#[test]
fn malformed_outline_reports_the_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.txt");
    fs::write(&path, "root\n      too deep\n").unwrap();

    arborist()
        .arg(&path)
        .arg("--print")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn print_requires_a_file() {
    arborist()
        .arg("--print")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--print needs an outline file"));
}

#[test]
fn log_file_receives_debug_output() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);
    let log = dir.path().join("arborist.log");

    arborist()
        .arg(&path)
        .args(["--print", "--select", "fruit/apple"])
        .arg("--log")
        .arg(&log)
        .env_remove("RUST_LOG")
        .assert()
        .success();

    let contents = fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Starting Arborist"));
    assert!(contents.contains("Selected 1 item(s)"));
}

#[test]
fn interactive_mode_needs_a_terminal() {
    let dir = TempDir::new().unwrap();
    let path = write_outline(&dir);

    arborist()
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a terminal"));
}

#[test]
fn missing_file_fails() {
    let dir = TempDir::new().unwrap();

    arborist()
        .arg(dir.path().join("absent.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}
