//! Integration tests for the `init` command.

mod common;

use common::TestFixture;
use predicates::prelude::*;

#[test]
fn init_creates_default_config_file() {
    let fixture = TestFixture::new();

    report_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    let content = std::fs::read_to_string(fixture.path().join(".report-guard.toml")).unwrap();
    assert!(content.contains("[source]"));
    assert!(content.contains("[inspection]"));
}

#[test]
fn init_creates_config_at_custom_path() {
    let fixture = TestFixture::new();
    let custom_path = fixture.path().join("custom-config.toml");

    report_guard!()
        .current_dir(fixture.path())
        .args(["init", "--output", custom_path.to_str().unwrap()])
        .assert()
        .success();

    assert!(custom_path.exists());
}

#[test]
fn init_fails_if_config_exists() {
    let fixture = TestFixture::new();
    fixture.create_config("# existing config\n");

    report_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn init_force_overwrites_existing_config() {
    let fixture = TestFixture::new();
    fixture.create_config("[runner]\nconcurrency = 99\n");

    report_guard!()
        .current_dir(fixture.path())
        .args(["init", "--force"])
        .assert()
        .success();

    let content = std::fs::read_to_string(fixture.path().join(".report-guard.toml")).unwrap();
    assert!(!content.contains("concurrency = 99"));
    assert!(content.contains("concurrency = 4"));
}

#[test]
fn init_fails_without_parent_directories() {
    let fixture = TestFixture::new();
    let nested_path = fixture.path().join("config/nested/.report-guard.toml");

    report_guard!()
        .current_dir(fixture.path())
        .args(["init", "--output", nested_path.to_str().unwrap()])
        .assert()
        .code(2);
}

#[test]
fn init_template_is_valid_toml() {
    let fixture = TestFixture::new();

    report_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success();

    let content = std::fs::read_to_string(fixture.path().join(".report-guard.toml")).unwrap();
    let value: toml::Value = toml::from_str(&content).expect("template should be valid TOML");
    assert_eq!(value["source"]["encoding"].as_str(), Some("windows-1251"));
}

#[test]
fn unedited_template_is_rejected_by_check() {
    let fixture = TestFixture::new();

    report_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success();

    report_guard!()
        .current_dir(fixture.path())
        .args(["--quiet", "check"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Config"));
}

#[test]
fn edited_template_drives_check() {
    let fixture = TestFixture::new();
    fixture.create_file("reports/Branch A/ECH-1 report.txt");
    fixture.create_dir("reports/Branch B");

    report_guard!()
        .current_dir(fixture.path())
        .args(["init"])
        .assert()
        .success();

    let path = fixture.path().join(".report-guard.toml");
    let template = std::fs::read_to_string(&path).unwrap();
    let edited = template
        .replacen(
            "root = \"Укажите путь\"",
            &format!("root = {:?}", fixture.path_str("reports")),
            1,
        )
        .replacen("names = [\"Укажите путь\"]", "names = [\"ECH-1\"]", 1);
    std::fs::write(&path, edited).unwrap();

    report_guard!()
        .current_dir(fixture.path())
        .args(["--quiet", "--color", "never", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 present, 1 absent"));
}
