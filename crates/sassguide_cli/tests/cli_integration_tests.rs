//! End-to-end tests of the `sassguide` binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn sassguide(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sassguide"))
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .env_remove("SASSGUIDE_CONFIG")
        .output()
        .expect("failed to run sassguide")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Test a single ID selector gives exit code 1.
#[test]
fn test_lint_id_selector() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.scss"), "#lol-no {\n  color: red;\n}\n").unwrap();

    let output = sassguide(dir.path(), &["lint", "main.scss"]);
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("no-id-selector"));
    assert!(text.contains("1 error(s)"));
}

/// Test a clean file exits 0.
#[test]
fn test_lint_clean_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.scss"), ".avatar {\n  border-radius: 50%;\n}\n").unwrap();

    let output = sassguide(dir.path(), &["lint", "."]);
    assert_eq!(output.status.code(), Some(0));
}

/// Test warnings alone do not fail the run.
#[test]
fn test_lint_warnings_exit_zero() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("avatar.scss"),
        ".avatar{border-radius:50%;border:2px solid white; }",
    )
    .unwrap();

    let output = sassguide(dir.path(), &["lint", "avatar.scss", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let records = value["records"].as_array().unwrap();
    assert!(records.iter().any(|r| r["rule_id"] == "space-before-brace"));
    assert!(records.iter().all(|r| r["severity"] == "warning"));
}

/// Test a `.sass` input is a parse failure.
#[test]
fn test_lint_sass_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("legacy.sass"), ".a\n  color: red\n").unwrap();

    let output = sassguide(dir.path(), &["lint", "legacy.sass"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).contains("indented syntax is not supported"));
}

/// Test an unknown rule in `.sassguide.yml` is a configuration error.
#[test]
fn test_unknown_rule_in_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".sassguide.yml"), "rules:\n  no-such-rule:\n    enabled: false\n").unwrap();
    fs::write(dir.path().join("main.scss"), ".a {\n  color: red;\n}\n").unwrap();

    let output = sassguide(dir.path(), &["lint", "main.scss"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no-such-rule"));
}

/// Test usage errors exit with the configuration error code, not 2.
#[test]
fn test_usage_errors() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("main.scss"), ".a {\n  color: red;\n}\n").unwrap();

    let missing_paths = sassguide(dir.path(), &["lint"]);
    assert_eq!(missing_paths.status.code(), Some(3));
    assert!(!missing_paths.stderr.is_empty());

    let bad_format = sassguide(dir.path(), &["lint", "main.scss", "--format", "xml"]);
    assert_eq!(bad_format.status.code(), Some(3));

    let help = sassguide(dir.path(), &["--help"]);
    assert_eq!(help.status.code(), Some(0));
    assert!(stdout(&help).contains("lint"));
}

/// Test configuration can turn an error into a warning.
#[test]
fn test_config_severity_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("custom.yml"),
        "rules:\n  no-id-selector:\n    severity: warning\n",
    )
    .unwrap();
    fs::write(dir.path().join("main.scss"), "#lol-no {\n  color: red;\n}\n").unwrap();

    let output = sassguide(dir.path(), &["lint", "main.scss", "--config", "custom.yml"]);
    assert_eq!(output.status.code(), Some(0));
}

/// Test `fix` rewrites the file in place.
#[test]
fn test_fix_in_place() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.scss");
    fs::write(&path, ".card{border:none}").unwrap();

    let output = sassguide(dir.path(), &["fix", "card.scss"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&path).unwrap(), ".card {\n  border: 0;\n}\n");
}

/// Test `fix --dry-run` prints the diff and keeps the file.
#[test]
fn test_fix_dry_run() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("card.scss");
    fs::write(&path, ".card{border:none}").unwrap();

    let output = sassguide(dir.path(), &["fix", "--dry-run", "card.scss"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&path).unwrap(), ".card{border:none}");
    assert!(stdout(&output).contains("+  border: 0;"));
}

/// Test `fix` keeps an include whose arguments hold a line comment.
#[test]
fn test_fix_include_with_line_comment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("button.scss");
    let source = ".btn {\n  @include button(\n    $size: 1, // big\n    $color: red\n  );\n}\n";
    fs::write(&path, source).unwrap();

    let output = sassguide(dir.path(), &["fix", "button.scss"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(fs::read_to_string(&path).unwrap(), source);
}

/// Test `rules` lists the catalog.
#[test]
fn test_rules_listing() {
    let dir = TempDir::new().unwrap();
    let output = sassguide(dir.path(), &["rules", "--format", "json"]);
    assert_eq!(output.status.code(), Some(0));
    let rules: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    let ids: Vec<&str> = rules
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&"no-id-selector"));
    assert!(ids.contains(&"formatting"));
    assert!(ids.contains(&"media-query-locality"));
}
