//! End-to-end tests that invoke the compiled `pgcheck` binary as a subprocess.
//!
//! These tests exercise the full pipeline including CLI argument parsing,
//! config loading, file selection, report rendering, and exit codes.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pgcheck::Violation;

/// Locate the compiled binary built by `cargo test`.
fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pgcheck"))
}

/// Run the binary in `dir` with the given arguments.
fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(binary_path())
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to execute pgcheck binary")
}

/// A temp dir holding one migration file per `(name, contents)` pair.
fn migrations(files: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    for (name, contents) in files {
        std::fs::write(dir.path().join(name), contents).expect("write migration");
    }
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn json_report(output: &Output) -> Vec<Violation> {
    serde_json::from_slice(&output.stdout).expect("stdout is a JSON report")
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_drop_column_reported_on_line_one() {
    let dir = migrations(&[("001.sql", "ALTER TABLE t DROP COLUMN v;")]);
    let output = run_in(dir.path(), &["lint", "--format", "json", "*.sql"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let report = json_report(&output);
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].code.as_str(), "drop-column");
    assert_eq!(report[0].statement_line, 1);
}

#[test]
fn test_create_table_without_guard() {
    let dir = migrations(&[("001.sql", "CREATE TABLE t (id int PRIMARY KEY);")]);
    let output = run_in(dir.path(), &["lint", "--format", "json", "001.sql"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let codes: Vec<String> = json_report(&output)
        .iter()
        .map(|v| v.code.to_string())
        .collect();
    assert_eq!(codes, vec!["missing-if-not-exists"]);
}

#[test]
fn test_inline_directive_suppresses() {
    let dir = migrations(&[(
        "001.sql",
        "-- nolint:drop-column\nALTER TABLE t DROP COLUMN v;",
    )]);
    let output = run_in(dir.path(), &["lint", "--format", "json", "001.sql"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(json_report(&output).is_empty());
}

#[test]
fn test_no_files_found() {
    let dir = migrations(&[]);
    let output = run_in(dir.path(), &["lint", "*.sql"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(
        stderr(&output).contains("no files found"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn test_json_report_records() {
    let dir = migrations(&[("001.sql", "SELECT 1;\n\nALTER TABLE t DROP COLUMN v;\n")]);
    let output = run_in(dir.path(), &["lint", "--format", "json", "001.sql"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    insta::assert_json_snapshot!(json_report(&output), @r#"
    [
      {
        "file": "001.sql",
        "code": "drop-column",
        "statement": "ALTER TABLE t DROP COLUMN v",
        "statementLine": 3,
        "slug": "Dropping a column is not backwards compatible and may break existing clients",
        "help": "Update the application code to no longer use the column before applying the change"
      }
    ]
    "#);
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

#[test]
fn test_text_report() {
    let dir = migrations(&[("001.sql", "DROP TABLE a;\n")]);
    let output = run_in(dir.path(), &["lint", "--no-color", "001.sql"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.starts_with("drop-table: 001.sql:1\n\n  1 | DROP TABLE a\n"));
    assert!(text.contains("  Explanation: run `pgcheck explain drop-table`\n"));
    assert!(text.ends_with("1 violation(s) found in 1 file(s)\n"));
    assert!(!text.contains('\x1b'));
}

#[test]
fn test_text_report_clean() {
    let dir = migrations(&[("001.sql", "CREATE TABLE IF NOT EXISTS t (id int);\n")]);
    let output = run_in(dir.path(), &["lint", "001.sql"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "0 violations found\n");
}

#[test]
fn test_files_reported_in_sorted_order() {
    let dir = migrations(&[
        ("002.sql", "DROP TABLE b;"),
        ("001.sql", "DROP TABLE a;"),
    ]);
    let output = run_in(dir.path(), &["lint", "--format", "json", "002.sql", "*.sql"]);

    let files: Vec<String> = json_report(&output).into_iter().map(|v| v.file).collect();
    assert_eq!(files, vec!["001.sql", "002.sql"]);
}

// ---------------------------------------------------------------------------
// Exit codes and errors
// ---------------------------------------------------------------------------

#[test]
fn test_fail_on_violations_exits_one() {
    let dir = migrations(&[("001.sql", "DROP TABLE a;")]);
    let output = run_in(dir.path(), &["lint", "--fail-on-violations", "001.sql"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("drop-table"));
}

#[test]
fn test_fail_on_violations_clean_exits_zero() {
    let dir = migrations(&[("001.sql", "SELECT 1;")]);
    let output = run_in(dir.path(), &["lint", "--fail-on-violations", "001.sql"]);

    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_unknown_format_exits_two() {
    let dir = migrations(&[("001.sql", "DROP TABLE a;")]);
    let output = run_in(dir.path(), &["lint", "--format", "sarif", "001.sql"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("sarif"));
}

#[test]
fn test_parse_error_aborts_whole_run() {
    let dir = migrations(&[
        ("001.sql", "DROP TABLE a;"),
        ("002.sql", "ALTER TABLE;"),
    ]);
    let output = run_in(dir.path(), &["lint", "*.sql"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("002.sql"), "stderr: {}", stderr(&output));
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn test_config_disables_rule() {
    let dir = migrations(&[
        ("001.sql", "DROP TABLE a;"),
        ("pgcheck.yaml", "rules:\n  drop-table:\n    enabled: false\n"),
    ]);
    let output = run_in(
        dir.path(),
        &["lint", "--config", "pgcheck.yaml", "--format", "json", "*.sql"],
    );

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(json_report(&output).is_empty());
}

#[test]
fn test_config_enables_experimental_rule() {
    let dir = migrations(&[
        (
            "001.sql",
            "BEGIN;\nALTER TABLE a ADD COLUMN x int;\nALTER TABLE b ADD COLUMN y int;\nCOMMIT;",
        ),
        ("pgcheck.yaml", "rules:\n  multiple-locks:\n    enabled: true\n"),
    ]);

    let output = run_in(dir.path(), &["lint", "--format", "json", "001.sql"]);
    assert!(json_report(&output).is_empty());

    let output = run_in(
        dir.path(),
        &["lint", "--config", "pgcheck.yaml", "--format", "json", "001.sql"],
    );
    let report = json_report(&output);
    assert_eq!(report.len(), 1);
    assert_eq!(report[0].code.as_str(), "multiple-locks");
    assert_eq!(report[0].statement_line, 3);
}

#[test]
fn test_missing_config_exits_two() {
    let dir = migrations(&[("001.sql", "DROP TABLE a;")]);
    let output = run_in(dir.path(), &["lint", "--config", "nope.yaml", "001.sql"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("nope.yaml"));
}

#[test]
fn test_config_with_unknown_code_exits_two() {
    let dir = migrations(&[
        ("001.sql", "DROP TABLE a;"),
        ("pgcheck.yaml", "rules:\n  drop-everything:\n    enabled: false\n"),
    ]);
    let output = run_in(dir.path(), &["lint", "--config", "pgcheck.yaml", "001.sql"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("drop-everything"));
}

// ---------------------------------------------------------------------------
// rules / explain
// ---------------------------------------------------------------------------

#[test]
fn test_rules_json_lists_catalog() {
    let dir = migrations(&[]);
    let output = run_in(dir.path(), &["rules", "--format", "json"]);

    assert_eq!(output.status.code(), Some(0));
    let rules: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rules.len(), 13);
    assert_eq!(rules[0]["code"], "drop-column");
    assert_eq!(rules[0]["category"], "breaking change");

    let multiple_locks = rules
        .iter()
        .find(|r| r["code"] == "multiple-locks")
        .unwrap();
    assert_eq!(multiple_locks["enabledByDefault"], false);
}

#[test]
fn test_rules_text() {
    let dir = migrations(&[]);
    let output = run_in(dir.path(), &["rules"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("concurrent-in-tx\n"));
    assert!(text.contains("\tCategory: types\n"));
}

#[test]
fn test_explain() {
    let dir = migrations(&[]);
    let output = run_in(dir.path(), &["explain", "missing-foreign-key-index"]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.starts_with("Rule: missing-foreign-key-index\n"));
    assert!(text.contains("Category: miscellaneous"));
}

#[test]
fn test_explain_unknown_rule() {
    let dir = migrations(&[]);
    let output = run_in(dir.path(), &["explain", "drop-everything"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("drop-everything"));
}
