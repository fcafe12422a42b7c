//! CLI integration tests
//!
//! These tests run the `hiltlint` binary against temporary projects and check
//! its output formats and exit status.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const FRAGMENT: &str = r#"package com.example

import androidx.fragment.app.Fragment
import dagger.hilt.android.AndroidEntryPoint

@AndroidEntryPoint
class ExampleFragment : Fragment()
"#;

fn activity(annotated: bool) -> String {
    let annotation = if annotated { "@AndroidEntryPoint\n" } else { "" };
    format!(
        r#"package com.example

import androidx.appcompat.app.AppCompatActivity
import dagger.hilt.android.AndroidEntryPoint

{annotation}class MainActivity : AppCompatActivity() {{
    private val fragment = ExampleFragment()
}}
"#
    )
}

/// A project with one fragment used from `MainActivity`
fn project(activity_annotated: bool) -> TempDir {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("app/src/main/java/com/example");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("ExampleFragment.kt"), FRAGMENT).unwrap();
    fs::write(dir.join("MainActivity.kt"), activity(activity_annotated)).unwrap();
    temp
}

fn hiltlint(path: &Path) -> Command {
    let mut cmd = Command::cargo_bin("hiltlint").unwrap();
    cmd.arg(path);
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_cli_help() {
    Command::cargo_bin("hiltlint")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("hiltlint"))
        .stdout(predicate::str::contains("--parallel"))
        .stdout(predicate::str::contains("--view-binding"))
        .stdout(predicate::str::contains("--exit-zero"));
}

#[test]
fn test_cli_version() {
    Command::cargo_bin("hiltlint")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("hiltlint"));
}

#[test]
fn test_cli_empty_project() {
    let temp = TempDir::new().unwrap();
    hiltlint(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No Kotlin or Java files found."));
}

// ============================================================================
// Exit status
// ============================================================================

#[test]
fn test_cli_reports_missing_entry_point() {
    let temp = project(false);
    hiltlint(temp.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("RequiresAndroidEntryPoint"))
        .stdout(predicate::str::contains(
            "com.example.MainActivity must be annotated with @AndroidEntryPoint.",
        ));
}

#[test]
fn test_cli_exit_zero() {
    let temp = project(false);
    hiltlint(temp.path()).arg("--exit-zero").assert().success();
}

#[test]
fn test_cli_clean_project() {
    let temp = project(true);
    hiltlint(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No missing entry points found!"));
}

#[test]
fn test_cli_parallel() {
    let temp = project(false);
    hiltlint(temp.path())
        .args(["--parallel", "--quiet", "--format", "json"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"total_issues\": 1"));
}

// ============================================================================
// Output formats
// ============================================================================

#[test]
fn test_cli_json_output() {
    let temp = project(false);
    let output = hiltlint(temp.path())
        .args(["--format", "json", "--quiet", "--exit-zero"])
        .output()
        .unwrap();

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total_issues"], 1);
    assert_eq!(value["issues"][0]["id"], "RequiresAndroidEntryPoint");
    assert_eq!(value["issues"][0]["severity"], "error");
    assert_eq!(value["issues"][0]["line"], 7);
}

#[test]
fn test_cli_sarif_output_file() {
    let temp = project(false);
    let report = temp.path().join("report.sarif");

    hiltlint(temp.path())
        .args(["--format", "sarif", "--exit-zero", "--output"])
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("SARIF report written to"));

    let contents = fs::read_to_string(&report).unwrap();
    assert!(contents.contains("\"version\": \"2.1.0\""));
    assert!(contents.contains("\"ruleId\": \"RequiresAndroidEntryPoint\""));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_cli_config_file_marker_names() {
    let temp = project(false);
    fs::write(
        temp.path().join(".hiltlint.yml"),
        "hilt:\n  entry_point_annotation: com.acme.EntryPoint\n",
    )
    .unwrap();

    // `@AndroidEntryPoint` no longer names the configured marker
    hiltlint(temp.path()).assert().success();
}

#[test]
fn test_cli_exclude_pattern() {
    let temp = project(false);
    hiltlint(temp.path())
        .args(["--exclude", "**/com/example/**"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No Kotlin or Java files found."));
}

#[test]
fn test_cli_invalid_config() {
    let temp = project(false);
    let config = temp.path().join("broken.toml");
    fs::write(&config, "hilt = [").unwrap();

    hiltlint(temp.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse TOML config"));
}
