//! End-to-end CLI tests: exit codes, option sources, artifacts.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn versionfix() -> Command {
    let mut cmd = Command::cargo_bin("versionfix").expect("versionfix binary");
    for (key, _) in std::env::vars() {
        if key.starts_with("VERSIONFIX_") {
            cmd.env_remove(key);
        }
    }
    cmd
}

const CLEAN_SNAPSHOT: &str = r#"{
  "tags": [
    { "name": "v1.0.0", "sha": "aaa111" },
    { "name": "v1.0", "sha": "aaa111" },
    { "name": "v1", "sha": "aaa111" }
  ],
  "releases": [
    { "tag_name": "v1.0.0", "id": 1, "immutable": true }
  ]
}"#;

const BEHIND_SNAPSHOT: &str = r#"{
  "tags": [
    { "name": "v1.0.0", "sha": "aaa111" },
    { "name": "v1.1.0", "sha": "bbb222" },
    { "name": "v1.0", "sha": "aaa111" },
    { "name": "v1.1", "sha": "bbb222" },
    { "name": "v1", "sha": "aaa111" }
  ]
}"#;

fn repo_with(snapshot: &str) -> TempDir {
    let td = tempfile::tempdir().expect("tempdir");
    fs::write(td.path().join("versionfix.snapshot.json"), snapshot).unwrap();
    td
}

fn read_json(path: &Path) -> serde_json::Value {
    let contents = fs::read_to_string(path).expect("read json");
    serde_json::from_str(&contents).expect("parse json")
}

#[test]
fn test_clean_snapshot_exits_zero_and_writes_artifacts() {
    let temp = repo_with(CLEAN_SNAPSHOT);

    versionfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues found."));

    let out = temp.path().join("artifacts/versionfix");
    let report = read_json(&out.join("report.json"));
    assert_eq!(report["schema"], "versionfix.report.v1");
    assert_eq!(report["summary"]["total_issues"], 0);
    assert!(out.join("summary.md").exists());
}

#[test]
fn test_issues_exit_two_with_manual_commands() {
    let temp = repo_with(BEHIND_SNAPSHOT);

    versionfix()
        .current_dir(temp.path())
        .args(["check", "--check-releases", "none"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("incorrect_version"))
        .stdout(predicate::str::contains(
            "git push origin bbb222:refs/tags/v1 --force",
        ));
}

#[test]
fn test_invalid_option_value_exits_one_naming_option() {
    let temp = repo_with(CLEAN_SNAPSHOT);

    versionfix()
        .current_dir(temp.path())
        .args(["check", "--check-minor-version", "sometimes"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("check-minor-version"));
}

#[test]
fn test_missing_snapshot_exits_one() {
    let temp = tempfile::tempdir().expect("tempdir");

    versionfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("versionfix.snapshot.json"));
}

#[test]
fn test_env_override_applies() {
    let temp = repo_with(
        r#"{ "tags": [
            { "name": "v1.0.0", "sha": "aaa111" },
            { "name": "v1.0", "sha": "aaa111" },
            { "name": "v1", "sha": "aaa111" }
        ] }"#,
    );

    versionfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .code(2)
        .stdout(predicate::str::contains("missing_release"));

    versionfix()
        .current_dir(temp.path())
        .env("VERSIONFIX_CHECK_RELEASES", "none")
        .env("VERSIONFIX_CHECK_RELEASE_IMMUTABILITY", "none")
        .arg("check")
        .assert()
        .success();
}

#[test]
fn test_config_file_is_discovered() {
    let temp = repo_with(BEHIND_SNAPSHOT);
    fs::write(
        temp.path().join("versionfix.toml"),
        r#"
out-dir = "reports"

[checks]
check-releases = "none"
ignore-versions = ["v1.1*"]
"#,
    )
    .unwrap();

    versionfix()
        .current_dir(temp.path())
        .arg("check")
        .assert()
        .success();

    assert!(temp.path().join("reports/report.json").exists());
}

#[test]
fn test_cli_flag_beats_config_file() {
    let temp = repo_with(BEHIND_SNAPSHOT);
    fs::write(
        temp.path().join("versionfix.toml"),
        r#"
[checks]
check-releases = "none"
check-minor-version = "sometimes"
"#,
    )
    .unwrap();

    versionfix()
        .current_dir(temp.path())
        .args(["check", "--check-minor-version", "none"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("incorrect_version"));
}

#[test]
fn test_auto_fix_writes_snapshot() {
    let temp = repo_with(BEHIND_SNAPSHOT);
    let fixed = temp.path().join("fixed.json");

    versionfix()
        .current_dir(temp.path())
        .args(["check", "--auto-fix", "--check-releases", "none"])
        .arg("--write-snapshot")
        .arg(&fixed)
        .assert()
        .success()
        .stdout(predicate::str::contains("fixed 1"));

    let snapshot = read_json(&fixed);
    let v1 = snapshot["tags"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "v1")
        .cloned()
        .unwrap();
    assert_eq!(v1["sha"], "bbb222");

    let report = read_json(&temp.path().join("artifacts/versionfix/report.json"));
    assert_eq!(report["summary"]["mode"], "auto_fix");
    assert_eq!(report["summary"]["fixed"], 1);

    // The input snapshot is untouched when --write-snapshot is given.
    let original = read_json(&temp.path().join("versionfix.snapshot.json"));
    let v1 = original["tags"]
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["name"] == "v1")
        .cloned()
        .unwrap();
    assert_eq!(v1["sha"], "aaa111");
}

#[test]
fn test_explain_known_issue() {
    versionfix()
        .args(["explain", "draft-release"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Release is still a draft"))
        .stdout(predicate::str::contains("gh release edit"));
}

#[test]
fn test_explain_unknown_issue() {
    versionfix()
        .args(["explain", "no-such-issue"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown issue type"));
}

#[test]
fn test_list_rules_json() {
    let output = versionfix()
        .args(["list-rules", "--format", "json"])
        .output()
        .expect("run list-rules");
    assert!(output.status.success());

    let rules: Vec<serde_json::Value> =
        serde_json::from_slice(&output.stdout).expect("rules json");
    assert_eq!(rules.len(), 11);
    assert_eq!(rules[0]["id"], "ambiguous_ref");
    assert_eq!(rules[10]["id"], "floating_release");
}

#[test]
fn test_list_rules_text() {
    versionfix()
        .arg("list-rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("major_tracks_highest"));
}

#[test]
fn test_unknown_subcommand_fails() {
    versionfix().arg("plan").assert().failure();
}
