//! CLI smoke tests for commands that need no network access.
//!
//! stdout is not a terminal under the test harness, so every command
//! prints JSON.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn md2issues(cwd: &Path) -> Command {
    let mut cmd = Command::cargo_bin("md2issues").unwrap();
    cmd.current_dir(cwd)
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG")
        .env("GH_CONFIG_DIR", cwd.join("no-gh-config"));
    cmd
}

fn write_issues(dir: &Path) {
    fs::create_dir_all(dir).unwrap();
    fs::write(
        dir.join("epic.md"),
        "---\ntitle: Login Epic\ntype: Epic\n---\nAll things login.\n",
    )
    .unwrap();
    fs::write(
        dir.join("task.md"),
        "---\ntitle: Login form\nparent: Login Epic\nlabels: ui, auth\n---\nBuild the form.\n",
    )
    .unwrap();
    fs::write(
        dir.join("bug.md"),
        "---\ntitle: Crash on logout\nid: 17\n---\n",
    )
    .unwrap();
}

#[test]
fn test_version() {
    let dir = TempDir::new().unwrap();
    md2issues(dir.path())
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")))
        .stdout(predicate::str::contains("\"name\":\"md2issues\""));
}

#[test]
fn test_list_prints_front_matter() {
    let dir = TempDir::new().unwrap();
    write_issues(&dir.path().join("issues"));
    fs::write(dir.path().join("issues/broken.md"), "no front matter\n").unwrap();

    md2issues(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\":\"Login form\""))
        .stdout(predicate::str::contains("\"labels\":\"ui, auth\""))
        .stdout(predicate::str::contains("missing opening"))
        .stdout(predicate::str::contains("Build the form").not());
}

#[test]
fn test_list_missing_folder() {
    let dir = TempDir::new().unwrap();
    md2issues(dir.path())
        .args(["list", "--folder", "nowhere"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("DIRECTORY_UNREADABLE"));
}

#[test]
fn test_examples_writes_linked_set() {
    let dir = TempDir::new().unwrap();
    md2issues(dir.path())
        .args(["examples", "--output", "generated"])
        .assert()
        .success();

    let count = fs::read_dir(dir.path().join("generated")).unwrap().count();
    assert_eq!(count, 9);
    let child = fs::read_to_string(dir.path().join("generated/epic-child-example.md")).unwrap();
    assert!(child.contains("parent: User Authentication System Epic"));
}

#[test]
fn test_examples_single_type_with_overrides() {
    let dir = TempDir::new().unwrap();
    md2issues(dir.path())
        .args(["examples", "-o", "out", "--type", "task", "--title", "Write docs"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("out/task-example.md")).unwrap();
    assert!(content.starts_with("---\ntitle: Write docs\ntype: Task\n"));
}

#[test]
fn test_examples_unknown_type() {
    let dir = TempDir::new().unwrap();
    md2issues(dir.path())
        .args(["examples", "--type", "story"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("INVALID_ARGUMENT"));
}

#[test]
fn test_create_dry_run_needs_no_token() {
    let dir = TempDir::new().unwrap();
    write_issues(&dir.path().join("issues"));

    md2issues(dir.path())
        .args(["create", "--dry-run", "--owner", "acme", "--repo", "tools"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"dry_run\":true"))
        .stdout(predicate::str::contains("\"created\":2"))
        .stdout(predicate::str::contains("\"updated\":1"))
        .stdout(predicate::str::contains("\"repository\":\"acme/tools\""));

    // Nothing is written back in a dry run.
    let task = fs::read_to_string(dir.path().join("issues/task.md")).unwrap();
    assert!(!task.contains("id:"));
}

#[test]
fn test_create_without_token_fails_before_reading() {
    let dir = TempDir::new().unwrap();

    md2issues(dir.path())
        .args(["create", "--owner", "acme", "--folder", "nowhere"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("MISSING_TOKEN"));
}

#[test]
fn test_create_reads_token_from_gh_hosts_file() {
    let dir = TempDir::new().unwrap();
    let gh = dir.path().join("gh");
    fs::create_dir(&gh).unwrap();
    fs::write(gh.join("hosts.yml"), "github.com:\n    oauth_token: gho_test\n").unwrap();

    // The token is found, so the next fatal error is the missing folder.
    md2issues(dir.path())
        .env("GH_CONFIG_DIR", &gh)
        .args(["create", "--owner", "acme", "--folder", "nowhere"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("DIRECTORY_UNREADABLE"));
}

#[test]
fn test_create_rejects_malformed_gh_hosts_file() {
    let dir = TempDir::new().unwrap();
    let gh = dir.path().join("gh");
    fs::create_dir(&gh).unwrap();
    fs::write(gh.join("hosts.yml"), "- not\n- a host map\n").unwrap();

    md2issues(dir.path())
        .env("GH_CONFIG_DIR", &gh)
        .args(["create", "--owner", "acme", "--folder", "nowhere"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("CONFIG_ERROR"))
        .stderr(predicate::str::contains("hosts.yml"));
}
