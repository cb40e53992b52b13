//! CLI integration tests for docportal admin commands.
//!
//! Each test uses an isolated temp directory for the database, ensuring tests
//! can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

use std::path::Path;

use assert_cmd::Command;
use docportal::store::{SqliteStore, Store};
use docportal::types::Role;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().to_string_lossy().to_string()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("docportal").expect("failed to find binary");
        cmd.env("NO_COLOR", "1");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "init",
                "--data-dir",
                &self.data_dir_str(),
                "--non-interactive",
            ])
            .assert()
    }

    fn add_user(&self, username: &str, password: &str, role: &str) -> assert_cmd::assert::Assert {
        self.cmd()
            .args([
                "admin",
                "user",
                "add",
                "--data-dir",
                &self.data_dir_str(),
                "--username",
                username,
                "--password",
                password,
                "--role",
                role,
                "--non-interactive",
            ])
            .assert()
    }

    fn info_json(&self) -> Value {
        let output = self
            .cmd()
            .args([
                "admin",
                "info",
                "--data-dir",
                &self.data_dir_str(),
                "--json",
            ])
            .output()
            .expect("failed to run command");

        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("failed to parse JSON")
    }

    fn store(&self) -> SqliteStore {
        SqliteStore::new(self.data_dir().join("portal.db")).expect("failed to open store")
    }
}

#[test]
fn test_init_creates_database_and_uploads_dir() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Initialized portal data"));

    assert!(ctx.data_dir().join("portal.db").exists());
    assert!(ctx.data_dir().join("uploaded_files").is_dir());
}

#[test]
fn test_init_is_idempotent() {
    let ctx = TestContext::new();

    ctx.init().success();
    ctx.add_user("alice", "pw", "Student").success();
    ctx.init().success();

    let info = ctx.info_json();
    assert_eq!(info["users"].as_array().unwrap().len(), 1);
}

#[test]
fn test_init_with_admin_account() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args([
            "admin",
            "init",
            "--data-dir",
            &ctx.data_dir_str(),
            "--username",
            "bob",
            "--password",
            "x",
            "--non-interactive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created Admin account \"bob\""));

    let user = ctx.store().get_user_by_username("bob").unwrap().unwrap();
    assert_eq!(user.role, Role::Admin);
    assert_ne!(user.password_hash, "x");
}

#[test]
fn test_user_add_and_info() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.add_user("alice", "pw", "Student")
        .success()
        .stdout(predicate::str::contains("Created Student account \"alice\""));
    ctx.add_user("bob", "x", "Admin").success();

    let info = ctx.info_json();
    let users = info["users"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[0]["role"], "Student");
    assert_eq!(users[1]["role"], "Admin");
    assert!(users[0].get("password").is_none());
    assert!(info["documents"].as_array().unwrap().is_empty());
}

#[test]
fn test_user_add_duplicate_fails() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.add_user("alice", "pw", "Student").success();
    ctx.add_user("alice", "other", "Admin")
        .failure()
        .stderr(predicate::str::contains("already exists"));

    let info = ctx.info_json();
    assert_eq!(info["users"].as_array().unwrap().len(), 1);
    assert_eq!(info["users"][0]["role"], "Student");
}

#[test]
fn test_user_add_rejects_unknown_role() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.add_user("alice", "pw", "student").failure();
    ctx.add_user("alice", "pw", "Guest").failure();
}

#[test]
fn test_user_add_non_interactive_requires_flags() {
    let ctx = TestContext::new();
    ctx.init().success();

    ctx.cmd()
        .args([
            "admin",
            "user",
            "add",
            "--data-dir",
            &ctx.data_dir_str(),
            "--username",
            "alice",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--password is required"));
}

#[test]
fn test_commands_require_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["admin", "info", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("docportal admin init"));

    ctx.add_user("alice", "pw", "Student")
        .failure()
        .stderr(predicate::str::contains("Database not found"));
}

#[test]
fn test_info_summary() {
    let ctx = TestContext::new();
    ctx.init().success();
    ctx.add_user("alice", "pw", "Student").success();
    ctx.add_user("bob", "x", "Admin").success();

    ctx.cmd()
        .args(["admin", "info", "--data-dir", &ctx.data_dir_str()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Users:      2 (1 admin, 1 student)"))
        .stdout(predicate::str::contains("Documents:  0 (0 B)"));
}
