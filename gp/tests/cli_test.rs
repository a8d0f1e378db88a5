//! Command-line behaviour of the gitpuller binary

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

fn gitpuller() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gitpuller"))
}

#[test]
fn test_help_lists_flags() {
    gitpuller()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--branch"))
        .stdout(predicate::str::contains("--interval"))
        .stdout(predicate::str::contains("REPO_PATH"))
        .stdout(predicate::str::contains("Required Tools"));
}

#[test]
fn test_missing_repo_path_is_usage_error() {
    gitpuller().assert().failure().stderr(predicate::str::contains("REPO_PATH"));
}

#[test]
fn test_zero_interval_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    gitpuller()
        .arg(dir.path())
        .args(["--interval", "0"])
        .assert()
        .failure();
}

#[test]
fn test_non_repository_exits_non_zero_and_logs() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = dir.path().join("gitpuller.log");

    gitpuller()
        .arg(dir.path())
        .arg("--log-file")
        .arg(&log_file)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a git repository"));

    let written = std::fs::read_to_string(&log_file).expect("log file should exist");
    assert!(written.contains("ERROR"));
    assert!(written.contains("not a git repository"));
}

#[test]
fn test_bad_config_file_exits_non_zero() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let config = dir.path().join("gitpuller.yml");
    std::fs::write(&config, "monitor: [not, a, mapping]\n").unwrap();

    gitpuller()
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_broken_local_config_is_reported_after_logging_starts() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = dir.path().join("gitpuller.log");
    std::fs::write(dir.path().join(".gitpuller.yml"), "monitor: [not, a, mapping]\n").unwrap();

    // Skipped config falls back to defaults; the non-repository path then ends the run
    gitpuller()
        .arg(dir.path())
        .arg("--log-file")
        .arg(&log_file)
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config from .gitpuller.yml"))
        .stderr(predicate::str::contains("WARN"));

    let written = std::fs::read_to_string(&log_file).expect("log file should exist");
    assert!(written.contains("Failed to load config from .gitpuller.yml"));
}
