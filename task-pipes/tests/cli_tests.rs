// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use std::fs;
use std::path::PathBuf;
use std::process::Command;

fn worker_pool() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_worker-pool"));
    command.env("RUST_LOG", "off");
    command
}

/// Fresh directory holding a foreign `config.json`
fn dir_with_foreign_config(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("worker-pool-{}-{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.json"), r#"{ "num_mappers": 3 }"#).unwrap();
    dir
}

#[test]
fn test_single_task_reports_one_completion() {
    let output = worker_pool().args(["1", "1"]).output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Worker 1 did 1 tasks"), "{}", stdout);
    assert!(stdout.contains("Worker 2 did 0 tasks"), "{}", stdout);
    assert!(stdout.contains("Worker 3 did 0 tasks"), "{}", stdout);
    assert!(stdout.contains("Total: 1"), "{}", stdout);
}

#[test]
fn test_zero_tasks_is_rejected_without_report() {
    let output = worker_pool().args(["0", "1"]).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("num_tasks must be a positive integer"), "{}", stderr);
}

#[test]
fn test_missing_delay_is_rejected() {
    let output = worker_pool().args(["3"]).output().unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unreadable_config_file_is_rejected() {
    let output = worker_pool()
        .args(["2", "1", "--config", "does-not-exist.json"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_worker_count_flag_is_not_accepted() {
    let output = worker_pool()
        .args(["1", "1", "--workers", "18446744073709551615"])
        .output()
        .unwrap();
    // clap usage error, not a panic
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--workers"), "{}", stderr);
}

#[test]
fn test_config_json_in_working_directory_is_ignored() {
    let dir = dir_with_foreign_config("implicit");
    let output = worker_pool()
        .args(["1", "1"])
        .current_dir(&dir)
        .output()
        .unwrap();
    fs::remove_dir_all(&dir).ok();

    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Total: 1"), "{}", stdout);
}

#[test]
fn test_explicit_config_with_unknown_field_is_rejected() {
    let dir = dir_with_foreign_config("explicit");
    let output = worker_pool()
        .args(["1", "1", "--config", "config.json"])
        .current_dir(&dir)
        .output()
        .unwrap();
    fs::remove_dir_all(&dir).ok();

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("num_mappers"), "{}", stderr);
}
