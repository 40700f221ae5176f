//! Integration tests for mkcpio-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use mkcpio_core::format::newc::trailer_bytes;
use mkcpio_core::test_utils::parse_archive;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn mkcpio_cmd() -> Command {
    cargo_bin_cmd!("mkcpio")
}

fn inputs(temp: &TempDir) -> (PathBuf, PathBuf) {
    let elf = temp.path().join("build").join("kernel.elf");
    let dtb = temp.path().join("kernel.dtb");
    fs::create_dir_all(elf.parent().unwrap()).unwrap();
    fs::write(&elf, vec![0x7f; 1000]).unwrap();
    fs::write(&dtb, vec![0xd0; 200]).unwrap();
    (elf, dtb)
}

#[test]
fn test_version_flag() {
    mkcpio_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mkcpio"));
}

#[test]
fn test_help_flag() {
    mkcpio_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("OUTPUT"));
}

#[test]
fn test_no_arguments_is_usage_error() {
    mkcpio_cmd().assert().code(64);
}

#[test]
fn test_missing_files_is_usage_error() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let output = temp.path().join("out.cpio");

    mkcpio_cmd().arg(&output).assert().code(64);
    assert!(!output.exists());
}

#[test]
fn test_unknown_flag_is_usage_error() {
    mkcpio_cmd()
        .args(["--frobnicate", "out.cpio", "a"])
        .assert()
        .code(64)
        .stderr(predicate::str::contains("--frobnicate"));
}

#[test]
fn test_create_archive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, dtb) = inputs(&temp);
    let output = temp.path().join("out.cpio");

    mkcpio_cmd()
        .arg(&output)
        .arg(&elf)
        .arg(&dtb)
        .assert()
        .success()
        .stdout(predicate::str::contains("Archive created"))
        .stdout(predicate::str::contains("Files added:      2"));

    let entries = parse_archive(&fs::read(&output).unwrap()).unwrap();
    let names: Vec<String> = entries.iter().map(|e| e.name_str()).collect();
    assert_eq!(names, ["kernel.elf", "kernel.dtb"]);
    assert_eq!(entries[0].data.len(), 1000);
    assert_eq!(entries[1].data.len(), 200);
}

#[test]
fn test_skipped_files_warn_and_succeed() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);
    let output = temp.path().join("out.cpio");
    let missing = temp.path().join("missing.bin");

    mkcpio_cmd()
        .arg(&output)
        .arg(&missing)
        .arg(temp.path().join("build"))
        .arg(&elf)
        .assert()
        .success()
        .stderr(predicate::str::contains("skipping"))
        .stderr(predicate::str::contains("couldn't open"))
        .stderr(predicate::str::contains("not a regular file (directory)"))
        .stdout(predicate::str::contains("Files skipped:    2"));

    let entries = parse_archive(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, b"kernel.elf");
}

#[test]
fn test_all_skipped_writes_trailer_only() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let output = temp.path().join("out.cpio");

    mkcpio_cmd()
        .arg(&output)
        .arg("nonexistent/dir/")
        .assert()
        .success()
        .stderr(predicate::str::contains("nonsense filename"));

    assert_eq!(fs::read(&output).unwrap(), trailer_bytes());
}

#[test]
fn test_unwritable_destination() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);

    mkcpio_cmd()
        .arg(temp.path().join("no/such/dir/out.cpio"))
        .arg(&elf)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("Cannot create archive"));
}

#[test]
fn test_invalid_buffer_size() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);

    mkcpio_cmd()
        .args(["--buffer-size", "64"])
        .arg(temp.path().join("out.cpio"))
        .arg(&elf)
        .assert()
        .code(70)
        .stderr(predicate::str::contains("--buffer-size"));
}

#[test]
fn test_malformed_buffer_size_is_usage_error() {
    mkcpio_cmd()
        .args(["--buffer-size", "lots", "out.cpio", "a"])
        .assert()
        .code(64);
}

#[test]
fn test_output_is_reproducible() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, dtb) = inputs(&temp);
    let first = temp.path().join("first.cpio");
    let second = temp.path().join("second.cpio");

    mkcpio_cmd().arg(&first).arg(&elf).arg(&dtb).assert().success();
    mkcpio_cmd()
        .args(["--buffer-size", "1K"])
        .arg(&second)
        .arg(&elf)
        .arg(&dtb)
        .assert()
        .success();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_quiet_suppresses_summary() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);

    mkcpio_cmd()
        .arg("--quiet")
        .arg(temp.path().join("out.cpio"))
        .arg(&elf)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_verbose_lists_entries() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);

    mkcpio_cmd()
        .arg("--verbose")
        .arg(temp.path().join("out.cpio"))
        .arg(&elf)
        .assert()
        .success()
        .stdout(predicate::str::contains("adding"))
        .stdout(predicate::str::contains("Duration"));
}

#[test]
fn test_json_output() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, dtb) = inputs(&temp);

    let assert = mkcpio_cmd()
        .arg("--json")
        .arg(temp.path().join("out.cpio"))
        .arg(&elf)
        .arg(temp.path().join("missing"))
        .arg(&dtb)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["operation"], "create");
    assert_eq!(json["status"], "success");
    assert_eq!(json["data"]["files_added"], 2);
    assert_eq!(json["data"]["files_skipped"], 1);
    assert_eq!(json["data"]["bytes_written"], 124 + 1000 + 124 + 200 + 124);

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stderr.contains("\"operation\":\"skip\""));
}

#[cfg(unix)]
#[test]
fn test_no_follow_symlinks() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);
    let link = temp.path().join("linked.elf");
    std::os::unix::fs::symlink(&elf, &link).unwrap();
    let output = temp.path().join("out.cpio");

    mkcpio_cmd()
        .arg("--no-follow-symlinks")
        .arg(&output)
        .arg(&link)
        .assert()
        .success()
        .stderr(predicate::str::contains("not a regular file (symlink)"));
    assert_eq!(fs::read(&output).unwrap(), trailer_bytes());

    mkcpio_cmd().arg(&output).arg(&link).assert().success();
    let entries = parse_archive(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(entries[0].name, b"linked.elf");
}

#[cfg(target_os = "linux")]
#[test]
fn test_grown_source_is_reported_as_truncated() {
    let status = PathBuf::from("/proc/self/status");
    if fs::metadata(&status).map(|m| m.len()).unwrap_or(1) != 0 {
        return;
    }
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);
    let output = temp.path().join("out.cpio");

    mkcpio_cmd()
        .arg(&output)
        .arg(&status)
        .arg(&elf)
        .assert()
        .success()
        .stderr(predicate::str::contains("truncated /proc/self/status"))
        .stderr(predicate::str::contains("abandoning").not());

    let entries = parse_archive(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(entries[0].name, b"status");
    assert_eq!(entries[1].name, b"kernel.elf");
}

#[cfg(target_os = "linux")]
#[test]
fn test_short_source_keeps_archive_valid() {
    let short = PathBuf::from("/sys/kernel/uevent_seqnum");
    let Ok(meta) = fs::metadata(&short) else {
        return;
    };
    if meta.len() <= fs::read(&short).map(|d| d.len() as u64).unwrap_or(0) {
        return;
    }
    let temp = TempDir::new().expect("failed to create temp dir");
    let (elf, _) = inputs(&temp);
    let output = temp.path().join("out.cpio");

    mkcpio_cmd()
        .arg(&output)
        .arg(&short)
        .arg(&elf)
        .assert()
        .success()
        .stderr(predicate::str::contains("truncated /sys/kernel/uevent_seqnum"));

    let entries = parse_archive(&fs::read(&output).unwrap()).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].data.len(), 1000);
}
