//! Integration tests for warpack-cli.
//!
//! Note: Tests use `unwrap`/`expect` which is acceptable in test code.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs::File;
use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::path::PathBuf;
use std::process::Stdio;
use std::thread;
use std::time::Duration;
use std::time::Instant;
use tempfile::TempDir;
use warpack_core::ControlClient;
use zip::CompressionMethod;
use zip::ZipArchive;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

fn warpack_cmd() -> Command {
    cargo_bin_cmd!("warpack")
}

fn launcher_cmd() -> Command {
    cargo_bin_cmd!("warpack-launcher")
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut zip = ZipWriter::new(File::create(path).expect("failed to create archive"));
    for (name, data) in entries {
        zip.start_file(*name, SimpleFileOptions::default())
            .expect("failed to start entry");
        zip.write_all(data).expect("failed to write entry");
    }
    zip.finish().expect("failed to finish archive");
}

fn inputs(temp: &TempDir) -> (PathBuf, PathBuf) {
    let launcher = temp.path().join("launcher.jar");
    let application = temp.path().join("shop.war");
    write_zip(
        &launcher,
        &[
            ("META-INF/MANIFEST.MF", b"Main-Class: X\n"),
            ("boot/run.bin", b"BOOT"),
        ],
    );
    write_zip(
        &application,
        &[
            ("META-INF/MANIFEST.MF", b"Main-Class: Y\n"),
            ("webapp/index.html", b"<html/>"),
        ],
    );
    (launcher, application)
}

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[test]
fn test_version_flag() {
    warpack_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("warpack"));
}

#[test]
fn test_too_few_arguments_prints_usage() {
    warpack_cmd()
        .args(["launcher.jar", "shop.war"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_too_many_arguments_prints_usage() {
    warpack_cmd()
        .args(["launcher.jar", "shop.war", "out/", "--compress", "extra"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_pack_into_directory() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (launcher, application) = inputs(&temp);
    let dist = temp.path().join("dist");

    warpack_cmd()
        .arg(&launcher)
        .arg(&application)
        .arg(format!("{}/", dist.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Standalone archive created"));

    let output = dist.join("shop-standalone.jar");
    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    assert_eq!(archive.len(), 3);
    let mut names: Vec<_> = archive.file_names().map(String::from).collect();
    names.sort();
    assert_eq!(
        names,
        vec!["META-INF/MANIFEST.MF", "boot/run.bin", "webapp/index.html"]
    );
    for i in 0..archive.len() {
        assert_eq!(
            archive.by_index(i).unwrap().compression(),
            CompressionMethod::Stored
        );
    }
}

#[test]
fn test_compress_flag_is_case_insensitive() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (launcher, application) = inputs(&temp);
    let output = temp.path().join("out.jar");

    warpack_cmd()
        .arg(&launcher)
        .arg(&application)
        .arg(&output)
        .arg("--COMPRESS")
        .assert()
        .success();

    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    for i in 0..archive.len() {
        assert_eq!(
            archive.by_index(i).unwrap().compression(),
            CompressionMethod::Deflated
        );
    }
}

#[test]
fn test_unknown_fourth_argument_warns() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (launcher, application) = inputs(&temp);
    let output = temp.path().join("out.jar");

    warpack_cmd()
        .arg(&launcher)
        .arg(&application)
        .arg(&output)
        .arg("--zip")
        .assert()
        .success()
        .stderr(predicate::str::contains("--zip"));

    assert!(output.is_file());
}

#[test]
fn test_missing_launcher_fails_validation() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (_, application) = inputs(&temp);
    let dist = temp.path().join("dist");

    warpack_cmd()
        .arg(temp.path().join("missing.jar"))
        .arg(&application)
        .arg(format!("{}/", dist.display()))
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "cannot be used as server launcher archive",
        ));

    assert!(!dist.exists());
}

#[test]
fn test_validation_error_is_one_line_with_backtraces_enabled() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (_, application) = inputs(&temp);

    warpack_cmd()
        .env("RUST_BACKTRACE", "1")
        .arg(temp.path().join("missing.jar"))
        .arg(&application)
        .arg(temp.path().join("out.jar"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("backtrace").not())
        .stderr(predicate::function(|stderr: &str| {
            stderr.trim_end().lines().count() == 1
        }));
}

#[test]
fn test_empty_output_fails_validation() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (launcher, application) = inputs(&temp);

    warpack_cmd()
        .arg(&launcher)
        .arg(&application)
        .arg("")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("output file must be specified"));
}

#[test]
fn test_corrupt_application_fails() {
    let temp = TempDir::new().expect("failed to create temp dir");
    let (launcher, _) = inputs(&temp);
    let broken = temp.path().join("broken.war");
    std::fs::write(&broken, b"this file is definitely not a zip archive").unwrap();

    warpack_cmd()
        .arg(&launcher)
        .arg(&broken)
        .arg(temp.path().join("out.jar"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid archive"));
}

#[test]
fn test_launcher_help() {
    launcher_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--control-port"));
}

#[test]
fn test_launcher_invalid_target() {
    launcher_cmd()
        .arg("restart")
        .assert()
        .failure()
        .stderr(predicate::str::contains("restart"));
}

#[test]
fn test_status_without_instance_is_not_fatal() {
    launcher_cmd()
        .args(["status", "--control-port"])
        .arg(free_port().to_string())
        .assert()
        .success()
        .stderr(predicate::str::contains("no running instance"));
}

#[test]
fn test_stop_without_instance_is_not_fatal() {
    launcher_cmd()
        .args(["stop", "--control-port"])
        .arg(free_port().to_string())
        .assert()
        .success();
}

#[test]
fn test_start_status_stop() {
    let home = TempDir::new().expect("failed to create temp dir");
    let port = free_port();

    let mut child = std::process::Command::new(env!("CARGO_BIN_EXE_warpack-launcher"))
        .args(["start", "--control-port", &port.to_string()])
        .arg("--home")
        .arg(home.path())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn launcher");

    let client = ControlClient::new("127.0.0.1", port);
    let deadline = Instant::now() + Duration::from_secs(10);
    while client.status().is_err() {
        assert!(Instant::now() < deadline, "instance never came up");
        thread::sleep(Duration::from_millis(50));
    }

    launcher_cmd()
        .args(["status", "--control-port", &port.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Running..."));

    launcher_cmd()
        .args(["stop", "--control-port", &port.to_string()])
        .assert()
        .success();

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() > deadline {
            child.kill().ok();
            panic!("instance did not stop");
        }
        thread::sleep(Duration::from_millis(50));
    };

    assert!(status.success());
    assert!(home.path().join("work").is_dir());
}
