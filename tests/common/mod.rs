//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use tempfile::TempDir;

/// Helper to get a pnt command
pub fn pnt() -> Command {
    Command::new(cargo::cargo_bin!("pnt"))
}

/// Helper to create a working directory for one test
pub fn setup() -> TempDir {
    TempDir::new().unwrap()
}

/// Helper to add a pipe through the CLI
pub fn add_pipe(tmp: &TempDir, name: &str, length: &str, diameter: &str) {
    pnt()
        .current_dir(tmp.path())
        .args([
            "pipe", "new", "--name", name, "--length", length, "--diameter", diameter,
        ])
        .assert()
        .success();
}

/// Helper to add a station through the CLI
pub fn add_station(tmp: &TempDir, name: &str, total: &str, active: &str, class: &str) {
    pnt()
        .current_dir(tmp.path())
        .args([
            "station", "new", "--name", name, "--total", total, "--active", active, "--class",
            class,
        ])
        .assert()
        .success();
}
