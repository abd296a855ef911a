//! CLI integration tests using assert_cmd.

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn hearcheck() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("hearcheck").unwrap();
    cmd.env_remove("HEARCHECK_SEED").env("HOME", "/nonexistent");
    cmd
}

/// A config with millisecond timings and a silent player.
fn fast_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("fast.toml");
    std::fs::write(
        &path,
        r#"
seed = 11

[timing]
min_delay_ms = 1
max_delay_ms = 5
tone_ms = 10

[player]
type = "silent"
"#,
    )
    .unwrap();
    path
}

#[test]
fn run_with_zero_tones_completes_immediately() {
    let dir = TempDir::new().unwrap();

    hearcheck()
        .current_dir(dir.path())
        .args(["run", "--count", "0", "--player", "silent"])
        .write_stdin("")
        .assert()
        .success()
        .stderr(predicate::str::contains("Tones played: 0"))
        .stderr(predicate::str::contains("Highest tone heard: none"));
}

#[test]
fn run_completes_round_and_prints_json() {
    let dir = TempDir::new().unwrap();
    let config = fast_config(dir.path());

    let output = hearcheck()
        .current_dir(dir.path())
        .arg("run")
        .arg("--config")
        .arg(&config)
        .args(["--mode", "descending", "--count", "3", "--json"])
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(30))
        .output()
        .unwrap();

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "descending");
    assert_eq!(report["planned"], 3);
    assert_eq!(report["completed"], true);
    assert_eq!(report["stats"]["played_frequencies"]["17400"], 1);
    assert_eq!(report["stats"]["played_frequencies"]["16000"], 1);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("17400 Hz"));
    assert!(stderr.contains("Tones played: 3"));
}

#[test]
fn run_accepts_legacy_mode_names() {
    let dir = TempDir::new().unwrap();
    let config = fast_config(dir.path());

    hearcheck()
        .current_dir(dir.path())
        .arg("run")
        .arg("--config")
        .arg(&config)
        .args(["--mode", "to_top", "--count", "1"])
        .write_stdin("")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stderr(predicate::str::contains("440 Hz"));
}

#[test]
fn quitting_stops_round_early() {
    let dir = TempDir::new().unwrap();

    hearcheck()
        .current_dir(dir.path())
        .args(["run", "--player", "silent", "--seed", "3"])
        .write_stdin("q\n")
        .timeout(std::time::Duration::from_secs(30))
        .assert()
        .success()
        .stderr(predicate::str::contains("Round stopped early"));
}

#[test]
fn run_rejects_unknown_mode() {
    hearcheck()
        .args(["run", "--mode", "sideways"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown round mode"));
}

#[test]
fn run_nonexistent_config() {
    hearcheck()
        .args(["run", "--config", "nonexistent.toml"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: config file not found"));
}

#[cfg(not(feature = "audio"))]
#[test]
fn audio_player_needs_feature() {
    let dir = TempDir::new().unwrap();

    hearcheck()
        .current_dir(dir.path())
        .args(["run", "--player", "audio"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("audio"));
}

#[test]
fn catalog_lists_builtin_tones() {
    let dir = TempDir::new().unwrap();

    hearcheck()
        .current_dir(dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("17400 Hz"))
        .stdout(predicate::str::contains("< 18"))
        .stdout(predicate::str::contains("7 tone(s)"));
}

#[test]
fn validate_good_and_bad_catalogs() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("good.toml");
    std::fs::write(
        &good,
        "[[tones]]\nfrequency_hz = 1000\nage_label = \"0+\"\n\n[[tones]]\nfrequency_hz = 19000\nage_label = \"kids\"\n",
    )
    .unwrap();
    let unordered = dir.path().join("unordered.toml");
    std::fs::write(
        &unordered,
        "[[tones]]\nfrequency_hz = 9000\nage_label = \"a\"\n\n[[tones]]\nfrequency_hz = 1000\nage_label = \"b\"\n",
    )
    .unwrap();

    hearcheck()
        .arg("validate")
        .arg("--catalog")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 tones, 1000 to 19000 Hz"))
        .stdout(predicate::str::contains("Catalog valid"));

    hearcheck()
        .arg("validate")
        .arg("--catalog")
        .arg(&unordered)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

#[test]
fn validate_nonexistent_file() {
    hearcheck()
        .args(["validate", "--catalog", "nonexistent.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read catalog file"));
}

#[test]
fn init_creates_files() {
    let dir = TempDir::new().unwrap();

    hearcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created hearcheck.toml"))
        .stdout(predicate::str::contains("Created catalog.toml"));

    assert!(dir.path().join("hearcheck.toml").exists());

    // The generated files are picked up from the working directory.
    hearcheck()
        .current_dir(dir.path())
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("7 tone(s)"));

    hearcheck()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}
