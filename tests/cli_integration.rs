//! CLI integration tests for Drydock.
//!
//! These tests drive the CLI in offline mode (explicit family and
//! version) so no real toolchain is required.

use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;

/// Get the drydock binary command.
fn drydock() -> Command {
    let mut cmd = Command::cargo_bin("drydock").unwrap();
    // Keep the host environment out of discovery.
    cmd.env_remove("CC");
    cmd
}

// ============================================================================
// drydock flags
// ============================================================================

#[test]
fn test_flags_resolves_clang_c17() {
    drydock()
        .args([
            "flags",
            "--family",
            "clang",
            "--compiler-version",
            "15.0",
            "--std",
            "c17",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-std=c17"));
}

#[test]
fn test_flags_gnu_level_three_ladder() {
    drydock()
        .args([
            "flags",
            "--family",
            "gcc",
            "--compiler-version",
            "12.1.0",
            "--warnings",
            "3",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "-Wall -Winvalid-pch -Wextra -Wpedantic",
        ));
}

#[test]
fn test_flags_clang_everything_is_single_flag() {
    drydock()
        .args([
            "flags",
            "--family",
            "clang",
            "--compiler-version",
            "15.0",
            "--warnings",
            "everything",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-Weverything"));
}

#[test]
fn test_flags_rejects_unknown_standard() {
    drydock()
        .args([
            "flags",
            "--family",
            "clang",
            "--compiler-version",
            "15.0",
            "--std",
            "c++17",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a supported"));
}

#[test]
fn test_flags_rejects_version_gated_standard() {
    // GCC 7.5 predates -std=c17.
    drydock()
        .args([
            "flags",
            "--family",
            "gcc",
            "--compiler-version",
            "7.5.0",
            "--std",
            "c17",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("7.5.0"));
}

#[test]
fn test_flags_size_optimization_differs_per_family() {
    drydock()
        .args([
            "flags",
            "--family",
            "clang",
            "--compiler-version",
            "15.0",
            "--opt",
            "s",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-Oz"));

    drydock()
        .args([
            "flags",
            "--family",
            "gcc",
            "--compiler-version",
            "12.1.0",
            "--opt",
            "s",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("-Os"));
}

#[test]
fn test_flags_json_output() {
    let output = drydock()
        .args([
            "flags",
            "--family",
            "clang",
            "--compiler-version",
            "15.0",
            "--std",
            "c11",
            "--opt",
            "2",
            "--json",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(payload["std"][0], "-std=c11");
    assert_eq!(payload["optimization"][0], "-O2");
    assert!(payload["all"].as_array().unwrap().len() >= 2);
}

#[test]
fn test_flags_rejects_unknown_warning_level() {
    drydock()
        .args([
            "flags",
            "--family",
            "gcc",
            "--compiler-version",
            "12.1.0",
            "--warnings",
            "extreme",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown level"));
}

// ============================================================================
// drydock options
// ============================================================================

#[test]
fn test_options_publishes_std_under_c_tag_for_objc() {
    drydock()
        .args([
            "options",
            "--family",
            "clang",
            "--compiler-version",
            "15.0",
            "--language",
            "objc",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("host:c:std"))
        .stdout(predicate::str::contains("none"))
        .stdout(predicate::str::contains("c17"));
}

#[test]
fn test_options_scopes_keys_by_machine() {
    drydock()
        .args([
            "options",
            "--family",
            "gcc",
            "--compiler-version",
            "12.1.0",
            "--machine",
            "build",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("build:c:std"));
}

// ============================================================================
// drydock show
// ============================================================================

#[test]
fn test_show_prints_identity() {
    drydock()
        .args([
            "show",
            "--family",
            "apple-clang",
            "--compiler-version",
            "14.0.3",
            "--cross",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("apple-clang"))
        .stdout(predicate::str::contains("14.0.3"))
        .stdout(predicate::str::contains("Cross:    yes"));
}

// ============================================================================
// drydock completions
// ============================================================================

#[test]
fn test_completions_generates_bash() {
    drydock()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("drydock"));
}
