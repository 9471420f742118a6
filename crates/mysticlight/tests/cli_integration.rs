//! Integration tests for the `mysticlight-cli` binary.
//!
//! No vendor library is present on the test machine, so SDK-backed
//! commands are checked for a clean `Error:` exit and everything else for
//! normal output.

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

fn cli() -> assert_cmd::Command {
    cargo_bin_cmd!("mysticlight-cli")
}

#[test]
fn cli_help_succeeds() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("mysticlight-cli"));
}

#[test]
fn cli_version_prints_version() {
    cli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn cli_config_json_produces_valid_json() {
    let output = cli()
        .args(["--json", "config"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value =
        serde_json::from_slice(&output).expect("config --json should produce valid JSON");
    assert!(json["settings"].is_object());
    assert!(json["sdk"]["library_names"].is_array());
    assert!(json["config_file"].is_string() || json["config_file"].is_null());
}

#[test]
fn cli_config_reads_custom_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.toml");
    std::fs::write(&path, "device_type = \"MSI_MB\"\n").unwrap();

    let output = cli()
        .args(["--json", "config", "--config"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["settings"]["device_type"], "MSI_MB");
    assert_eq!(json["config_file_exists"], true);
}

#[test]
fn cli_config_sdk_flag_is_reported() {
    cli()
        .args(["config", "--sdk", "does-not-exist.dll"])
        .assert()
        .success()
        .stdout(predicate::str::contains("does-not-exist.dll"))
        .stdout(predicate::str::contains("(not found)"));
}

// ── --verbose flag ──

#[test]
fn cli_verbose_flag_accepted() {
    cli().args(["-v", "config"]).assert().success();
}

#[test]
fn cli_verbose_long_flag_accepted() {
    cli().args(["--verbose", "config"]).assert().success();
}

// ── SDK-backed commands without a library ──

#[test]
fn cli_devices_without_sdk_fails_cleanly() {
    cli()
        .args(["devices", "--sdk", "does-not-exist.dll"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::starts_with("Error:"));
}

#[test]
fn cli_interactive_without_sdk_fails_cleanly() {
    cli()
        .args(["--sdk", "does-not-exist.dll"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn cli_set_color_bad_color_fails() {
    cli()
        .args(["set-color", "MSI_MB", "0", "#12"])
        .args(["--sdk", "does-not-exist.dll"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// ── Subcommand help ──

#[test]
fn cli_set_color_ex_help_succeeds() {
    cli()
        .args(["set-color-ex", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--sync"));
}

#[test]
fn cli_show_help_succeeds() {
    cli()
        .args(["show", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("LED"));
}

#[test]
fn cli_set_colors_requires_pairs() {
    cli()
        .args(["set-colors", "MSI_MB", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=COLOR"));
}

#[test]
fn cli_unknown_subcommand_fails() {
    cli().arg("blink").assert().failure();
}
