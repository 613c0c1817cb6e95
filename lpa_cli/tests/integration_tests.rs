//! Integration tests for the lpa binary.
//!
//! These tests verify end-to-end behavior including:
//! - Forward conversion with legacy comparison
//! - Reverse estimates across kits
//! - Input rejection and unknown kits
//! - Config overrides and CSV batch mode

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::cargo_bin("lpa").expect("Failed to find lpa binary")
}

/// Helper to create a config file in a temp dir
fn write_config(contents: &str) -> (TempDir, std::path::PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("IFCC-harmonized"));
}

#[test]
fn test_kits_lists_registry() {
    cli()
        .arg("kits")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sekisui"))
        .stdout(predicate::str::contains("Shino-test"))
        .stdout(predicate::str::contains("Roche"));
}

#[test]
fn test_convert_flags_underestimation() {
    cli()
        .args(["convert", "--kit", "Sekisui", "30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("110.71 nmol/L"))
        .stdout(predicate::str::contains("Moderate Risk"))
        .stdout(predicate::str::contains("66.00 nmol/L (Low Risk)"))
        .stdout(predicate::str::contains("under-classifies"));
}

#[test]
fn test_convert_roche_skips_legacy() {
    cli()
        .args(["convert", "--kit", "Roche", "150"])
        .assert()
        .success()
        .stdout(predicate::str::contains("150.00 nmol/L"))
        .stdout(predicate::str::contains("High Risk"))
        .stdout(predicate::str::contains("Legacy comparison not applicable"))
        .stdout(predicate::str::contains("330").not());
}

#[test]
fn test_convert_json() {
    let output = cli()
        .args(["--json", "convert", "--kit", "Sekisui", "30"])
        .output()
        .expect("Failed to run lpa");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output is not JSON");
    assert_eq!(json["risk"]["band_index"], 1);
    assert_eq!(json["legacy"]["comparison"]["secondary"]["band_index"], 0);
    assert_eq!(json["legacy"]["comparison"]["is_underestimated"], true);
}

#[test]
fn test_convert_unknown_kit_fails() {
    cli()
        .args(["convert", "--kit", "Unknown", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("UnknownKit"));
}

#[test]
fn test_convert_negative_value_fails() {
    cli()
        .args(["convert", "--kit", "Sekisui", "-5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInput"));
}

#[test]
fn test_reverse_all_kits() {
    let output = cli()
        .args(["--json", "reverse", "120"])
        .output()
        .expect("Failed to run lpa");
    assert!(output.status.success());

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("Output is not JSON");
    let estimates = json["estimates"].as_array().unwrap();
    assert_eq!(estimates.len(), 6);
    assert_eq!(estimates[5]["kit"]["name"], "Roche");
    assert_eq!(estimates[5]["original"], 120.0);
    assert_eq!(json["risk"]["label"], "Moderate Risk");
    assert_eq!(json["generic_mass_estimate"], 50.0);
}

#[test]
fn test_reverse_single_kit() {
    cli()
        .args(["reverse", "110.71", "--kit", "Sekisui"])
        .assert()
        .success()
        .stdout(predicate::str::contains("30.00 mg/dL"))
        .stdout(predicate::str::contains("Denka-1").not());
}

#[test]
fn test_classify_boundaries() {
    cli()
        .args(["classify", "75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Moderate Risk (band 1)"));

    cli()
        .args(["classify", "175"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Very High Risk (band 3)"));
}

#[test]
fn test_config_override_roche_regression() {
    let (_dir, path) = write_config(
        r#"
[[kits]]
name = "Roche"
slope = 1.16
intercept = -1.94
input_unit = "nmol/L"
"#,
    );

    cli()
        .arg("--config")
        .arg(&path)
        .args(["convert", "--kit", "Roche", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("114.06 nmol/L"))
        .stdout(predicate::str::contains("Legacy comparison not applicable"));
}

#[test]
fn test_invalid_config_fails() {
    let (_dir, path) = write_config(
        r#"
[risk]
bounds = [0.0, 125.0, 75.0, 175.0]
"#,
    );

    cli()
        .arg("--config")
        .arg(&path)
        .args(["classify", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidThresholds"));
}

#[test]
fn test_batch_from_stdin() {
    cli()
        .arg("batch")
        .write_stdin("kit,value\nSekisui,30\nUnknown,1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sekisui,30,"))
        .stdout(predicate::str::contains("Unknown kit: Unknown"))
        .stderr(predicate::str::contains("2 rows (1 failed, 1 under-classified"));
}

#[test]
fn test_batch_from_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temp_dir.path().join("readings.csv");
    fs::write(&input, "kit,value\nRoche,200\nNittobo,0\n").expect("Failed to write CSV");

    let output = cli()
        .arg("batch")
        .arg(&input)
        .output()
        .expect("Failed to run lpa");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].contains("Very High Risk"));
    assert!(lines[2].starts_with("Nittobo,0,-8.64"));
    assert!(lines[2].contains("Low Risk"));
}
