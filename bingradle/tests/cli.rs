//! CLI tests for gradle2json.
//!
//! These run the built binary against small scripts in temporary
//! directories and check exit codes and output.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a Command for the gradle2json binary.
fn gradle2json() -> Command {
    cargo_bin_cmd!("gradle2json")
}

/// Create a temp directory holding `build.gradle` with the given content.
fn temp_script(content: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("build.gradle"), content).unwrap();
    temp
}

const ANDROID_SCRIPT: &str = r#"
android {
    compileSdkVersion 23
}
dependencies {
    compile 'com.example:lib:1.0'
}
"#;

// =============================================================================
// Help & Usage
// =============================================================================

#[test]
fn help_flag_works() {
    gradle2json()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
    gradle2json()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gradle2json"));
}

#[test]
fn missing_path_is_usage_error() {
    gradle2json().assert().code(2);
}

#[test]
fn unknown_format_is_usage_error() {
    let temp = temp_script("a 1");
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .args(["--to", "xml"])
        .assert()
        .code(2);
}

#[test]
fn nonexistent_file_fails() {
    gradle2json()
        .arg("/nonexistent/build.gradle")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/nonexistent/build.gradle"));
}

// =============================================================================
// Conversion
// =============================================================================

#[test]
fn converts_file_to_json() {
    let temp = temp_script(ANDROID_SCRIPT);
    let output = gradle2json()
        .arg(temp.path().join("build.gradle"))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["android"]["compileSdkVersion"], "23");
    assert_eq!(json["dependencies"][0]["name"], "lib");
    assert_eq!(json["dependencies"][0]["kind"], "compile");
}

#[test]
fn reads_stdin() {
    gradle2json()
        .arg("-")
        .write_stdin("group 'com.example'\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"group\": \"com.example\""));
}

#[test]
fn converts_to_yaml() {
    let temp = temp_script(ANDROID_SCRIPT);
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .args(["--to", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("compileSdkVersion: '23'"));
}

#[test]
fn converts_to_toml() {
    let temp = temp_script(ANDROID_SCRIPT);
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .args(["-t", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[android]"));
}

#[test]
fn writes_output_file() {
    let temp = temp_script(ANDROID_SCRIPT);
    let out = temp.path().join("out.json");
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .arg("-o")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let text = fs::read_to_string(out).unwrap();
    assert!(text.contains("compileSdkVersion"));
}

#[test]
fn write_flag_replaces_extension() {
    let temp = temp_script(ANDROID_SCRIPT);
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .args(["--write", "--to", "cbor"])
        .assert()
        .success();
    let bytes = fs::read(temp.path().join("build.cbor")).unwrap();
    assert!(!bytes.is_empty());
}

#[test]
fn write_and_output_conflict() {
    let temp = temp_script(ANDROID_SCRIPT);
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .args(["--write", "-o", "x.json"])
        .assert()
        .code(2);
}

// =============================================================================
// Directories & Check
// =============================================================================

#[test]
fn check_directory() {
    let temp = temp_script(ANDROID_SCRIPT);
    fs::write(temp.path().join("settings.gradle"), "include ':app'\n").unwrap();
    fs::write(temp.path().join("notes.txt"), "not a script").unwrap();
    gradle2json()
        .arg(temp.path())
        .arg("--check")
        .assert()
        .success()
        .stdout(predicate::str::contains("build.gradle: ok"))
        .stdout(predicate::str::contains("settings.gradle: ok"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn write_directory() {
    let temp = temp_script(ANDROID_SCRIPT);
    fs::write(temp.path().join("settings.gradle"), "include ':app'\n").unwrap();
    gradle2json().arg(temp.path()).arg("-w").assert().success();
    assert!(temp.path().join("build.json").exists());
    assert!(temp.path().join("settings.json").exists());
}

// =============================================================================
// Limits
// =============================================================================

#[test]
fn max_depth_flag() {
    let temp = temp_script("a { b { c 1 } }");
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .args(["--max-depth", "1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("nested deeper than 1"));
}

#[test]
fn max_bytes_from_env() {
    let temp = temp_script(ANDROID_SCRIPT);
    gradle2json()
        .arg(temp.path().join("build.gradle"))
        .env("GRADLE2JSON_MAX_BYTES", "10")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("byte budget"));
}
