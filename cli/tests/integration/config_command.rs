//! Integration tests for `envprov config` and config-file handling.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::support::{Sandbox, ToolCodes, envprov};

#[test]
fn test_config_path_prints_env_file() {
    let sb = Sandbox::new(ToolCodes::default(), "fastapi\n");
    sb.envprov()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("envprov.yaml"));
}

#[test]
fn test_config_show_prints_effective_yaml() {
    let sb = Sandbox::new(ToolCodes::default(), "fastapi\n");
    sb.envprov()
        .args(["config", "show", "--no-strict-binary"])
        .assert()
        .success()
        .stdout(predicate::str::contains("native_package: portaudio19-dev"))
        .stdout(predicate::str::contains("strict_binary: false"));
}

#[test]
fn test_config_validate_accepts_sandbox_config() {
    let sb = Sandbox::new(ToolCodes::default(), "fastapi\n");
    sb.envprov()
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_unknown_config_key_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "binding:\n  strict: false\n").expect("write config");

    envprov()
        .args(["--config"])
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown setting: binding.strict"));
}

#[test]
fn test_invalid_config_value_is_rejected_before_running() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("bad.yaml");
    std::fs::write(&path, "native_package: \"two words\"\n").expect("write config");

    envprov()
        .arg("--config")
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("native_package"));
}

#[test]
fn test_missing_explicit_config_is_error() {
    envprov()
        .args(["--config", "/nonexistent/envprov.yaml", "plan"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn test_config_error_json_mode_prints_error_object() {
    let output = envprov()
        .args(["--json", "--config", "/nonexistent/envprov.yaml", "plan"])
        .output()
        .expect("run envprov");
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid json");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "ERROR");
}

#[test]
fn test_config_validate_accepts_apt_names_with_plus_and_pins() {
    for name in ["libstdc++-12-dev", "portaudio19-dev=19.6.0-1.2"] {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("envprov.yaml");
        std::fs::write(&path, format!("native_package: \"{name}\"\n")).expect("write config");

        envprov()
            .arg("--config")
            .arg(&path)
            .args(["config", "validate"])
            .assert()
            .success();
    }
}

#[test]
fn test_strict_mode_with_empty_target_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("envprov.yaml");
    std::fs::write(&path, "binding:\n  target: \"\"\n").expect("write config");

    envprov()
        .arg("--config")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("binding.target"));
}
