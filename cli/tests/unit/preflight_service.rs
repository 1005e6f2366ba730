//! Tests for the `doctor` preflight checks.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use envprov_cli::application::services::preflight::{CheckStatus, preflight};
use envprov_cli::domain::ProvisionConfig;

use crate::helpers::{FakeHost, MissingManifest, MockCommandRunner, TextManifest};

fn status_of(report: &envprov_cli::application::services::preflight::PreflightReport, name: &str) -> CheckStatus {
    report
        .checks
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.status)
        .expect("check present")
}

#[tokio::test]
async fn test_ready_host_passes_every_check() {
    let host = FakeHost {
        installed: vec!["apt-get", "pip"],
        root: true,
    };
    let runner = MockCommandRunner::new().with_stdout(b"pip 24.0 from /usr/lib/python3\n");
    let report = preflight(&host, &runner, &TextManifest("fastapi\n"), &ProvisionConfig::default()).await;

    assert!(report.ready());
    assert!(report.checks.iter().all(|c| c.status == CheckStatus::Pass));
    let installer = report.checks.iter().find(|c| c.name == "installer").expect("installer");
    assert!(installer.detail.contains("pip 24.0"), "got: {}", installer.detail);
    assert_eq!(runner.calls()[0].args, ["--version"]);
}

#[tokio::test]
async fn test_missing_installer_fails() {
    let host = FakeHost {
        installed: vec!["apt-get"],
        root: true,
    };
    let runner = MockCommandRunner::new();
    let report = preflight(&host, &runner, &TextManifest("fastapi\n"), &ProvisionConfig::default()).await;

    assert!(!report.ready());
    assert_eq!(status_of(&report, "installer"), CheckStatus::Fail);
    assert!(runner.calls().is_empty(), "must not probe a missing installer");
}

#[tokio::test]
async fn test_missing_manifest_fails() {
    let host = FakeHost {
        installed: vec!["apt-get", "pip"],
        root: true,
    };
    let report = preflight(&host, &MockCommandRunner::new(), &MissingManifest, &ProvisionConfig::default()).await;

    assert!(!report.ready());
    assert_eq!(status_of(&report, "manifest"), CheckStatus::Fail);
}

#[tokio::test]
async fn test_empty_manifest_only_warns() {
    let host = FakeHost {
        installed: vec!["apt-get", "pip"],
        root: true,
    };
    let report = preflight(&host, &MockCommandRunner::new(), &TextManifest(""), &ProvisionConfig::default()).await;

    assert!(report.ready());
    assert_eq!(status_of(&report, "manifest"), CheckStatus::Warn);
}

#[tokio::test]
async fn test_non_root_without_sudo_warns() {
    let host = FakeHost {
        installed: vec!["apt-get", "pip"],
        root: false,
    };
    let report = preflight(&host, &MockCommandRunner::new(), &TextManifest("fastapi\n"), &ProvisionConfig::default()).await;

    assert!(report.ready());
    assert_eq!(status_of(&report, "privileges"), CheckStatus::Warn);
}

#[tokio::test]
async fn test_sudo_configured_but_absent_fails() {
    let host = FakeHost {
        installed: vec!["apt-get", "pip"],
        root: false,
    };
    let mut config = ProvisionConfig::default();
    config.package_manager.sudo = true;
    let report = preflight(&host, &MockCommandRunner::new(), &TextManifest("fastapi\n"), &config).await;

    assert!(!report.ready());
    assert_eq!(status_of(&report, "privileges"), CheckStatus::Fail);
}

#[tokio::test]
async fn test_installer_prefix_is_used_for_version_probe() {
    let host = FakeHost {
        installed: vec!["apt-get", "python3"],
        root: true,
    };
    let mut config = ProvisionConfig::default();
    config.installer.command = vec!["python3".into(), "-m".into(), "pip".into()];
    let runner = MockCommandRunner::new();
    preflight(&host, &runner, &TextManifest("fastapi\n"), &config).await;

    let calls = runner.calls();
    assert_eq!(calls[0].program, "python3");
    assert_eq!(calls[0].args, ["-m", "pip", "--version"]);
}
