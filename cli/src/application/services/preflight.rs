//! Application service: preflight checks behind `envprov doctor`.
//!
//! Answers "would a run get past its own prerequisites?" without touching the
//! package database: are the programs there, is the manifest readable, is
//! there enough privilege to install system packages.

use serde::Serialize;

use crate::application::ports::{CommandRunner, HostProbe, ManifestReader};
use crate::domain::ProvisionConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize)]
pub struct Check {
    pub name: &'static str,
    pub status: CheckStatus,
    pub detail: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub checks: Vec<Check>,
}

impl PreflightReport {
    /// `true` when no check failed. Warnings do not count.
    #[must_use]
    pub fn ready(&self) -> bool {
        self.checks.iter().all(|c| c.status != CheckStatus::Fail)
    }
}

/// Run every preflight check.
pub async fn preflight(
    host: &impl HostProbe,
    runner: &impl CommandRunner,
    manifests: &impl ManifestReader,
    config: &ProvisionConfig,
) -> PreflightReport {
    let mut checks = Vec::new();

    let pm = &config.package_manager.program;
    checks.push(program_check("package manager", host, pm));

    if let Some(installer) = config.installer.command.first() {
        let mut check = program_check("installer", host, installer);
        if check.status == CheckStatus::Pass {
            if let Some(version) = installer_version(runner, config).await {
                check.detail = format!("{} ({version})", check.detail);
            }
        }
        checks.push(check);
    }

    checks.push(privilege_check(host, config));

    checks.push(match manifests.read_manifest(&config.manifest) {
        Ok(m) if m.is_empty() => Check {
            name: "manifest",
            status: CheckStatus::Warn,
            detail: format!("{} declares no dependencies", config.manifest.display()),
        },
        Ok(m) => Check {
            name: "manifest",
            status: CheckStatus::Pass,
            detail: format!(
                "{} ({} requirements, {} directives)",
                config.manifest.display(),
                m.requirements().count(),
                m.entries.len() - m.requirements().count()
            ),
        },
        Err(e) => Check {
            name: "manifest",
            status: CheckStatus::Fail,
            detail: e.to_string(),
        },
    });

    PreflightReport { checks }
}

fn program_check(name: &'static str, host: &impl HostProbe, program: &str) -> Check {
    match host.locate(program) {
        Some(path) => Check {
            name,
            status: CheckStatus::Pass,
            detail: path.display().to_string(),
        },
        None => Check {
            name,
            status: CheckStatus::Fail,
            detail: format!("'{program}' not found on PATH"),
        },
    }
}

fn privilege_check(host: &impl HostProbe, config: &ProvisionConfig) -> Check {
    let (status, detail) = if host.is_root() {
        (CheckStatus::Pass, "running as root".to_string())
    } else if config.package_manager.sudo {
        match host.locate("sudo") {
            Some(_) => (CheckStatus::Pass, "package manager runs through sudo".to_string()),
            None => (
                CheckStatus::Fail,
                "package_manager.sudo is set but 'sudo' is not on PATH".to_string(),
            ),
        }
    } else {
        (
            CheckStatus::Warn,
            "not root and package_manager.sudo is off; system installs will likely be denied"
                .to_string(),
        )
    };
    Check {
        name: "privileges",
        status,
        detail,
    }
}

/// First line of `<installer> --version`, when it runs cleanly.
async fn installer_version(runner: &impl CommandRunner, config: &ProvisionConfig) -> Option<String> {
    let (program, prefix) = config.installer.command.split_first()?;
    let mut args: Vec<&str> = prefix.iter().map(String::as_str).collect();
    args.push("--version");
    let output = runner.run(program, &args).await.ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
}
