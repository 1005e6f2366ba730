//! Application service: the provisioning run.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.
//!
//! The run is strictly sequential and fail-fast: the manifest is loaded
//! first, then each planned step runs to completion before the next one is
//! spawned, and the first failure ends the run.

use chrono::Utc;
use thiserror::Error;

use crate::application::ports::{CommandRunner, ManifestReader, ProgressReporter, RunError};
use crate::domain::{
    ManifestError, Plan, ProvisionConfig, ProvisionError, RunReport, Step, StepStatus,
};

/// What stopped a run.
#[derive(Debug, Error)]
pub enum FailureCause {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Step(#[from] ProvisionError),
}

impl FailureCause {
    /// Process exit code for this failure; never zero.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Manifest(_) => 1,
            Self::Step(e) => e.exit_code(),
        }
    }

    /// Stable machine-readable code used in `--json` error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Manifest(ManifestError::Missing { .. }) => "MANIFEST_MISSING",
            Self::Manifest(ManifestError::Unreadable { .. }) => "MANIFEST_UNREADABLE",
            Self::Manifest(ManifestError::InvalidLine { .. }) => "MANIFEST_INVALID",
            Self::Step(e) => e.code(),
        }
    }
}

/// A failed run: the cause plus the per-step record up to the failure.
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct ProvisionFailure {
    pub report: RunReport,
    #[source]
    pub cause: FailureCause,
}

/// Run the provisioning procedure.
///
/// # Errors
///
/// Returns [`ProvisionFailure`] when the manifest cannot be loaded (no step
/// runs) or when a step fails (no later step runs).
pub async fn provision(
    runner: &impl CommandRunner,
    manifests: &impl ManifestReader,
    reporter: &impl ProgressReporter,
    config: &ProvisionConfig,
) -> Result<RunReport, ProvisionFailure> {
    let mut report = RunReport::start(Utc::now());

    let manifest = match manifests.read_manifest(&config.manifest) {
        Ok(m) => m,
        Err(e) => {
            tracing::debug!(manifest = %config.manifest.display(), error = %e, "manifest rejected");
            report.finished_at = Some(Utc::now());
            return Err(ProvisionFailure {
                report,
                cause: e.into(),
            });
        }
    };
    tracing::debug!(
        manifest = %config.manifest.display(),
        entries = manifest.entries.len(),
        "manifest loaded",
    );

    let plan = Plan::from_config(config);
    for planned in &plan.steps {
        let step = planned.step;
        let cmd = &planned.command;

        if step == Step::InstallManifest && manifest.is_empty() {
            report.record(step, StepStatus::Skipped);
            reporter.success(&format!(
                "{} is empty, nothing to install",
                config.manifest.display()
            ));
            continue;
        }

        reporter.step(&format!("{} ({cmd})", step.describe()));
        tracing::info!(%step, command = %cmd, "running step");

        let result = runner
            .run_status(&cmd.program, &cmd.arg_refs(), &cmd.env_refs())
            .await;

        let error = match result {
            Ok(status) if status.success() => {
                report.record(step, StepStatus::Succeeded);
                reporter.success(&success_message(config, step));
                continue;
            }
            Ok(status) => {
                tracing::debug!(%step, ?status, "step exited unsuccessfully");
                report.record(step, StepStatus::Failed { code: status.code() });
                step_failed(config, step, status.code().unwrap_or(1))
            }
            Err(RunError::TimedOut { after, .. }) => {
                report.record(step, StepStatus::Failed { code: None });
                ProvisionError::Timeout {
                    step,
                    secs: after.as_secs(),
                }
            }
            Err(e @ (RunError::Spawn { .. } | RunError::Wait { .. })) => {
                report.record(step, StepStatus::Failed { code: None });
                ProvisionError::Spawn {
                    step,
                    program: cmd.program.clone(),
                    reason: e.to_string(),
                }
            }
        };

        report.finished_at = Some(Utc::now());
        return Err(ProvisionFailure {
            report,
            cause: error.into(),
        });
    }

    report.finished_at = Some(Utc::now());
    Ok(report)
}

fn success_message(config: &ProvisionConfig, step: Step) -> String {
    match step {
        Step::RefreshIndex => "Package index refreshed".to_string(),
        Step::InstallNative => format!("{} installed", config.native_package),
        Step::InstallBinding if config.binding.strict_binary => format!(
            "{} installed ({} precompiled)",
            config.binding.package, config.binding.platform
        ),
        Step::InstallBinding => format!("{} installed", config.binding.package),
        Step::InstallManifest => format!(
            "Dependencies from {} installed",
            config.manifest.display()
        ),
    }
}

fn step_failed(config: &ProvisionConfig, step: Step, code: i32) -> ProvisionError {
    match step {
        Step::RefreshIndex => ProvisionError::IndexRefresh { code },
        Step::InstallNative => ProvisionError::NativePackage {
            package: config.native_package.clone(),
            code,
        },
        Step::InstallBinding if config.binding.strict_binary => ProvisionError::PlatformArtifact {
            package: config.binding.package.clone(),
            platform: config.binding.platform.clone(),
            code,
        },
        Step::InstallBinding => ProvisionError::BindingPackage {
            package: config.binding.package.clone(),
            code,
        },
        Step::InstallManifest => ProvisionError::ManifestDependencies {
            manifest: config.manifest.clone(),
            code,
        },
    }
}
