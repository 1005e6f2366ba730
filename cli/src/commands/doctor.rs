//! `envprov doctor`: preflight checks.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::preflight::{CheckStatus, preflight};
use crate::infra::command_runner::{PROBE_TIMEOUT, TokioCommandRunner};
use crate::infra::fs::FsManifestReader;
use crate::infra::host::SystemHostProbe;
use crate::output::json;

/// Run `envprov doctor`.
///
/// Exits 0 when nothing failed (warnings allowed), 1 otherwise.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let runner = TokioCommandRunner::new(Some(PROBE_TIMEOUT));
    let report = preflight(&SystemHostProbe, &runner, &FsManifestReader, &app.config).await;
    let ready = report.ready();

    if app.is_json() {
        json::print(&serde_json::json!({
            "status": if ready { "ready" } else { "not_ready" },
            "checks": report.checks,
        }))?;
    } else {
        let ctx = &app.output;
        ctx.header("Preflight:");
        for check in &report.checks {
            let line = format!("{}: {}", check.name, check.detail);
            match check.status {
                CheckStatus::Pass => ctx.success(&line),
                CheckStatus::Warn => ctx.warn(&line),
                CheckStatus::Fail => ctx.error(&line),
            }
        }
        if ready {
            ctx.success("Ready to provision");
        } else {
            ctx.error("Not ready to provision");
        }
    }

    Ok(if ready {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
