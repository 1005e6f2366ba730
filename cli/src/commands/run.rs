//! `envprov run`: provision the host. Also the default command.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::provision::{ProvisionFailure, provision};
use crate::domain::RunReport;
use crate::infra::fs::FsManifestReader;
use crate::output::{TerminalReporter, json, reporter::SilentReporter};

/// Run the provisioning procedure and map its outcome to an exit code.
///
/// Step failures are reported here rather than returned, so the process
/// exits with the failing tool's own code.
///
/// # Errors
///
/// Returns an error only if output cannot be written.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let outcome = if app.is_json() {
        provision(&app.runner, &FsManifestReader, &SilentReporter, &app.config).await
    } else {
        let reporter = TerminalReporter::new(&app.output);
        provision(&app.runner, &FsManifestReader, &reporter, &app.config).await
    };

    match outcome {
        Ok(report) => {
            if app.is_json() {
                render_json(&report, None)?;
            } else {
                app.output.success("Environment provisioned");
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(ProvisionFailure { report, cause }) => {
            tracing::debug!(code = cause.code(), "provisioning failed");
            if app.is_json() {
                render_json(&report, Some((cause.to_string(), cause.code())))?;
            } else {
                app.output.error(&cause.to_string());
            }
            Ok(ExitCode::from(cause.exit_code()))
        }
    }
}

fn render_json(report: &RunReport, error: Option<(String, &str)>) -> Result<()> {
    let mut obj = serde_json::json!({
        "success": error.is_none(),
        "report": report,
    });
    if let Some((message, code)) = error {
        obj["error"] = serde_json::json!({ "message": message, "code": code });
    }
    json::print(&obj)
}
