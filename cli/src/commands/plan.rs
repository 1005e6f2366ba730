//! `envprov plan`: show what a run would execute, without executing it.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::domain::Plan;
use crate::output::json;

/// Print the ordered step commands for the effective configuration.
///
/// # Errors
///
/// Returns an error if JSON output fails.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let plan = Plan::from_config(&app.config);
    if app.is_json() {
        json::print(&plan)?;
        return Ok(ExitCode::SUCCESS);
    }

    let ctx = &app.output;
    ctx.header("Provisioning plan:");
    for (i, planned) in plan.steps.iter().enumerate() {
        ctx.kv(&format!("{}. {}", i + 1, planned.step), &planned.command.to_string());
    }
    if !app.config.binding.strict_binary {
        ctx.info("Precompiled-only mode is off; the installer may build the binding from source.");
    }
    Ok(ExitCode::SUCCESS)
}
