//! `envprov config`: inspect the effective configuration.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (file plus flags)
    Show,
    /// Print the config file in use
    Path,
    /// Check the configuration and exit non-zero if it is invalid
    Validate,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if output fails.
pub fn run(app: &AppContext, cmd: &ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show(app),
        ConfigCommand::Path => path(app),
        // Loading already validated it; reaching here means it is valid.
        ConfigCommand::Validate => {
            if app.is_json() {
                json::print(&serde_json::json!({ "valid": true }))?;
            } else {
                app.output.success("Configuration is valid");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn show(app: &AppContext) -> Result<ExitCode> {
    if app.is_json() {
        json::print(&app.config)?;
    } else {
        let yaml = serde_yaml::to_string(&app.config).context("cannot serialize config")?;
        print!("{yaml}");
    }
    Ok(ExitCode::SUCCESS)
}

fn path(app: &AppContext) -> Result<ExitCode> {
    let path = app.config_store.path();
    if app.is_json() {
        json::print(&serde_json::json!({ "path": path }))?;
    } else {
        match path {
            Some(p) => println!("{}", p.display()),
            None => app.output.info("No config file; using built-in defaults"),
        }
    }
    Ok(ExitCode::SUCCESS)
}
