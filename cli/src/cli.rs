//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, ConfigOverrides, OutputFlags};
use crate::commands;

/// Provision a host with a native audio library and Python dependencies
#[derive(Parser)]
#[command(name = "envprov", version, propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (any non-empty `NO_COLOR` other than 0/false/no/off)
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Increase diagnostic logging on stderr (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Config file (default: $ENVPROV_CONFIG, ./envprov.yaml, user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Dependency manifest to install from
    #[arg(long, global = true, value_name = "PATH")]
    pub manifest: Option<PathBuf>,

    /// Force a platform-pinned precompiled artifact for the binding
    #[arg(long, global = true, conflicts_with = "no_strict_binary")]
    pub strict_binary: bool,

    /// Let the installer resolve the binding normally (may build from source)
    #[arg(long, global = true)]
    pub no_strict_binary: bool,

    /// Platform tag for precompiled-only installs
    #[arg(long, global = true, value_name = "TAG")]
    pub platform: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Provision the host (default)
    Run,

    /// Show the commands a run would execute
    Plan,

    /// Check prerequisites without changing anything
    Doctor,

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or output fails.
    /// Step failures are not errors here; they come back as an exit code.
    pub async fn run(self) -> Result<ExitCode> {
        crate::output::logging::init(self.verbose);

        let strict_binary = match (self.strict_binary, self.no_strict_binary) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        let flags = AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            config_path: self.config,
            overrides: ConfigOverrides {
                manifest: self.manifest,
                strict_binary,
                platform: self.platform,
            },
        };

        match self.command.unwrap_or(Command::Run) {
            Command::Version => {
                commands::version::run(self.json);
                Ok(ExitCode::SUCCESS)
            }
            Command::Run => commands::run::run(&AppContext::new(flags)?).await,
            Command::Plan => commands::plan::run(&AppContext::new(flags)?),
            Command::Doctor => commands::doctor::run(&AppContext::new(flags)?).await,
            Command::Config(cmd) => commands::config::run(&AppContext::new(flags)?, &cmd),
        }
    }
}
