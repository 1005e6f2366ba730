//! Application context: unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the global flags: output
//! settings, the effective configuration (file plus command-line overrides),
//! and the process runner every command shares.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::ProvisionConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Command-line values that win over the config file.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub manifest: Option<PathBuf>,
    pub strict_binary: Option<bool>,
    pub platform: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut ProvisionConfig) {
        if let Some(manifest) = &self.manifest {
            config.manifest.clone_from(manifest);
        }
        if let Some(strict) = self.strict_binary {
            config.binding.strict_binary = strict;
        }
        if let Some(platform) = &self.platform {
            config.binding.platform.clone_from(platform);
        }
    }
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit config file (`--config`).
    pub config_path: Option<PathBuf>,
    /// Command-line config overrides.
    pub overrides: ConfigOverrides,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Where the configuration came from.
    pub config_store: YamlConfigStore,
    /// Effective configuration after overrides.
    pub config: ProvisionConfig,
    /// Runner for provisioning steps; honours `step_timeout_secs`.
    pub runner: TokioCommandRunner,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded or the effective
    /// configuration is invalid.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_store = YamlConfigStore::new(flags.config_path);
        let mut config = config_store.load()?;
        flags.overrides.apply(&mut config);
        config.validate()?;

        let mut runner = TokioCommandRunner::new(config.step_timeout_secs.map(Duration::from_secs));
        if mode == OutputMode::Json {
            runner = runner.with_stdout_to_stderr();
        }

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            config_store,
            config,
            runner,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}
