//! The provisioning plan: four fixed steps and the command each one runs.
//!
//! Pure functions only. Building a plan never touches the host; executing it
//! is the job of `application::services::provision`.

use std::fmt;

use serde::Serialize;

use crate::domain::config::ProvisionConfig;

/// Environment applied to every package-manager call.
pub const PACKAGE_MANAGER_ENV: &[(&str, &str)] = &[("DEBIAN_FRONTEND", "noninteractive")];

/// Environment applied to every installer call.
pub const INSTALLER_ENV: &[(&str, &str)] = &[("PIP_DISABLE_PIP_VERSION_CHECK", "1")];

/// Provisioning steps, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    RefreshIndex,
    InstallNative,
    InstallBinding,
    InstallManifest,
}

impl Step {
    /// All steps in the order they run.
    pub const ALL: [Step; 4] = [
        Step::RefreshIndex,
        Step::InstallNative,
        Step::InstallBinding,
        Step::InstallManifest,
    ];

    /// Operator-facing description used in progress lines.
    #[must_use]
    pub fn describe(self) -> &'static str {
        match self {
            Step::RefreshIndex => "Refreshing package index",
            Step::InstallNative => "Installing native library",
            Step::InstallBinding => "Installing language binding",
            Step::InstallManifest => "Installing manifest dependencies",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Step::RefreshIndex => "refresh-index",
            Step::InstallNative => "install-native",
            Step::InstallBinding => "install-binding",
            Step::InstallManifest => "install-manifest",
        };
        f.write_str(s)
    }
}

/// One external call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepCommand {
    pub program: String,
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<(String, String)>,
}

impl StepCommand {
    fn new(program: &str, args: &[&str], env: &[(&str, &str)]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            env: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        }
    }

    /// Arguments as borrowed slices, the shape `CommandRunner` takes.
    #[must_use]
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn env_refs(&self) -> Vec<(&str, &str)> {
        self.env
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

impl fmt::Display for StepCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " '{arg}'")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

/// A step paired with the command that carries it out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub step: Step,
    pub command: StepCommand,
}

/// The ordered commands for one provisioning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    pub steps: Vec<PlannedStep>,
}

impl Plan {
    /// Build the plan for `config`.
    #[must_use]
    pub fn from_config(config: &ProvisionConfig) -> Self {
        let steps = Step::ALL
            .iter()
            .map(|&step| PlannedStep {
                step,
                command: command_for(config, step),
            })
            .collect();
        Self { steps }
    }

    #[must_use]
    pub fn command(&self, step: Step) -> Option<&StepCommand> {
        self.steps
            .iter()
            .find(|p| p.step == step)
            .map(|p| &p.command)
    }
}

fn package_manager(config: &ProvisionConfig, args: &[&str]) -> StepCommand {
    let pm = &config.package_manager;
    if pm.sudo {
        let mut full = vec![pm.program.as_str()];
        full.extend_from_slice(args);
        // sudo drops the caller's environment; pass it on the command line.
        let mut cmd = StepCommand::new("sudo", &["env"], &[]);
        cmd.args.extend(
            PACKAGE_MANAGER_ENV
                .iter()
                .map(|(k, v)| format!("{k}={v}")),
        );
        cmd.args.extend(full.iter().map(|s| (*s).to_string()));
        cmd
    } else {
        StepCommand::new(&pm.program, args, PACKAGE_MANAGER_ENV)
    }
}

fn installer(config: &ProvisionConfig, args: &[String]) -> StepCommand {
    let (program, prefix): (&str, &[String]) = match config.installer.command.split_first() {
        Some((p, rest)) => (p.as_str(), rest),
        None => ("pip", &[]),
    };
    let mut cmd = StepCommand::new(program, &[], INSTALLER_ENV);
    cmd.args.extend(prefix.iter().cloned());
    cmd.args.extend(args.iter().cloned());
    cmd
}

fn command_for(config: &ProvisionConfig, step: Step) -> StepCommand {
    match step {
        Step::RefreshIndex => package_manager(config, &["update"]),
        Step::InstallNative => {
            package_manager(config, &["install", "-y", config.native_package.as_str()])
        }
        Step::InstallBinding => {
            let binding = &config.binding;
            let mut args = vec!["install".to_string()];
            if binding.strict_binary {
                args.push("--only-binary=:all:".to_string());
                args.push("--platform".to_string());
                args.push(binding.platform.clone());
                args.push("--target".to_string());
                args.push(binding.target.display().to_string());
            }
            args.push(binding.package.clone());
            installer(config, &args)
        }
        Step::InstallManifest => installer(
            config,
            &[
                "install".to_string(),
                "-r".to_string(),
                config.manifest.display().to_string(),
            ],
        ),
    }
}
