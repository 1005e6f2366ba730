//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` and never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;

use crate::domain::{Manifest, ManifestError, ProvisionConfig};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Why a process could not be run to completion.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} timed out after {}s", after.as_secs())]
    TimedOut { program: String, after: Duration },
}

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds the
    /// runner's timeout. On timeout the child must be killed.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output, RunError>;

    /// Run a program with inherited stdio and return only its exit status.
    ///
    /// `env` is added on top of the current process environment.
    ///
    /// # Errors
    ///
    /// Same as [`CommandRunner::run`].
    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExitStatus, RunError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Manifest and Config Ports ─────────────────────────────────────────────────

/// Loads and parses the dependency manifest.
pub trait ManifestReader {
    /// Read the manifest at `path`.
    ///
    /// # Errors
    ///
    /// `Missing` when the file does not exist, `Unreadable` for any other
    /// I/O failure, `InvalidLine` when it does not parse.
    fn read_manifest(&self, path: &Path) -> Result<Manifest, ManifestError>;
}

/// Abstracts where configuration comes from.
pub trait ConfigStore {
    /// Load the effective configuration (defaults when no file exists).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, parsed, or
    /// contains unknown keys.
    fn load(&self) -> Result<ProvisionConfig>;

    /// The file that `load` reads, or `None` when defaults are in effect.
    fn path(&self) -> Option<PathBuf>;
}

// ── Host Probe Port ───────────────────────────────────────────────────────────

/// Read-only questions about the host, used by the preflight check.
pub trait HostProbe {
    /// Resolve `program` the way process spawning would (`PATH` lookup for
    /// bare names, existence check for paths).
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Whether the current process runs with root privileges.
    fn is_root(&self) -> bool;
}
