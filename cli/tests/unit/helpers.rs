//! Shared test helpers: a recording `CommandRunner`, a recording
//! `ProgressReporter`, and in-memory manifest/host doubles.

#![allow(dead_code, clippy::expect_used)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use envprov_cli::application::ports::{
    CommandRunner, HostProbe, ManifestReader, ProgressReporter, RunError,
};
use envprov_cli::domain::{Manifest, ManifestError};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── MockCommandRunner ────────────────────────────────────────────────────────

/// What the next call should do.
#[derive(Debug, Clone, Copy)]
pub enum Scripted {
    Exit(i32),
    SpawnError,
    Timeout,
}

/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

/// A `CommandRunner` that records every call and replays scripted results
/// in order. Once the script runs out every call exits 0.
#[derive(Default)]
pub struct MockCommandRunner {
    calls: RefCell<Vec<Call>>,
    script: RefCell<VecDeque<Scripted>>,
    stdout: Vec<u8>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripted(results: &[Scripted]) -> Self {
        Self {
            script: RefCell::new(results.iter().copied().collect()),
            ..Self::default()
        }
    }

    /// Fail the `n`-th call (0-based) with `code`; all others succeed.
    pub fn failing_at(n: usize, code: i32) -> Self {
        let mut script = vec![Scripted::Exit(0); n];
        script.push(Scripted::Exit(code));
        Self::scripted(&script)
    }

    #[must_use]
    pub fn with_stdout(mut self, stdout: &[u8]) -> Self {
        self.stdout = stdout.to_vec();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program.clone()).collect()
    }

    fn next(&self, program: &str, args: &[&str], env: &[(&str, &str)]) -> Result<ExitStatus, RunError> {
        self.calls.borrow_mut().push(Call {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            env: env
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
        });
        match self.script.borrow_mut().pop_front().unwrap_or(Scripted::Exit(0)) {
            Scripted::Exit(code) => Ok(exit_status(code)),
            Scripted::SpawnError => Err(RunError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file"),
            }),
            Scripted::Timeout => Err(RunError::TimedOut {
                program: program.to_string(),
                after: Duration::from_secs(5),
            }),
        }
    }
}

impl CommandRunner for MockCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output, RunError> {
        let status = self.next(program, args, &[])?;
        Ok(Output {
            status,
            stdout: self.stdout.clone(),
            stderr: Vec::new(),
        })
    }

    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExitStatus, RunError> {
        self.next(program, args, env)
    }
}

// ── RecordingReporter ────────────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }
}

// ── Manifest doubles ─────────────────────────────────────────────────────────

/// Serves fixed manifest text for any path.
pub struct TextManifest(pub &'static str);

impl ManifestReader for TextManifest {
    fn read_manifest(&self, _: &Path) -> Result<Manifest, ManifestError> {
        Manifest::parse(self.0)
    }
}

/// Behaves as if the manifest file does not exist.
pub struct MissingManifest;

impl ManifestReader for MissingManifest {
    fn read_manifest(&self, path: &Path) -> Result<Manifest, ManifestError> {
        Err(ManifestError::Missing {
            path: path.to_path_buf(),
        })
    }
}

// ── Host double ──────────────────────────────────────────────────────────────

/// A host where only `installed` programs resolve.
pub struct FakeHost {
    pub installed: Vec<&'static str>,
    pub root: bool,
}

impl HostProbe for FakeHost {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.installed
            .contains(&program)
            .then(|| PathBuf::from("/usr/bin").join(program))
    }

    fn is_root(&self) -> bool {
        self.root
    }
}
