//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` is the production implementation that uses tokio
//! for async process execution, with an optional timeout that kills the
//! child on expiry.

use std::process::{ExitStatus, Output, Stdio};
use std::time::Duration;

use tokio::io::AsyncReadExt;

use crate::application::ports::{CommandRunner, RunError};

/// Timeout for short captured probes such as `pip --version`.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Production `CommandRunner`.
///
/// Without a timeout each call waits for the child however long it takes.
/// With one, `tokio::select!` races the child against a sleep and kills the
/// child explicitly when the sleep wins; dropping the wait future alone would
/// leave the process running on some platforms.
pub struct TokioCommandRunner {
    timeout: Option<Duration>,
    stdout_to_stderr: bool,
}

impl TokioCommandRunner {
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            timeout,
            stdout_to_stderr: false,
        }
    }

    /// Send the stdout of `run_status` children to our stderr, keeping our
    /// own stdout free for a machine-readable document.
    #[must_use]
    pub fn with_stdout_to_stderr(mut self) -> Self {
        self.stdout_to_stderr = true;
        self
    }

    async fn wait_or_kill(
        &self,
        program: &str,
        child: &mut tokio::process::Child,
    ) -> Result<ExitStatus, RunError> {
        let wait_error = |source| RunError::Wait {
            program: program.to_string(),
            source,
        };
        let Some(timeout) = self.timeout else {
            return child.wait().await.map_err(wait_error);
        };
        tokio::select! {
            result = child.wait() => result.map_err(wait_error),
            () = tokio::time::sleep(timeout) => {
                let _ = child.kill().await;
                Err(RunError::TimedOut { program: program.to_string(), after: timeout })
            }
        }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output, RunError> {
        let mut child = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: program.to_string(),
                source,
            })?;

        let mut stdout_handle = child.stdout.take();
        let mut stderr_handle = child.stderr.take();

        // Drain both pipes while waiting so a chatty child cannot block on a full pipe.
        let (status, stdout, stderr) = tokio::join!(
            self.wait_or_kill(program, &mut child),
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stdout_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
            async {
                let mut buf = Vec::new();
                if let Some(ref mut h) = stderr_handle {
                    let _ = h.read_to_end(&mut buf).await;
                }
                buf
            },
        );

        Ok(Output {
            status: status?,
            stdout,
            stderr,
        })
    }

    async fn run_status(
        &self,
        program: &str,
        args: &[&str],
        env: &[(&str, &str)],
    ) -> Result<ExitStatus, RunError> {
        tracing::debug!(program, ?args, "spawning");
        let mut command = tokio::process::Command::new(program);
        command
            .args(args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if self.stdout_to_stderr {
            command.stdout(Stdio::from(std::io::stderr()));
        }
        let mut child = command
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: program.to_string(),
                source,
            })?;

        self.wait_or_kill(program, &mut child).await
    }
}
