//! An oracle that runs an external program once per candidate.
//!
//! The program learns which candidate it is testing in two ways:
//! - Every `{version}` in its arguments is replaced with the candidate
//! - `FIDDLE_VERSION` is set in its environment
//!
//! # Classification
//!
//! - Exit code 0: `Success`
//! - Any other exit code: `Failure`
//! - Killed by a signal, timed out, or cancelled: `Invalid`
//! - Could not be spawned at all: `Err`, which the driver also treats as `Invalid`
//!
//! # Output
//!
//! The child's stdout goes wherever [`ChildOutput`] says. Use
//! `ChildOutput::Stderr` when this process's own stdout carries a
//! machine-readable report.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::Oracle;
use crate::config::BisectConfig;
use crate::types::{RunResult, Version};

/// Placeholder replaced with the candidate in each argument.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Environment variable carrying the candidate.
pub const VERSION_ENV: &str = "FIDDLE_VERSION";

/// Errors from launching the test program.
#[derive(Debug, Error)]
pub enum CommandOracleError {
    /// The program could not be started.
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// Waiting on the child failed.
    #[error("failed to wait on {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// Where the test program's stdout goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChildOutput {
    /// Share this process's stdout.
    #[default]
    Inherit,
    /// Redirect to this process's stderr.
    Stderr,
    /// Discard.
    Null,
}

impl ChildOutput {
    fn stdio(self) -> Stdio {
        match self {
            ChildOutput::Inherit => Stdio::inherit(),
            ChildOutput::Stderr => Stdio::from(io::stderr()),
            ChildOutput::Null => Stdio::null(),
        }
    }
}

/// How a child run ended.
enum RunExit {
    Exited(io::Result<ExitStatus>),
    TimedOut,
    Cancelled,
}

/// Runs `program args...` per candidate.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    workdir: Option<PathBuf>,
    timeout: Option<Duration>,
    stdout: ChildOutput,
    cancel: CancellationToken,
}

impl CommandOracle {
    /// Creates an oracle with no timeout and a fresh cancellation token.
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        CommandOracle {
            program: program.into(),
            args: args.into_iter().collect(),
            workdir: None,
            timeout: None,
            stdout: ChildOutput::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates an oracle using the timeout from `config`.
    pub fn from_config(
        program: impl Into<String>,
        args: impl IntoIterator<Item = String>,
        config: &BisectConfig,
    ) -> Self {
        Self::new(program, args).with_timeout(config.run_timeout)
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses `cancel` to abort an in-flight run. A cancelled run is `Invalid`.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_stdout(mut self, stdout: ChildOutput) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// The arguments for a run against `version`.
    pub fn args_for(&self, version: &Version) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(VERSION_PLACEHOLDER, version.as_str()))
            .collect()
    }

    #[instrument(skip(self), fields(program = %self.program))]
    async fn run(&self, version: &Version) -> Result<RunResult, CommandOracleError> {
        let mut command = Command::new(&self.program);
        command
            .args(self.args_for(version))
            .env(VERSION_ENV, version.as_str())
            .stdin(Stdio::null())
            .stdout(self.stdout.stdio())
            .kill_on_drop(true);
        if let Some(dir) = &self.workdir {
            command.current_dir(dir);
        }

        let mut child = command.spawn().map_err(|source| CommandOracleError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let exit = {
            let wait = child.wait();
            tokio::select! {
                _ = self.cancel.cancelled() => RunExit::Cancelled,
                exit = wait_with_timeout(wait, self.timeout) => exit,
            }
        };

        match exit {
            RunExit::Exited(Ok(status)) => {
                let result = classify_exit(status);
                debug!(%status, %result, "Test program exited");
                Ok(result)
            }
            RunExit::Exited(Err(source)) => Err(CommandOracleError::Wait {
                program: self.program.clone(),
                source,
            }),
            RunExit::TimedOut => {
                warn!(timeout = ?self.timeout, "Test program timed out; killing it");
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill timed-out test program");
                }
                Ok(RunResult::Invalid)
            }
            RunExit::Cancelled => {
                debug!("Run cancelled; killing test program");
                if let Err(e) = child.kill().await {
                    warn!(error = %e, "Failed to kill cancelled test program");
                }
                Ok(RunResult::Invalid)
            }
        }
    }
}

impl Oracle for CommandOracle {
    type Error = CommandOracleError;

    fn run_version(
        &self,
        version: &Version,
    ) -> impl Future<Output = Result<RunResult, Self::Error>> + Send {
        self.run(version)
    }
}

async fn wait_with_timeout(
    wait: impl Future<Output = io::Result<ExitStatus>>,
    timeout: Option<Duration>,
) -> RunExit {
    match timeout {
        Some(limit) => match tokio::time::timeout(limit, wait).await {
            Ok(status) => RunExit::Exited(status),
            Err(_) => RunExit::TimedOut,
        },
        None => RunExit::Exited(wait.await),
    }
}

/// Maps an exit status to a run result.
///
/// No exit code means the child was killed by a signal.
pub fn classify_exit(status: ExitStatus) -> RunResult {
    match status.code() {
        Some(0) => RunResult::Success,
        Some(_) => RunResult::Failure,
        None => RunResult::Invalid,
    }
}
