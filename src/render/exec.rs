use std::process::{Command, Stdio};

use crate::compile::invocation::Invocation;
use crate::foundation::error::{LaminateError, LaminateResult};

/// Captured result of one external process run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` when the process was terminated by a signal.
    pub status: Option<i32>,
}

impl ProcessOutput {
    /// A run that exited with status 0 and printed nothing.
    pub fn success() -> Self {
        Self {
            status: Some(0),
            ..Self::default()
        }
    }

    /// Treat anything on stderr, or any status other than 0, as a failure of `command`.
    pub fn check(self, command: &str, context: &str) -> LaminateResult<Self> {
        let stderr = self.stderr.trim();
        if self.status == Some(0) && stderr.is_empty() {
            return Ok(self);
        }
        Err(LaminateError::Tool {
            command: command.to_string(),
            context: context.to_string(),
            status: self.status,
            stderr: stderr.to_string(),
        })
    }
}

/// Runs external commands to completion.
///
/// Implementations are shared by every render thread.
pub trait ProcessRunner: Send + Sync {
    /// Run `command` with `args` and wait for it. An `Err` means the process could not be run at
    /// all; a process that ran and failed is reported through [`ProcessOutput`].
    fn execute(&self, command: &str, args: &[String]) -> LaminateResult<ProcessOutput>;

    /// Run an invocation and fail unless it exited cleanly with an empty stderr.
    fn run_checked(&self, invocation: &Invocation, context: &str) -> LaminateResult<ProcessOutput> {
        self.execute(&invocation.command, &invocation.args)?
            .check(&invocation.command, context)
    }
}

/// Runs commands from `PATH` with `std::process`.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn execute(&self, command: &str, args: &[String]) -> LaminateResult<ProcessOutput> {
        // Arguments go straight to the executable; no shell is involved, so nothing needs
        // quoting.
        let output = Command::new(command)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                LaminateError::io(
                    format!("failed to spawn `{command}` (is it installed and on PATH?)"),
                    e,
                )
            })?;

        Ok(ProcessOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
        })
    }
}

/// Return `true` when `command -version` can be run from `PATH`.
pub fn is_tool_on_path(command: &str) -> bool {
    Command::new(command)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
