//! Child process execution.
//!
//! Commands are run from an argv, never through a shell, so package
//! targets containing `#` or `@` reach the installer untouched.

use crate::error::{EnvstrapError, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// A fully described child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name or path.
    pub program: PathBuf,

    /// Arguments after the program.
    pub args: Vec<String>,

    /// Working directory.
    pub cwd: PathBuf,

    /// Variables set on top of the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Inherited variables to remove.
    pub env_remove: Vec<String>,
}

impl Invocation {
    /// Start describing a command run in `cwd`.
    pub fn new(program: impl Into<PathBuf>, cwd: &Path) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.to_path_buf(),
            env: BTreeMap::new(),
            env_remove: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Render as a single line for display and logs.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Result of executing a command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output, when captured.
    pub stdout: String,

    /// Standard error, when captured.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandOptions {
    /// Capture stdout and stderr (if false, both inherit from the parent).
    pub capture: bool,
}

/// Something that can run an [`Invocation`].
///
/// The bootstrap runner talks only to this trait, which keeps step
/// sequencing testable without spawning real installers.
pub trait ProcessRunner {
    /// Run to completion.
    ///
    /// # Errors
    ///
    /// `ToolNotFound` if the program does not exist, `CommandFailed` if it
    /// could not be started for another reason. A program that starts and
    /// exits non-zero is an `Ok` failure result.
    fn run(&self, invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
        execute(invocation, options)
    }
}

/// Execute an invocation.
pub fn execute(invocation: &Invocation, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);
    cmd.current_dir(&invocation.cwd);

    for key in &invocation.env_remove {
        cmd.env_remove(key);
    }
    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }

    if options.capture {
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());
    } else {
        cmd.stdout(Stdio::inherit());
        cmd.stderr(Stdio::inherit());
    }

    tracing::debug!("Executing: {}", invocation.display());

    let output = cmd.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvstrapError::ToolNotFound {
                tool: invocation.program.display().to_string(),
            }
        } else {
            EnvstrapError::CommandFailed {
                command: invocation.display(),
                code: None,
            }
        }
    })?;

    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured() -> CommandOptions {
        CommandOptions { capture: true }
    }

    #[test]
    fn invocation_display_joins_argv() {
        let inv = Invocation::new("pip", Path::new("."))
            .arg("install")
            .args(["--upgrade", "click"]);
        assert_eq!(inv.display(), "pip install --upgrade click");
    }

    #[test]
    fn missing_program_is_tool_not_found() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("envstrap-no-such-tool-xyz", temp.path());
        let err = execute(&inv, &captured()).unwrap_err();
        assert!(matches!(err, EnvstrapError::ToolNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn execute_successful_command() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("echo", temp.path()).arg("hello");
        let result = execute(&inv, &captured()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_failing_command_reports_code() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("sh", temp.path()).args(["-c", "exit 3"]);
        let result = execute(&inv, &captured()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[cfg(unix)]
    #[test]
    fn execute_applies_env_and_removals() {
        let temp = tempfile::TempDir::new().unwrap();
        let mut inv = Invocation::new("sh", temp.path())
            .args(["-c", "echo \"$MY_VAR:${HOME:-unset}\""]);
        inv.env.insert("MY_VAR".to_string(), "my_value".to_string());
        inv.env_remove.push("HOME".to_string());

        let result = execute(&inv, &captured()).unwrap();
        assert!(result.stdout.contains("my_value:unset"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_runs_in_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("sh", temp.path()).args(["-c", "touch marker"]);
        execute(&inv, &captured()).unwrap();
        assert!(temp.path().join("marker").exists());
    }

    #[test]
    fn system_runner_delegates_to_execute() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("envstrap-no-such-tool-xyz", temp.path());
        assert!(SystemRunner.run(&inv, &captured()).is_err());
    }
}
