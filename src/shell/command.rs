//! Shell command execution.

use crate::error::{KilnError, Result};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use super::platform::shell_invocation;

/// Result of executing a shell command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output, when it was observed (interactive mode only).
    pub stdout: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Build a result from an exit status.
    pub fn from_status(status: std::process::ExitStatus, stdout: String, duration: Duration) -> Self {
        Self {
            exit_code: status.code(),
            stdout,
            duration,
            success: status.success(),
        }
    }

    /// Turn a non-zero exit into [`KilnError::CommandFailed`].
    pub fn into_result(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(KilnError::CommandFailed {
                command: command.to_string(),
                code: self.exit_code,
            })
        }
    }
}

/// Options for command execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory (None = inherit the process's).
    pub cwd: Option<PathBuf>,
}

/// Execute a shell command with stdin, stdout and stderr inherited.
///
/// A non-zero exit is reported in the returned [`CommandResult`]; only a
/// failure to start the shell is an error.
pub fn execute(command: &str, options: &CommandOptions) -> Result<CommandResult> {
    let start = Instant::now();

    let mut cmd = shell_command(command, options);
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    tracing::debug!("Running command: {}", command);
    let status = cmd.status().map_err(|source| KilnError::CommandSpawn {
        command: command.to_string(),
        source,
    })?;

    Ok(CommandResult::from_status(
        status,
        String::new(),
        start.elapsed(),
    ))
}

/// Build a `Command` that runs `command` through the platform shell.
pub(crate) fn shell_command(command: &str, options: &CommandOptions) -> Command {
    let (shell, flag) = shell_invocation();

    let mut cmd = Command::new(shell);
    cmd.arg(flag);
    cmd.arg(command);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let result = execute("exit 0", &CommandOptions::default()).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
    }

    #[test]
    fn execute_failing_command() {
        let result = execute("exit 3", &CommandOptions::default()).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn into_result_reports_exit_code() {
        let result = execute("exit 7", &CommandOptions::default()).unwrap();
        let err = result.into_result("exit 7").unwrap_err();

        assert!(matches!(
            err,
            KilnError::CommandFailed { code: Some(7), .. }
        ));
        assert!(err.to_string().contains("exit code 7"));
    }

    #[cfg(unix)]
    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let options = CommandOptions {
            cwd: Some(temp.path().to_path_buf()),
        };

        let result = execute("touch marker.txt", &options).unwrap();

        assert!(result.success);
        assert!(temp.path().join("marker.txt").exists());
    }

    #[test]
    fn execute_in_missing_cwd_is_spawn_error() {
        let options = CommandOptions {
            cwd: Some(PathBuf::from("/definitely/not/a/real/dir")),
        };

        let result = execute("exit 0", &options);
        assert!(matches!(result, Err(KilnError::CommandSpawn { .. })));
    }

    #[test]
    fn command_result_tracks_duration() {
        let result = execute("exit 0", &CommandOptions::default()).unwrap();
        assert!(result.duration.as_millis() < 5000);
    }
}
