//! Command steps.

use std::path::Path;

use crate::config::Interaction;
use crate::error::Result;
use crate::shell::{execute, execute_interactive, CommandOptions, CommandResult, OperatorInput};

/// Run a resolved command in `cwd`.
///
/// With `interactive` set the command's output is watched for the scripted
/// `interactions` and operator input is relayed to it; otherwise it
/// inherits the terminal. A non-zero exit is an error.
pub fn run_command(
    command: &str,
    cwd: &Path,
    interactive: bool,
    interactions: &[Interaction],
    operator: &OperatorInput,
) -> Result<CommandResult> {
    let options = CommandOptions {
        cwd: Some(cwd.to_path_buf()),
    };

    let result = if interactive {
        execute_interactive(command, &options, interactions, operator)?
    } else {
        execute(command, &options)?
    };

    tracing::debug!(
        "Command '{}' exited with {:?} after {:?}",
        command,
        result.exit_code,
        result.duration
    );
    result.into_result(command)
}
