//! Step execution engine.
//!
//! Dispatches a [`ResolvedStep`] to its executor and then runs its
//! validation.

use std::time::{Duration, Instant};

use crate::error::Result;
use crate::shell::OperatorInput;
use crate::ui::UserInterface;

use super::command::run_command;
use super::directory::create_directories;
use super::file::run_file_action;
use super::resolved::{FileAction, ResolvedStep, StepAction};
use super::validate::run_validation;

/// Options for step execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOptions {
    /// Describe the step instead of running it.
    pub dry_run: bool,
}

/// Result of executing a step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Step title.
    pub title: String,

    /// Execution duration.
    pub duration: Duration,

    /// Exit code (if a command was run).
    pub exit_code: Option<i32>,

    /// What would have happened (dry run only).
    pub description: Option<String>,
}

/// Execute a single step and its validation.
///
/// Any error aborts the step; validation only runs after the action
/// succeeded.
pub fn execute_step(
    step: &ResolvedStep,
    operator: &OperatorInput,
    ui: &mut dyn UserInterface,
    options: &ExecutionOptions,
) -> Result<StepResult> {
    if options.dry_run {
        return Ok(StepResult {
            title: step.title.clone(),
            duration: Duration::ZERO,
            exit_code: None,
            description: Some(describe(&step.action)),
        });
    }

    let start = Instant::now();
    let mut exit_code = None;

    match &step.action {
        StepAction::Command {
            command,
            cwd,
            interactive,
            interactions,
        } => {
            let result = run_command(command, cwd, *interactive, interactions, operator)?;
            exit_code = result.exit_code;
        }
        StepAction::Directory { paths } => create_directories(paths, ui)?,
        StepAction::File(action) => run_file_action(action, ui)?,
    }

    if let Some(validation) = &step.validation {
        run_validation(validation, ui)?;
    }

    Ok(StepResult {
        title: step.title.clone(),
        duration: start.elapsed(),
        exit_code,
        description: None,
    })
}

/// One-line description of what an action would do.
pub fn describe(action: &StepAction) -> String {
    match action {
        StepAction::Command {
            command,
            cwd,
            interactive,
            ..
        } => {
            let mode = if *interactive { " (interactive)" } else { "" };
            format!("Would run{}: {} in {}", mode, command, cwd.display())
        }
        StepAction::Directory { paths } => {
            let list: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
            format!("Would create directory {}", list.join(", "))
        }
        StepAction::File(FileAction::Create { path, .. }) => {
            format!("Would create {}", path.display())
        }
        StepAction::File(FileAction::Edit { path, .. }) => {
            format!("Would edit {}", path.display())
        }
        StepAction::File(FileAction::Delete { path }) => {
            format!("Would delete {}", path.display())
        }
        StepAction::File(FileAction::Move { from, to }) => {
            format!("Would move {} to {}", from.display(), to.display())
        }
    }
}
