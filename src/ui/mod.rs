//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//!
//! # Example
//!
//! ```
//! use kiln::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_phase("Setup", None);
//! ui.success("Setup complete!");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::format_duration;
pub use prompts::prompt_user;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, KilnTheme};

use regex::Regex;
use std::time::Duration;

use crate::error::Result;
use crate::template::Value;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display an informational, low-emphasis note.
    fn note(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a skipped message.
    fn skipped(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a prompt and get user input.
    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult>;

    /// Show the start of a phase.
    fn show_phase(&mut self, title: &str, description: Option<&str>);

    /// Show the start of a step.
    fn show_step(&mut self, title: &str, description: Option<&str>);

    /// Show the banner at the start of a run.
    fn show_run_header(&mut self, name: &str, version: Option<&str>, step_count: usize);

    /// Show the end-of-run summary line.
    fn show_run_summary(&mut self, summary: &RunSummary);
}

/// A prompt to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (the variable name the answer is stored under).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// The type of prompt.
    pub prompt_type: PromptType,
    /// Default value if user just presses enter.
    pub default: Option<String>,
    /// Pattern text answers must match.
    pub validation: Option<InputValidation>,
}

/// The type of prompt.
#[derive(Debug, Clone)]
pub enum PromptType {
    /// Yes/no confirmation.
    Confirm,
    /// Free-form text input.
    Input,
    /// Free-form text input without echo.
    Password,
    /// Select one from a list of options.
    Select { options: Vec<PromptOption> },
    /// Select multiple from a list of options.
    MultiSelect { options: Vec<PromptOption> },
}

/// An option in a select prompt.
#[derive(Debug, Clone)]
pub struct PromptOption {
    /// Display label.
    pub label: String,
    /// Value returned when selected.
    pub value: String,
}

/// A regex that text answers must match.
#[derive(Debug, Clone)]
pub struct InputValidation {
    pub pattern: Regex,
    /// Shown when an answer does not match.
    pub error: String,
}

impl InputValidation {
    /// Check an answer, returning the error message on mismatch.
    pub fn check(&self, input: &str) -> std::result::Result<(), String> {
        if self.pattern.is_match(input) {
            Ok(())
        } else {
            Err(self.error.clone())
        }
    }
}

/// Result of a prompt.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptResult {
    /// Boolean result from confirm.
    Bool(bool),
    /// String result from input or select.
    String(String),
    /// Multiple string results from multi-select.
    Strings(Vec<String>),
}

impl PromptResult {
    /// Get as string, suitable for interpolation.
    pub fn as_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::String(s) => s.clone(),
            Self::Strings(v) => v.join(","),
        }
    }

    /// Convert into a variable value.
    pub fn into_value(self) -> Value {
        match self {
            Self::Bool(b) => Value::Bool(b),
            Self::String(s) => Value::String(s),
            Self::Strings(v) => Value::String(v.join(",")),
        }
    }
}

/// Totals shown at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    /// Steps whose action executed.
    pub steps_run: usize,
    /// Steps skipped by a `when` condition (their own or their phase's).
    pub steps_skipped: usize,
    /// Wall-clock time of the run.
    pub total_duration: Duration,
}

impl RunSummary {
    /// Render the summary as a single line.
    pub fn line(&self) -> String {
        format!(
            "{} run · {} skipped · {}",
            self.steps_run,
            self.steps_skipped,
            format_duration(self.total_duration)
        )
    }
}

/// Parse a free-text answer into the result shape a prompt type expects.
///
/// Shared by the UIs that answer from strings (env overrides, defaults,
/// scripted test responses).
pub(crate) fn result_from_text(prompt_type: &PromptType, text: &str) -> PromptResult {
    match prompt_type {
        PromptType::Confirm => PromptResult::Bool(matches!(
            text.trim().to_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        )),
        PromptType::MultiSelect { .. } if text.trim().is_empty() => PromptResult::Strings(Vec::new()),
        PromptType::MultiSelect { .. } => {
            PromptResult::Strings(text.split(',').map(|s| s.trim().to_string()).collect())
        }
        _ => PromptResult::String(text.to_string()),
    }
}
