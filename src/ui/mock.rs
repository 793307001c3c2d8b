//! Mock UI implementation for testing.
//!
//! `MockUI` implements the `UserInterface` trait and captures all
//! interactions for later assertion. It can be configured with
//! pre-determined prompt responses.
//!
//! # Example
//!
//! ```
//! use kiln::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.set_prompt_response("project_name", "demo");
//!
//! ui.message("Starting");
//! ui.success("Done!");
//!
//! assert!(ui.has_message("Starting"));
//! assert!(ui.has_success("Done!"));
//! ```

use std::collections::{HashMap, VecDeque};

use crate::error::{KilnError, Result};

use super::{result_from_text, Prompt, PromptResult, RunSummary, UserInterface};

/// Mock UI implementation for testing.
///
/// Supports both single responses (via `set_prompt_response`) and queued
/// responses (via `queue_prompt_responses`) for keys asked more than once.
#[derive(Debug, Default)]
pub struct MockUI {
    messages: Vec<String>,
    notes: Vec<String>,
    successes: Vec<String>,
    skips: Vec<String>,
    warnings: Vec<String>,
    errors: Vec<String>,
    headers: Vec<String>,
    phases: Vec<String>,
    steps: Vec<String>,
    summaries: Vec<RunSummary>,
    prompt_responses: HashMap<String, String>,
    prompt_queues: HashMap<String, VecDeque<String>>,
    prompts_shown: Vec<String>,
}

impl MockUI {
    /// Create a new MockUI with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a response for a prompt key.
    pub fn set_prompt_response(&mut self, key: &str, response: &str) {
        self.prompt_responses
            .insert(key.to_string(), response.to_string());
    }

    /// Queue multiple responses for the same prompt key.
    ///
    /// Responses are returned in order, then fall back to
    /// `set_prompt_response` or the prompt's default.
    pub fn queue_prompt_responses(&mut self, key: &str, responses: Vec<&str>) {
        let queue = responses.into_iter().map(|s| s.to_string()).collect();
        self.prompt_queues.insert(key.to_string(), queue);
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn successes(&self) -> &[String] {
        &self.successes
    }

    pub fn skips(&self) -> &[String] {
        &self.skips
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Titles of phases that were started.
    pub fn phases(&self) -> &[String] {
        &self.phases
    }

    /// Titles of steps that were started.
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn summaries(&self) -> &[RunSummary] {
        &self.summaries
    }

    /// Get all prompts that were shown (by key).
    pub fn prompts_shown(&self) -> &[String] {
        &self.prompts_shown
    }

    /// Check if a specific message was shown.
    pub fn has_message(&self, msg: &str) -> bool {
        self.messages.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific note was shown.
    pub fn has_note(&self, msg: &str) -> bool {
        self.notes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific success was shown.
    pub fn has_success(&self, msg: &str) -> bool {
        self.successes.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific skip was shown.
    pub fn has_skip(&self, msg: &str) -> bool {
        self.skips.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific warning was shown.
    pub fn has_warning(&self, msg: &str) -> bool {
        self.warnings.iter().any(|m| m.contains(msg))
    }

    /// Check if a specific error was shown.
    pub fn has_error(&self, msg: &str) -> bool {
        self.errors.iter().any(|m| m.contains(msg))
    }

    fn scripted_response(&mut self, key: &str) -> Option<String> {
        if let Some(response) = self.prompt_queues.get_mut(key).and_then(VecDeque::pop_front) {
            return Some(response);
        }
        self.prompt_responses.get(key).cloned()
    }
}

impl UserInterface for MockUI {
    fn message(&mut self, msg: &str) {
        self.messages.push(msg.to_string());
    }

    fn note(&mut self, msg: &str) {
        self.notes.push(msg.to_string());
    }

    fn success(&mut self, msg: &str) {
        self.successes.push(msg.to_string());
    }

    fn skipped(&mut self, msg: &str) {
        self.skips.push(msg.to_string());
    }

    fn warning(&mut self, msg: &str) {
        self.warnings.push(msg.to_string());
    }

    fn error(&mut self, msg: &str) {
        self.errors.push(msg.to_string());
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        self.prompts_shown.push(prompt.key.clone());

        let answer = self
            .scripted_response(&prompt.key)
            .or_else(|| prompt.default.clone())
            .unwrap_or_default();

        if let Some(validation) = &prompt.validation {
            validation
                .check(&answer)
                .map_err(|error| KilnError::ConfigValidationError {
                    message: format!("Invalid value for '{}': {}", prompt.key, error),
                })?;
        }

        Ok(result_from_text(&prompt.prompt_type, &answer))
    }

    fn show_phase(&mut self, title: &str, _description: Option<&str>) {
        self.phases.push(title.to_string());
    }

    fn show_step(&mut self, title: &str, _description: Option<&str>) {
        self.steps.push(title.to_string());
    }

    fn show_run_header(&mut self, name: &str, _version: Option<&str>, _step_count: usize) {
        self.headers.push(name.to_string());
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        self.summaries.push(summary.clone());
    }
}
