//! Non-interactive UI for CI/headless environments.

use std::collections::HashMap;

use crate::error::{KilnError, Result};

use super::{result_from_text, OutputMode, Prompt, PromptResult, RunSummary, UserInterface};

/// Prefix of environment variables that answer prompts.
pub const PROMPT_ENV_PREFIX: &str = "KILN_PROMPT_";

/// UI implementation for non-interactive mode.
///
/// Prompts are answered from `KILN_PROMPT_<NAME>` environment variables,
/// then from the prompt's default. A prompt with neither is an error.
pub struct NonInteractiveUI {
    mode: OutputMode,
    env_overrides: HashMap<String, String>,
}

impl NonInteractiveUI {
    /// Create a new non-interactive UI.
    pub fn new(mode: OutputMode) -> Self {
        let env_overrides: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with(PROMPT_ENV_PREFIX))
            .collect();

        Self {
            mode,
            env_overrides,
        }
    }

    /// Create with explicit overrides (for testing).
    pub fn with_overrides(mode: OutputMode, overrides: HashMap<String, String>) -> Self {
        Self {
            mode,
            env_overrides: overrides,
        }
    }
}

/// Environment variable name answering the prompt stored under `key`.
///
/// `project-name` → `KILN_PROMPT_PROJECT_NAME`.
pub fn prompt_env_key(key: &str) -> String {
    let normalized: String = key
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{}{}", PROMPT_ENV_PREFIX, normalized)
}

impl UserInterface for NonInteractiveUI {
    fn message(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn note(&mut self, msg: &str) {
        if self.mode.shows_notes() {
            println!("  ℹ {}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        println!("  ✓ {}", msg);
    }

    fn skipped(&mut self, msg: &str) {
        println!("  ○ {}", msg);
    }

    fn warning(&mut self, msg: &str) {
        eprintln!("⚠ {}", msg);
    }

    fn error(&mut self, msg: &str) {
        eprintln!("✗ {}", msg);
    }

    fn prompt(&mut self, prompt: &Prompt) -> Result<PromptResult> {
        let env_key = prompt_env_key(&prompt.key);
        let answer = self
            .env_overrides
            .get(&env_key)
            .or(prompt.default.as_ref())
            .ok_or_else(|| KilnError::ConfigValidationError {
                message: format!(
                    "Cannot prompt for '{}' in non-interactive mode (set {} or give the prompt a default)",
                    prompt.key, env_key
                ),
            })?;

        if let Some(validation) = &prompt.validation {
            validation
                .check(answer)
                .map_err(|error| KilnError::ConfigValidationError {
                    message: format!("Invalid value for '{}': {}", prompt.key, error),
                })?;
        }

        Ok(result_from_text(&prompt.prompt_type, answer))
    }

    fn show_phase(&mut self, title: &str, description: Option<&str>) {
        if self.mode.shows_progress() {
            println!("\n▶ {}", title);
            if let Some(desc) = description {
                println!("  {}", desc);
            }
        }
    }

    fn show_step(&mut self, title: &str, description: Option<&str>) {
        if self.mode.shows_progress() {
            match description {
                Some(desc) => println!("◆ {} {}", title, desc),
                None => println!("◆ {}", title),
            }
        }
    }

    fn show_run_header(&mut self, name: &str, version: Option<&str>, step_count: usize) {
        let step_label = if step_count == 1 { "step" } else { "steps" };
        let version = version.map(|v| format!(" v{}", v)).unwrap_or_default();
        println!("\n🔥 {}{} · {} {}\n", name, version, step_count, step_label);
    }

    fn show_run_summary(&mut self, summary: &RunSummary) {
        println!();
        println!("Summary: {}", summary.line());
    }
}
