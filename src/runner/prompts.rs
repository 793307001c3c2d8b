//! Prompt collection.
//!
//! Turns `config.prompts` into UI prompts, asks them in document order and
//! merges the answers into the variable store.

use regex::Regex;

use crate::config::{KilnConfig, PromptConfig};
use crate::error::{KilnError, Result};
use crate::template::{TemplateResolver, Value, VariableStore};
use crate::ui::{InputValidation, Prompt, PromptOption, PromptType, UserInterface};

/// Shown when a prompt's `validate` block has no `error`.
pub const DEFAULT_VALIDATION_ERROR: &str = "Invalid input";

/// Seed the store from `config.variables` and add every prompt answer.
///
/// Defaults are resolved against the seeded variables only, not earlier
/// answers. A repeated prompt name keeps the last answer.
pub fn collect_variables(config: &KilnConfig, ui: &mut dyn UserInterface) -> Result<VariableStore> {
    let seeded = VariableStore::seeded(&config.config.variables);

    let mut answers = Vec::with_capacity(config.config.prompts.len());
    {
        let resolver = TemplateResolver::new(&seeded);
        for prompt_config in &config.config.prompts {
            let prompt = build_prompt(prompt_config, &resolver)?;
            let answer = ui.prompt(&prompt)?;
            tracing::debug!("Prompt '{}' answered", prompt.key);
            answers.push((prompt.key, answer.into_value()));
        }
    }

    let mut store = seeded;
    store.merge(answers);
    Ok(store)
}

/// Build the UI prompt for a prompt config.
pub fn build_prompt(config: &PromptConfig, resolver: &TemplateResolver) -> Result<Prompt> {
    let options = || -> Vec<PromptOption> {
        config
            .options
            .iter()
            .map(|choice| PromptOption {
                label: choice.label().to_string(),
                value: choice.value().to_string(),
            })
            .collect()
    };

    let prompt_type = match config.prompt_type.to_lowercase().as_str() {
        "input" | "text" => PromptType::Input,
        "password" => PromptType::Password,
        "confirm" => PromptType::Confirm,
        "select" | "list" => PromptType::Select { options: options() },
        "multiselect" | "checkbox" => PromptType::MultiSelect { options: options() },
        other => {
            return Err(KilnError::ConfigValidationError {
                message: format!("Prompt '{}' has unknown type '{}'", config.name, other),
            })
        }
    };

    let validation = config
        .validate
        .as_ref()
        .map(|v| {
            Regex::new(&v.regex)
                .map(|pattern| InputValidation {
                    pattern,
                    error: v
                        .error
                        .clone()
                        .unwrap_or_else(|| DEFAULT_VALIDATION_ERROR.to_string()),
                })
                .map_err(|e| KilnError::ConfigValidationError {
                    message: format!(
                        "Prompt '{}' has an invalid regex '{}': {}",
                        config.name, v.regex, e
                    ),
                })
        })
        .transpose()?;

    Ok(Prompt {
        key: config.name.clone(),
        question: resolver.resolve(&config.message),
        prompt_type,
        default: config.default.as_ref().map(|d| resolve_default(d, resolver)),
        validation,
    })
}

fn resolve_default(default: &Value, resolver: &TemplateResolver) -> String {
    match default {
        Value::String(s) => resolver.resolve(s),
        other => other.to_string(),
    }
}
