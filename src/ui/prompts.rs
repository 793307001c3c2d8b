//! Interactive prompts.

use console::{style, Term};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, MultiSelect, Password, Select};

use crate::error::{KilnError, Result};

use super::{InputValidation, Prompt, PromptOption, PromptResult, PromptType};

/// Convert dialoguer errors to KilnError.
fn map_dialoguer_err(e: dialoguer::Error) -> KilnError {
    KilnError::Io(e.into())
}

/// Dialoguer theme without the default yellow `?` prefix.
fn prompt_theme() -> ColorfulTheme {
    ColorfulTheme {
        prompt_prefix: style("".to_string()),
        ..ColorfulTheme::default()
    }
}

/// Prompt the user for input.
pub fn prompt_user(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    match &prompt.prompt_type {
        PromptType::Confirm => prompt_confirm(prompt, term),
        PromptType::Input => prompt_input(prompt, term),
        PromptType::Password => prompt_password(prompt, term),
        PromptType::Select { options } => prompt_select(prompt, options, term),
        PromptType::MultiSelect { options } => prompt_multiselect(prompt, options, term),
    }
}

/// Validator closure for dialoguer's `validate_with`.
fn validator(
    validation: Option<InputValidation>,
) -> impl Fn(&String) -> std::result::Result<(), String> {
    move |input: &String| match &validation {
        Some(v) => v.check(input),
        None => Ok(()),
    }
}

fn prompt_confirm(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let default = prompt
        .default
        .as_ref()
        .map(|s| s.to_lowercase() == "true" || s == "y" || s == "yes")
        .unwrap_or(false);

    let result = Confirm::new()
        .with_prompt(&prompt.question)
        .default(default)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::Bool(result))
}

fn prompt_input(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let input = Input::<String>::new()
        .with_prompt(&prompt.question)
        .validate_with(validator(prompt.validation.clone()));

    let result: String = if let Some(default) = &prompt.default {
        input
            .default(default.clone())
            .interact_on(term)
            .map_err(map_dialoguer_err)?
    } else {
        input.interact_on(term).map_err(map_dialoguer_err)?
    };

    Ok(PromptResult::String(result))
}

fn prompt_password(prompt: &Prompt, term: &Term) -> Result<PromptResult> {
    let result = Password::new()
        .with_prompt(&prompt.question)
        .allow_empty_password(prompt.default.is_some())
        .validate_with(validator(prompt.validation.clone()))
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    // An empty answer falls back to the default.
    match (&prompt.default, result.is_empty()) {
        (Some(default), true) => Ok(PromptResult::String(default.clone())),
        _ => Ok(PromptResult::String(result)),
    }
}

fn prompt_select(prompt: &Prompt, options: &[PromptOption], term: &Term) -> Result<PromptResult> {
    if options.is_empty() {
        return Err(KilnError::ConfigValidationError {
            message: format!("Prompt '{}' has no options to select from", prompt.key),
        });
    }

    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_idx = prompt
        .default
        .as_ref()
        .and_then(|d| options.iter().position(|o| o.value == *d))
        .unwrap_or(0);

    let selection = Select::new()
        .with_prompt(&prompt.question)
        .items(&labels)
        .default(default_idx)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    Ok(PromptResult::String(options[selection].value.clone()))
}

fn prompt_multiselect(
    prompt: &Prompt,
    options: &[PromptOption],
    term: &Term,
) -> Result<PromptResult> {
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();

    let default_values: Vec<&str> = prompt
        .default
        .as_deref()
        .map(|d| d.split(',').map(str::trim).collect())
        .unwrap_or_default();
    let defaults: Vec<bool> = options
        .iter()
        .map(|o| default_values.contains(&o.value.as_str()))
        .collect();

    let selections = MultiSelect::with_theme(&prompt_theme())
        .with_prompt(&prompt.question)
        .items(&labels)
        .defaults(&defaults)
        .interact_on(term)
        .map_err(map_dialoguer_err)?;

    let values: Vec<String> = selections
        .iter()
        .map(|&i| options[i].value.clone())
        .collect();

    Ok(PromptResult::Strings(values))
}
