//! Post-step validation.

use std::fs;

use crate::error::{Result, ValidationFailure};
use crate::ui::UserInterface;

use super::resolved::ResolvedValidation;

/// Check a step's assertion after it ran.
///
/// An unknown test is reported as a warning and passes.
pub fn run_validation(validation: &ResolvedValidation, ui: &mut dyn UserInterface) -> Result<()> {
    match validation {
        ResolvedValidation::Exists { path } => {
            if !path.exists() {
                return Err(ValidationFailure::Missing { path: path.clone() }.into());
            }
        }
        ResolvedValidation::Contains { path, text } => {
            let content = fs::read_to_string(path).map_err(|source| ValidationFailure::Unreadable {
                path: path.clone(),
                source,
            })?;
            if !content.contains(text.as_str()) {
                return Err(ValidationFailure::DoesNotContain {
                    path: path.clone(),
                    text: text.clone(),
                }
                .into());
            }
        }
        ResolvedValidation::Unknown { test } => {
            ui.warning(&format!("Unknown validation test '{}', skipping", test));
        }
    }
    Ok(())
}
