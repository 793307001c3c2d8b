//! Directory steps.

use std::fs;
use std::path::PathBuf;

use crate::error::{KilnError, Result};
use crate::ui::UserInterface;

/// Create each directory, including missing parents.
///
/// A directory that already exists is reported and left alone. A path that
/// exists as anything else is a [`KilnError::Filesystem`] error.
pub fn create_directories(paths: &[PathBuf], ui: &mut dyn UserInterface) -> Result<()> {
    for path in paths {
        if path.is_dir() {
            ui.note(&format!("Directory {} already exists", path.display()));
            continue;
        }
        fs::create_dir_all(path).map_err(|e| KilnError::filesystem(path, e))?;
        tracing::debug!("Created directory {}", path.display());
    }
    Ok(())
}
