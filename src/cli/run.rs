//! Run command implementation.
//!
//! Loads a workflow document, collects its variables and runs its phases.

use std::path::{Path, PathBuf};

use crate::config::load_config_file;
use crate::error::Result;
use crate::runner::{RunOptions, WorkflowResult, WorkflowRunner};
use crate::ui::UserInterface;

/// The run command implementation.
pub struct RunCommand {
    config_path: PathBuf,
    root: PathBuf,
    dry_run: bool,
}

impl RunCommand {
    /// Create a run command for the document at `config_path`, executing in
    /// `root`.
    pub fn new(config_path: &Path, root: &Path, dry_run: bool) -> Self {
        Self {
            config_path: config_path.to_path_buf(),
            root: root.to_path_buf(),
            dry_run,
        }
    }

    /// Load, collect and run.
    ///
    /// Load and prompt errors surface before any step runs.
    pub fn execute(&self, ui: &mut dyn UserInterface) -> Result<WorkflowResult> {
        let config = load_config_file(&self.config_path)?;
        tracing::debug!(
            "Loaded {} with {} phase(s)",
            self.config_path.display(),
            config.workflow.phases.len()
        );

        let runner = WorkflowRunner::new(&config);
        let store = runner.collect(ui)?;

        if self.dry_run {
            ui.message("Dry run: no commands will be executed and no files changed");
        }

        let options = RunOptions {
            dry_run: self.dry_run,
            ..RunOptions::new(&self.root)
        };
        runner.run(&store, ui, &options)
    }
}
