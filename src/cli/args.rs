//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::Parser;
use std::path::PathBuf;

use crate::ui::OutputMode;

/// kiln - Run declarative scaffolding workflows.
#[derive(Debug, Default, Parser)]
#[command(name = "kiln")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Workflow document (YAML, or JSON with a .json extension)
    pub config: PathBuf,

    /// Directory the workflow runs in (defaults to the current directory)
    #[arg(long, env = "KILN_CWD")]
    pub cwd: Option<PathBuf>,

    /// Describe each step without running it
    #[arg(long)]
    pub dry_run: bool,

    /// Answer prompts from KILN_PROMPT_* variables and defaults
    #[arg(long)]
    pub non_interactive: bool,

    /// Show verbose output
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Output mode selected by `--verbose` / `--quiet`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}
