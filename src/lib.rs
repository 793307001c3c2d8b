//! kiln - Declarative, interactive scaffolding workflows.
//!
//! A workflow document lists phases of steps. kiln asks the document's
//! prompts, then runs each step in order: shell commands (optionally
//! answering their questions), directory creation and file
//! create/edit/delete/move, each with an optional validation.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Workflow document schema and loading
//! - [`error`] - Error types and result aliases
//! - [`runner`] - Prompt collection and the phase/step loop
//! - [`shell`] - Shell command execution, including interactive commands
//! - [`steps`] - Step resolution, execution and validation
//! - [`template`] - Variable store, `{{var}}` templates and conditions
//! - [`ui`] - Prompts and terminal output
//!
//! # Example
//!
//! ```
//! use kiln::config::{parse_config, DocumentFormat};
//! use kiln::runner::{RunOptions, WorkflowRunner};
//! use kiln::ui::MockUI;
//! use std::path::Path;
//!
//! let yaml = r#"
//! config:
//!   variables:
//!     project_name: demo
//! afterPhases:
//!   message: "Created {{project_name}}"
//! "#;
//! let config = parse_config(yaml, DocumentFormat::Yaml, Path::new("kiln.yml")).unwrap();
//!
//! let mut ui = MockUI::new();
//! let runner = WorkflowRunner::new(&config);
//! let store = runner.collect(&mut ui).unwrap();
//! let result = runner.run(&store, &mut ui, &RunOptions::new(".")).unwrap();
//! assert_eq!(result.completion_message, "Created demo");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod runner;
pub mod shell;
pub mod steps;
pub mod template;
pub mod ui;

pub use error::{KilnError, Result};
