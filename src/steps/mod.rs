//! Step resolution and execution.
//!
//! - [`ResolvedStep`] - a step config checked and resolved against the
//!   variable store
//! - [`execute_step`] - run a resolved step and its validation
//! - [`describe`] - what a step would do, for dry runs
//!
//! # Example
//!
//! ```no_run
//! use kiln::config::StepConfig;
//! use kiln::shell::OperatorInput;
//! use kiln::steps::{execute_step, ExecutionOptions, ResolvedStep};
//! use kiln::template::{TemplateResolver, VariableStore};
//! use kiln::ui::MockUI;
//! use std::path::Path;
//!
//! let config: StepConfig = serde_yaml::from_str(
//!     "title: Source\ntype: directory\npaths: ['{{project_name}}/src']",
//! ).unwrap();
//!
//! let mut store = VariableStore::new();
//! store.insert("project_name", "demo");
//! let resolver = TemplateResolver::new(&store);
//!
//! let step = ResolvedStep::resolve(&config, &resolver, Path::new(".")).unwrap();
//! let mut ui = MockUI::new();
//! execute_step(&step, &OperatorInput::none(), &mut ui, &ExecutionOptions::default()).unwrap();
//! ```

pub mod command;
pub mod directory;
pub mod executor;
pub mod file;
pub mod resolved;
pub mod validate;

pub use executor::{describe, execute_step, ExecutionOptions, StepResult};
pub use file::{ConflictChoice, FILE_CONFLICT_PROMPT};
pub use resolved::{FileAction, FindReplace, ResolvedStep, ResolvedValidation, StepAction};
