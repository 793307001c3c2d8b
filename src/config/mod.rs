//! Workflow document schema and loading.
//!
//! - Schema definitions in [`schema`]
//! - File loading in [`loader`]
//!
//! # Example
//!
//! ```
//! use kiln::config::{parse_config, DocumentFormat};
//! use std::path::Path;
//!
//! let yaml = r#"
//! config:
//!   variables:
//!     project_name: demo
//! workflow:
//!   phases:
//!     - title: Layout
//!       steps:
//!         - title: Create source dir
//!           type: directory
//!           paths: ["{{project_name}}/src"]
//! "#;
//!
//! let config = parse_config(yaml, DocumentFormat::Yaml, Path::new("kiln.yml")).unwrap();
//! assert_eq!(config.step_count(), 1);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config_file, parse_config, DocumentFormat};
pub use schema::{
    AfterPhases, FilePath, Interaction, KilnConfig, Meta, PhaseConfig, PromptChoice, PromptConfig,
    PromptValidation, StepConfig, ValidationConfig, VariablesConfig, WorkflowConfig,
};
