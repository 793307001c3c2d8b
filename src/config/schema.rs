//! Configuration schema definitions for kiln.
//!
//! This module contains all the struct definitions that map to
//! the workflow document format (YAML or JSON).
//!
//! Step `type`, file `action` and validation `test` are kept as plain strings
//! here. They are checked when the step is reached, so an unknown value only
//! stops the run at that step.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::template::Value;

/// Root of a workflow document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct KilnConfig {
    /// Descriptive metadata
    pub meta: Meta,

    /// Initial variables and prompts
    pub config: VariablesConfig,

    /// Phases to execute
    pub workflow: WorkflowConfig,

    /// Completion settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_phases: Option<AfterPhases>,
}

/// Document metadata (display only).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The `config` section: seed variables and prompts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VariablesConfig {
    /// Initial variable values (`~` leaves a variable unset)
    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub variables: HashMap<String, Option<Value>>,

    /// Prompts asked before any phase runs, in order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub prompts: Vec<PromptConfig>,
}

/// Prompt configuration for interactive input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Prompt type: input, password, confirm, select/list, multiselect/checkbox
    #[serde(rename = "type", default = "default_prompt_type")]
    pub prompt_type: String,

    /// Variable name the answer is stored under
    pub name: String,

    /// Question to display
    pub message: String,

    /// Options for select/multiselect
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<PromptChoice>,

    /// Default value (strings are resolved against the seeded variables)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    /// Input validation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validate: Option<PromptValidation>,
}

fn default_prompt_type() -> String {
    "input".to_string()
}

/// One option of a select/multiselect prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PromptChoice {
    /// Label and value are the same string
    Plain(String),
    /// Separate display label and stored value
    Labeled { label: String, value: String },
}

impl PromptChoice {
    pub fn label(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Labeled { label, .. } => label,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Plain(s) => s,
            Self::Labeled { value, .. } => value,
        }
    }
}

/// Regex validation for a prompt answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptValidation {
    pub regex: String,

    /// Message shown when the answer does not match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The `workflow` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub phases: Vec<PhaseConfig>,
}

/// A named, ordered group of steps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Skip condition; the phase runs only if this evaluates true
    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    pub steps: Vec<StepConfig>,
}

/// Configuration for a single step.
///
/// Fields are the union of what the three step types use; the step type
/// decides which ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StepConfig {
    pub title: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    /// command, directory or file
    #[serde(rename = "type")]
    pub step_type: String,

    /// Shell command (command steps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cmd: Option<String>,

    /// Working directory for the command (command steps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,

    /// Pipe stdout/stdin so prompts can be answered (command steps)
    #[serde(skip_serializing_if = "is_false")]
    pub have_interaction: bool,

    /// Scripted answers (command steps with `haveInteraction`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interactions: Vec<Interaction>,

    /// Directories to create (directory steps)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,

    /// create, edit, delete or move (file steps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Target path (file steps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<FilePath>,

    /// File content template (create/edit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Regex to search the existing content for (edit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub find: Option<String>,

    /// Replacement for `find` matches (edit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<String>,

    /// Post-execution assertion
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validate: Option<ValidationConfig>,
}

fn is_false(v: &bool) -> bool {
    !v
}

/// A scripted answer to an interactive command's prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    /// Substring to look for in the command's output
    pub question: String,
    /// Line written to the command's stdin when `question` is seen
    pub answer: String,
}

/// `path` of a file step: a single path, or `from`/`to` for moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilePath {
    Single(String),
    Move { from: String, to: String },
}

/// Post-step assertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// exists or contains
    pub test: String,

    pub path: String,

    /// Expected substring (contains)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The `afterPhases` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AfterPhases {
    /// Completion message template
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl KilnConfig {
    /// Total number of steps across all phases.
    pub fn step_count(&self) -> usize {
        self.workflow.phases.iter().map(|p| p.steps.len()).sum()
    }

    /// The completion message template, if one is configured.
    pub fn completion_message(&self) -> Option<&str> {
        self.after_phases.as_ref()?.message.as_deref()
    }
}
