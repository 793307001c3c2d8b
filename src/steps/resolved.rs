//! Resolved step ready for execution.
//!
//! A [`ResolvedStep`] is a [`StepConfig`] with its step type and file
//! action checked, required fields present and every template field
//! resolved against the variable store. Resolution happens when the step is
//! reached, so an unsupported type only fails the run at that point.

use std::path::{Path, PathBuf};

use crate::config::{FilePath, Interaction, StepConfig, ValidationConfig};
use crate::error::{KilnError, Result};
use crate::template::TemplateResolver;

/// A fully resolved step ready for execution.
#[derive(Debug, Clone)]
pub struct ResolvedStep {
    /// Display title.
    pub title: String,

    /// Description.
    pub description: Option<String>,

    /// What the step does.
    pub action: StepAction,

    /// Post-execution assertion.
    pub validation: Option<ResolvedValidation>,
}

/// The typed operation behind a step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Run a shell command.
    Command {
        command: String,
        cwd: PathBuf,
        interactive: bool,
        interactions: Vec<Interaction>,
    },

    /// Create directories recursively.
    Directory { paths: Vec<PathBuf> },

    /// Operate on a single file.
    File(FileAction),
}

/// A file step's action.
#[derive(Debug, Clone, PartialEq)]
pub enum FileAction {
    Create {
        path: PathBuf,
        content: String,
    },
    Edit {
        path: PathBuf,
        content: String,
        find_replace: Option<FindReplace>,
    },
    Delete {
        path: PathBuf,
    },
    Move {
        from: PathBuf,
        to: PathBuf,
    },
}

/// A regex substitution applied to a file's existing content.
#[derive(Debug, Clone, PartialEq)]
pub struct FindReplace {
    pub find: String,
    pub replace: String,
}

/// A resolved post-step assertion.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValidation {
    /// The path must exist.
    Exists { path: PathBuf },

    /// The file must contain `text`.
    Contains { path: PathBuf, text: String },

    /// A test kiln does not know; reported and treated as passing.
    Unknown { test: String },
}

impl ResolvedStep {
    /// Resolve a step config for execution.
    ///
    /// Relative paths are joined onto `root`.
    pub fn resolve(config: &StepConfig, resolver: &TemplateResolver, root: &Path) -> Result<Self> {
        let action = match config.step_type.as_str() {
            "command" => resolve_command(config, resolver, root)?,
            "directory" => StepAction::Directory {
                paths: config
                    .paths
                    .iter()
                    .map(|p| root.join(resolver.resolve(p)))
                    .collect(),
            },
            "file" => StepAction::File(resolve_file(config, resolver, root)?),
            other => {
                return Err(KilnError::UnsupportedStep {
                    step_type: other.to_string(),
                })
            }
        };

        let validation = config
            .validate
            .as_ref()
            .map(|v| resolve_validation(&config.title, v, resolver, root))
            .transpose()?;

        Ok(Self {
            title: resolver.resolve(&config.title),
            description: config.description.as_deref().map(|d| resolver.resolve(d)),
            action,
            validation,
        })
    }
}

fn missing_field(config: &StepConfig, field: &str) -> KilnError {
    KilnError::ConfigValidationError {
        message: format!(
            "{} step '{}' is missing required field '{}'",
            config.step_type, config.title, field
        ),
    }
}

fn resolve_command(
    config: &StepConfig,
    resolver: &TemplateResolver,
    root: &Path,
) -> Result<StepAction> {
    let command = config
        .cmd
        .as_deref()
        .ok_or_else(|| missing_field(config, "cmd"))?;

    let cwd = match &config.cwd {
        Some(cwd) => root.join(resolver.resolve(cwd)),
        None => root.to_path_buf(),
    };

    Ok(StepAction::Command {
        command: resolver.resolve(command),
        cwd,
        interactive: config.have_interaction,
        interactions: config.interactions.clone(),
    })
}

fn resolve_file(config: &StepConfig, resolver: &TemplateResolver, root: &Path) -> Result<FileAction> {
    let action = config
        .action
        .as_deref()
        .ok_or_else(|| missing_field(config, "action"))?;
    let path = config
        .path
        .as_ref()
        .ok_or_else(|| missing_field(config, "path"))?;
    let resolve_path = |p: &str| root.join(resolver.resolve(p));
    let content = || {
        config
            .content
            .as_deref()
            .map(|c| resolver.resolve(c))
            .unwrap_or_default()
    };

    let single = |action: &str| match path {
        FilePath::Single(p) => Ok(resolve_path(p)),
        FilePath::Move { .. } => Err(KilnError::ConfigValidationError {
            message: format!(
                "file step '{}' uses from/to paths with action '{}'",
                config.title, action
            ),
        }),
    };

    match action {
        "create" => Ok(FileAction::Create {
            path: single(action)?,
            content: content(),
        }),
        "edit" => {
            let find_replace = match (&config.find, &config.replace) {
                (Some(find), Some(replace)) => Some(FindReplace {
                    find: resolver.resolve(find),
                    replace: resolver.resolve(replace),
                }),
                _ => None,
            };
            Ok(FileAction::Edit {
                path: single(action)?,
                content: content(),
                find_replace,
            })
        }
        "delete" => Ok(FileAction::Delete {
            path: single(action)?,
        }),
        "move" => match path {
            FilePath::Move { from, to } => Ok(FileAction::Move {
                from: resolve_path(from),
                to: resolve_path(to),
            }),
            FilePath::Single(_) => Err(KilnError::ConfigValidationError {
                message: format!(
                    "file step '{}' with action 'move' needs path.from and path.to",
                    config.title
                ),
            }),
        },
        other => Err(KilnError::UnsupportedAction {
            action: other.to_string(),
        }),
    }
}

fn resolve_validation(
    title: &str,
    config: &ValidationConfig,
    resolver: &TemplateResolver,
    root: &Path,
) -> Result<ResolvedValidation> {
    let path = root.join(resolver.resolve(&config.path));
    match config.test.as_str() {
        "exists" => Ok(ResolvedValidation::Exists { path }),
        "contains" => {
            let text = config
                .text
                .as_deref()
                .ok_or_else(|| KilnError::ConfigValidationError {
                    message: format!(
                        "validation of step '{}' uses 'contains' without 'text'",
                        title
                    ),
                })?;
            Ok(ResolvedValidation::Contains {
                path,
                text: resolver.resolve(text),
            })
        }
        other => Ok(ResolvedValidation::Unknown {
            test: other.to_string(),
        }),
    }
}
