//! Error types for kiln operations.
//!
//! This module defines [`KilnError`], the primary error type used throughout
//! the crate, [`ValidationFailure`] for post-step assertions, and a
//! [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `KilnError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `KilnError::Other`) for unexpected errors
//! - Every step-level error aborts the run, so messages must stand on their own

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kiln operations.
#[derive(Debug, Error)]
pub enum KilnError {
    /// Workflow document not found at the given location.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse the workflow document.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// Step `type` is not one of command, directory, file.
    #[error("Unsupported step type: {step_type}")]
    UnsupportedStep { step_type: String },

    /// File step `action` is not one of create, edit, delete, move.
    #[error("Unsupported file action: {action}")]
    UnsupportedAction { action: String },

    /// Shell command exited with a non-zero status.
    #[error("Command failed with exit code {}: {command}", display_code(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// Shell command could not be started.
    #[error("Failed to start command '{command}': {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source of a move does not exist.
    #[error("Cannot move {path}: source file does not exist")]
    MoveSourceMissing { path: PathBuf },

    /// A `find` pattern is not a valid regex.
    #[error("Invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Post-step validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),

    /// A step failed; wraps the underlying cause with the step title.
    #[error("Step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: Box<KilnError>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

/// A failed `validate` assertion.
///
/// "Does not contain" and "could not read" are separate variants so callers
/// can tell a wrong file from a missing or unreadable one.
#[derive(Debug, Error)]
pub enum ValidationFailure {
    /// `exists` test: the path is not accessible.
    #[error("Validation failed: {path} does not exist")]
    Missing { path: PathBuf },

    /// `contains` test: the file does not contain the expected text.
    #[error("Validation failed: {path} does not contain \"{text}\"")]
    DoesNotContain { path: PathBuf, text: String },

    /// `contains` test: the file could not be read.
    #[error("Validation failed: could not read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl KilnError {
    /// Wrap this error with the title of the step that produced it.
    pub fn in_step(self, step: &str) -> Self {
        KilnError::StepFailed {
            step: step.to_string(),
            source: Box::new(self),
        }
    }

    /// Build a filesystem error for `path`.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        KilnError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for kiln operations.
pub type Result<T> = std::result::Result<T, KilnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_not_found_displays_path() {
        let err = KilnError::ConfigNotFound {
            path: PathBuf::from("/foo/kiln.yml"),
        };
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("/foo/kiln.yml"));
    }

    #[test]
    fn config_parse_error_displays_path_and_message() {
        let err = KilnError::ConfigParseError {
            path: PathBuf::from("/config.yml"),
            message: "invalid syntax".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("/config.yml"));
        assert!(msg.contains("invalid syntax"));
    }

    #[test]
    fn unsupported_step_displays_type() {
        let err = KilnError::UnsupportedStep {
            step_type: "network".into(),
        };
        assert_eq!(err.to_string(), "Unsupported step type: network");
    }

    #[test]
    fn command_failed_displays_command_and_code() {
        let err = KilnError::CommandFailed {
            command: "npm install".into(),
            code: Some(2),
        };
        let msg = err.to_string();
        assert!(msg.contains("npm install"));
        assert!(msg.contains("exit code 2"));
    }

    #[test]
    fn command_failed_without_code_mentions_signal() {
        let err = KilnError::CommandFailed {
            command: "sleep 100".into(),
            code: None,
        };
        assert!(err.to_string().contains("signal"));
    }

    #[test]
    fn move_source_missing_names_source() {
        let err = KilnError::MoveSourceMissing {
            path: PathBuf::from("src/old.rs"),
        };
        assert!(err.to_string().contains("src/old.rs"));
    }

    #[test]
    fn validation_failures_are_distinguishable() {
        let missing: KilnError = ValidationFailure::DoesNotContain {
            path: PathBuf::from("a.txt"),
            text: "hello".into(),
        }
        .into();
        let unreadable: KilnError = ValidationFailure::Unreadable {
            path: PathBuf::from("a.txt"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        }
        .into();

        assert!(matches!(
            missing,
            KilnError::Validation(ValidationFailure::DoesNotContain { .. })
        ));
        assert!(matches!(
            unreadable,
            KilnError::Validation(ValidationFailure::Unreadable { .. })
        ));
        assert!(unreadable.to_string().contains("could not read"));
    }

    #[test]
    fn in_step_wraps_with_title() {
        let err = KilnError::UnsupportedAction {
            action: "chmod".into(),
        }
        .in_step("Fix permissions");
        let msg = err.to_string();
        assert!(msg.contains("Fix permissions"));
        assert!(msg.contains("chmod"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: KilnError = io_err.into();
        assert!(matches!(err, KilnError::Io(_)));
    }
}
