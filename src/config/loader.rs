//! Workflow document loading.
//!
//! Documents are YAML unless the file has a `.json` extension. Both failure
//! modes (missing file, malformed document) surface before any step runs.

use crate::config::schema::KilnConfig;
use crate::error::{KilnError, Result};
use std::fs;
use std::path::Path;

/// Document syntax, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Detect the format of `path`. Anything that is not `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Load a workflow document and parse it into [`KilnConfig`].
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the document is invalid.
pub fn load_config_file(path: &Path) -> Result<KilnConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KilnError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            KilnError::Io(e)
        }
    })?;

    parse_config(&content, DocumentFormat::from_path(path), path)
}

/// Parse document content into [`KilnConfig`].
///
/// # Arguments
///
/// * `content` - The document text
/// * `format` - YAML or JSON
/// * `source_path` - Path for error reporting
pub fn parse_config(content: &str, format: DocumentFormat, source_path: &Path) -> Result<KilnConfig> {
    let parse_error = |message: String| KilnError::ConfigParseError {
        path: source_path.to_path_buf(),
        message,
    };

    match format {
        // An empty YAML file is an empty document, not an error.
        DocumentFormat::Yaml if content.trim().is_empty() => Ok(KilnConfig::default()),
        DocumentFormat::Yaml => {
            serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))
        }
        DocumentFormat::Json => {
            serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn format_detected_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("kiln.json")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("kiln.JSON")),
            DocumentFormat::Json
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("kiln.yml")),
            DocumentFormat::Yaml
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("Kilnfile")),
            DocumentFormat::Yaml
        );
    }

    #[test]
    fn load_config_file_parses_valid_yaml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.yml");
        fs::write(&path, "meta:\n  name: TestApp\n").unwrap();

        let config = load_config_file(&path).unwrap();
        assert_eq!(config.meta.name, Some("TestApp".to_string()));
    }

    #[test]
    fn load_config_file_parses_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.json");
        fs::write(
            &path,
            r#"{"config": {"variables": {"project_name": "demo"}}, "workflow": {"phases": []}}"#,
        )
        .unwrap();

        let config = load_config_file(&path).unwrap();
        assert!(config.config.variables.contains_key("project_name"));
    }

    #[test]
    fn load_config_file_returns_not_found_error() {
        let result = load_config_file(Path::new("/nonexistent/kiln.yml"));
        assert!(matches!(result, Err(KilnError::ConfigNotFound { .. })));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_yaml() {
        let result = parse_config(
            "invalid: yaml: content: [",
            DocumentFormat::Yaml,
            Path::new("test.yml"),
        );
        assert!(matches!(result, Err(KilnError::ConfigParseError { .. })));
    }

    #[test]
    fn parse_config_returns_parse_error_for_invalid_json() {
        let result = parse_config("{not json", DocumentFormat::Json, Path::new("test.json"));
        assert!(matches!(result, Err(KilnError::ConfigParseError { .. })));
    }

    #[test]
    fn parse_config_rejects_wrong_shape() {
        let result = parse_config(
            "workflow:\n  phases: 42\n",
            DocumentFormat::Yaml,
            Path::new("test.yml"),
        );
        assert!(matches!(result, Err(KilnError::ConfigParseError { .. })));
    }

    #[test]
    fn load_config_file_handles_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("kiln.yml");
        fs::write(&path, "").unwrap();

        let config = load_config_file(&path).unwrap();
        assert!(config.meta.name.is_none());
        assert!(config.workflow.phases.is_empty());
    }
}
