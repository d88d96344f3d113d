//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Missing version field in YAML
    #[error("Missing 'version' field in configuration file. Add 'version: 1' to the top of your YAML file.")]
    MissingVersion,

    /// Unsupported version
    #[error("Unsupported configuration version {found}. Supported versions: {}", supported.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", "))]
    UnsupportedVersion { found: u32, supported: Vec<u32> },

    /// Unknown resolution mode
    #[error("Unknown mode '{0}'. Valid modes: latest, compat")]
    UnknownMode(String),

    /// Unknown requirement pin style
    #[error("Unknown pin style '{0}'. Valid styles: exact, compat, gt, no-pin")]
    UnknownPinStyle(String),

    /// Malformed Python version
    #[error("Invalid Python version '{0}'. Expected MAJOR.MINOR, e.g. 3.12")]
    InvalidPythonVersion(String),

    /// Malformed `--lib` entry
    #[error("Invalid library request '{0}'. Expected NAME or NAME==VERSION")]
    InvalidLibraryRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_message() {
        let err = ConfigError::range_with_hint("max_depth", 50, 0, 10, "Use a smaller depth");
        let msg = err.to_string();
        assert!(msg.contains("max_depth"));
        assert!(msg.contains("50"));
        assert!(msg.contains("0..=10"));
        assert!(msg.contains("Use a smaller depth"));
    }

    #[test]
    fn test_unsupported_version_lists_supported() {
        let err = ConfigError::UnsupportedVersion {
            found: 3,
            supported: vec![1],
        };
        assert!(err.to_string().contains("Supported versions: 1"));
    }
}
