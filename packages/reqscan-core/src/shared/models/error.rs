//! Error types for the reqscan-core crate
//!
//! Fatal errors only. Per-item failures (a bad file, an unknown package) are
//! reported as [`Diagnostic`](super::Diagnostic)s next to the results instead.
//!
//! Features:
//! - Categorized error kinds matching the scan stages
//! - Optional file path and line context
//! - Source error chaining

use std::fmt;

/// Error kind categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Scan root does not exist
    RootNotFound,
    /// Scan root contains no Python sources
    NoSourceFiles,
    /// Parser setup errors
    Parse,
    /// Configuration errors
    Config,
    /// Local inventory errors
    Inventory,
    /// Registry client setup errors
    Registry,
    /// IO errors
    IO,
    /// Internal errors (bugs)
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::RootNotFound => "root_not_found",
            ErrorKind::NoSourceFiles => "no_source_files",
            ErrorKind::Parse => "parse",
            ErrorKind::Config => "config",
            ErrorKind::Inventory => "inventory",
            ErrorKind::Registry => "registry",
            ErrorKind::IO => "io",
            ErrorKind::Internal => "internal",
        }
    }
}

/// Unified error type
#[derive(Debug)]
pub struct ReqscanError {
    pub kind: ErrorKind,
    pub message: String,
    pub file_path: Option<String>,
    pub line: Option<u32>,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl ReqscanError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            file_path: None,
            line: None,
            source: None,
        }
    }

    pub fn with_file(mut self, file_path: impl Into<String>) -> Self {
        self.file_path = Some(file_path.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors
    pub fn root_not_found(root: impl Into<String>) -> Self {
        let root = root.into();
        Self::new(ErrorKind::RootNotFound, "scan root does not exist").with_file(root)
    }

    pub fn no_source_files(root: impl Into<String>) -> Self {
        let root = root.into();
        Self::new(ErrorKind::NoSourceFiles, "no Python source files found").with_file(root)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Parse, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, message)
    }

    pub fn inventory(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Inventory, message)
    }

    pub fn registry(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Registry, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IO, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }
}

impl fmt::Display for ReqscanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)?;
        if let Some(ref file) = self.file_path {
            write!(f, " in {}", file)?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ReqscanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ReqscanError>;

impl From<std::io::Error> for ReqscanError {
    fn from(err: std::io::Error) -> Self {
        ReqscanError::io(format!("IO error: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for ReqscanError {
    fn from(err: serde_json::Error) -> Self {
        ReqscanError::inventory(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<crate::config::ConfigError> for ReqscanError {
    fn from(err: crate::config::ConfigError) -> Self {
        ReqscanError::config(err.to_string()).with_source(err)
    }
}

impl From<rayon::ThreadPoolBuildError> for ReqscanError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        ReqscanError::internal(format!("Thread pool error: {}", err)).with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ReqscanError::parse("unexpected token")
            .with_file("test.py")
            .with_line(42);

        let msg = format!("{}", err);
        assert!(msg.contains("parse"));
        assert!(msg.contains("unexpected token"));
        assert!(msg.contains("test.py"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn test_root_not_found_carries_path() {
        let err = ReqscanError::root_not_found("/nope");
        assert_eq!(err.kind, ErrorKind::RootNotFound);
        assert_eq!(err.file_path.as_deref(), Some("/nope"));
    }
}
