//! Non-fatal diagnostics
//!
//! Every dropped file or name produces one of these. They travel next to the
//! successful results of each stage and are merged by the scan pipeline.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Diagnostic category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// File could not be read (permissions, encoding)
    UnreadableSource,
    /// File could not be parsed
    UnparsableSource,
    /// `importlib.import_module(expr)` / `__import__(expr)` with a non-constant name
    UnresolvableDynamicImport,
    /// Several installed distributions export the same import name
    AmbiguousPackageMapping,
    /// Import name not resolvable to any distribution
    UnknownPackage,
    /// Registry lookup failed for a transport reason
    RegistryUnavailable,
    /// Explicitly requested library resolves to nothing
    InvalidLibraryOverride,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnreadableSource => "unreadable",
            DiagnosticKind::UnparsableSource => "unparsable",
            DiagnosticKind::UnresolvableDynamicImport => "unresolvable-dynamic-import",
            DiagnosticKind::AmbiguousPackageMapping => "ambiguous-package-mapping",
            DiagnosticKind::UnknownPackage => "unknown-package",
            DiagnosticKind::RegistryUnavailable => "registry-unavailable",
            DiagnosticKind::InvalidLibraryOverride => "invalid-library-override",
        }
    }
}

/// A single non-fatal finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// What the diagnostic is about (file path, import name, distribution name)
    pub subject: String,
    pub message: String,
    pub file: Option<PathBuf>,
    pub line: Option<u32>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            subject: subject.into(),
            message: message.into(),
            file: None,
            line: None,
        }
    }

    pub fn at(mut self, file: &Path, line: u32) -> Self {
        self.file = Some(file.to_path_buf());
        self.line = Some(line);
        self
    }

    pub fn in_file(mut self, file: &Path) -> Self {
        self.file = Some(file.to_path_buf());
        self
    }

    pub fn unreadable(file: &Path, reason: impl Into<String>) -> Self {
        Self::new(
            DiagnosticKind::UnreadableSource,
            file.display().to_string(),
            reason,
        )
        .in_file(file)
    }

    pub fn unparsable(file: &Path, reason: impl Into<String>) -> Self {
        Self::new(
            DiagnosticKind::UnparsableSource,
            file.display().to_string(),
            reason,
        )
        .in_file(file)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.kind.as_str(), self.subject, self.message)?;
        if let Some(ref file) = self.file {
            write!(f, " ({}", file.display())?;
            if let Some(line) = self.line {
                write!(f, ":{}", line)?;
            }
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// Count diagnostics of one kind
pub fn count_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diagnostics.iter().filter(|d| d.kind == kind).count()
}
