//! Registry port
//!
//! Remote package-index lookups. Implementations must be shareable across
//! the bounded lookup pool.

use serde::Serialize;
use thiserror::Error;

/// A declared (non-optional) dependency of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredDependency {
    pub name: String,
    /// Version specifier as published (`>=2.0,<3`), possibly empty
    pub constraint: String,
}

impl DeclaredDependency {
    pub fn new(name: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraint: constraint.into(),
        }
    }
}

/// Registry answer for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryRecord {
    /// Project name as published
    pub name: String,
    /// Latest version, or the requested version for release lookups
    pub latest_version: String,
    pub dependencies: Vec<DeclaredDependency>,
}

/// Lookup failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry answered, but not with this project
    #[error("'{0}' not found in registry")]
    NotFound(String),

    /// Transport failure (timeout, connection, malformed response)
    #[error("registry unavailable for '{name}': {reason}")]
    Unavailable { name: String, reason: String },
}

impl RegistryError {
    pub fn unavailable(name: &str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Remote package index
pub trait RegistryClient: Send + Sync {
    /// Latest release of a project
    fn lookup(&self, name: &str) -> RegistryResult<RegistryRecord>;

    /// A specific release; registries without per-release data answer with
    /// the latest one
    fn lookup_release(&self, name: &str, _version: &str) -> RegistryResult<RegistryRecord> {
        self.lookup(name)
    }
}
