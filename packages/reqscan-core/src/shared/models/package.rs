//! Package model shared by the inventory, resolver and transitive stages

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Version recorded when no version could be determined
pub const UNKNOWN_VERSION: &str = "unknown";

static SEPARATOR_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-_.]+").unwrap());

/// Normalize a distribution name (PEP 503)
///
/// Lowercase, runs of `-`, `_` and `.` collapse to a single `-`.
pub fn normalize_name(name: &str) -> String {
    SEPARATOR_RUN
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Where a package record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageOrigin {
    /// Curated import-name override table
    Override,
    /// Primary site-packages inventory
    Local,
    /// Managed (conda) environment
    Conda,
    /// Remote registry
    Remote,
}

impl PackageOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageOrigin::Override => "override",
            PackageOrigin::Local => "local",
            PackageOrigin::Conda => "conda",
            PackageOrigin::Remote => "remote",
        }
    }
}

/// An installable distribution
///
/// Identity is the normalized distribution name; `distribution_name` keeps
/// the spelling used by the source it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    /// Import name this package was resolved from, if any
    pub import_name: Option<String>,
    pub distribution_name: String,
    pub version: String,
    /// Top-level import names installed by this distribution
    pub exports: BTreeSet<String>,
    pub origin: PackageOrigin,
}

impl Package {
    pub fn new(distribution_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            import_name: None,
            distribution_name: distribution_name.into(),
            version: version.into(),
            exports: BTreeSet::new(),
            origin: PackageOrigin::Remote,
        }
    }

    pub fn with_origin(mut self, origin: PackageOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_import_name(mut self, import_name: impl Into<String>) -> Self {
        self.import_name = Some(import_name.into());
        self
    }

    pub fn with_exports<I, S>(mut self, exports: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exports.extend(exports.into_iter().map(Into::into));
        self
    }

    /// Identity key
    pub fn key(&self) -> String {
        normalize_name(&self.distribution_name)
    }

    pub fn exports_name(&self, import_name: &str) -> bool {
        self.exports.contains(import_name)
    }

    pub fn has_known_version(&self) -> bool {
        !self.version.is_empty() && self.version != UNKNOWN_VERSION
    }

    /// Same package with the distribution name replaced by its normalized form
    pub fn normalized(mut self) -> Self {
        self.distribution_name = normalize_name(&self.distribution_name);
        self
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=={}", self.distribution_name, self.version)
    }
}
