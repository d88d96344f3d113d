//! Resolution context
//!
//! Everything a run needs, passed by value into each stage. Nothing here is
//! global; two contexts can drive two independent scans in one process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use super::error::{ConfigError, ConfigResult};
use crate::features::stdlib_filter::PythonVersion;
use crate::shared::models::normalize_name;

/// Version acceptance policy for registry hits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionMode {
    /// Accept the registry's latest version
    #[default]
    Latest,
    /// Accept registry hits only when the context pins a version
    Compat,
}

impl ResolutionMode {
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "compat" => Ok(Self::Compat),
            _ => Err(ConfigError::UnknownMode(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Compat => "compat",
        }
    }
}

impl fmt::Display for ResolutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An explicitly requested library (`--lib name` or `--lib name==1.0`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRequest {
    pub name: String,
    pub version: Option<String>,
}

impl LibraryRequest {
    pub fn parse(entry: &str) -> ConfigResult<Self> {
        let entry = entry.trim();
        let (name, version) = match entry.split_once("==") {
            Some((name, version)) => (name.trim(), Some(version.trim().to_string())),
            None => (entry, None),
        };

        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid_name || version.as_deref() == Some("") {
            return Err(ConfigError::InvalidLibraryRequest(entry.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            version,
        })
    }

    /// Parse a comma-separated list (`a,b==1.0, c`)
    pub fn parse_list(list: &str) -> ConfigResult<Vec<Self>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// Inputs shared by every stage of one run
#[derive(Debug, Clone)]
pub struct ResolutionContext {
    pub root: PathBuf,
    /// Directory/file names or root-relative paths to skip
    pub exclusions: Vec<String>,
    pub max_depth: usize,
    pub mode: ResolutionMode,
    /// Explicitly requested libraries, added on top of the scan result
    pub libraries: Vec<LibraryRequest>,
    /// Pinned versions, keyed by normalized distribution name
    pub pins: BTreeMap<String, String>,
    pub python_version: PythonVersion,
    pub scan_notebooks: bool,
}

impl ResolutionContext {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclusions: Vec::new(),
            max_depth: 0,
            mode: ResolutionMode::Latest,
            libraries: Vec::new(),
            pins: BTreeMap::new(),
            python_version: PythonVersion::default(),
            scan_notebooks: false,
        }
    }

    pub fn with_mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_exclusions(mut self, exclusions: Vec<String>) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_pin(mut self, name: &str, version: impl Into<String>) -> Self {
        self.pins.insert(normalize_name(name), version.into());
        self
    }

    pub fn with_library(mut self, request: LibraryRequest) -> Self {
        if let Some(ref version) = request.version {
            self.pins.insert(normalize_name(&request.name), version.clone());
        }
        self.libraries.push(request);
        self
    }

    /// Pinned version for a distribution name, any spelling
    pub fn pinned_version(&self, name: &str) -> Option<&str> {
        self.pins.get(&normalize_name(name)).map(String::as_str)
    }
}
