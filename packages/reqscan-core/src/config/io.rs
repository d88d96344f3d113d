//! Configuration I/O (YAML loading)
//!
//! Defines the YAML schema types. Applying them to a config happens in
//! reqscan_config.rs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::shared::constants::registry::{
    DEFAULT_INDEX_URL, DEFAULT_MAX_IN_FLIGHT, DEFAULT_TIMEOUT_MS,
};

/// YAML Schema v1
///
/// Every field except `version` is optional; missing fields keep defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFileV1 {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,

    /// Import name → distribution name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<BTreeMap<String, String>>,

    /// Distribution name → pinned version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pins: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_packages: Option<Vec<PathBuf>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_conda: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_notebooks: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdlib_file: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registry: Option<RegistrySettings>,
}

/// Remote registry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct RegistrySettings {
    /// Disable remote lookups entirely
    pub enabled: bool,
    /// JSON API base URL (`{url}/{name}/json`)
    pub url: String,
    pub timeout_ms: u64,
    pub max_in_flight: usize,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            enabled: true,
            url: DEFAULT_INDEX_URL.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}
