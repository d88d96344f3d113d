//! PyPI JSON API client
//!
//! `GET {base}/{name}/json` for the latest release and
//! `GET {base}/{name}/{version}/json` for a specific one. A version the index
//! never published (local builds, `+local` tags, conda rebuilds) falls back to
//! the project's latest release.

use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use tracing::{debug, trace};

use super::requirement::parse_requirements;
use crate::config::RegistrySettings;
use crate::features::registry::ports::{RegistryClient, RegistryError, RegistryRecord, RegistryResult};
use crate::shared::constants::registry::USER_AGENT;
use crate::shared::models::{ReqscanError, Result};

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    name: String,
    version: String,
    #[serde(default)]
    requires_dist: Option<Vec<String>>,
}

/// Blocking PyPI client
#[derive(Debug, Clone)]
pub struct PypiRegistry {
    client: Client,
    base_url: String,
}

impl PypiRegistry {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReqscanError::registry(format!("cannot build HTTP client: {}", e)).with_source(e))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &RegistrySettings) -> Result<Self> {
        Self::new(
            settings.url.clone(),
            Duration::from_millis(settings.timeout_ms),
        )
    }

    fn project_url(&self, name: &str, version: Option<&str>) -> String {
        match version {
            Some(version) => format!("{}/{}/{}/json", self.base_url, name, version),
            None => format!("{}/{}/json", self.base_url, name),
        }
    }

    fn fetch(&self, name: &str, version: Option<&str>) -> RegistryResult<RegistryRecord> {
        if !is_safe_segment(name) || !version.map(is_safe_segment).unwrap_or(true) {
            return Err(RegistryError::NotFound(name.to_string()));
        }

        let url = self.project_url(name, version);
        trace!(url = %url, "registry request");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| RegistryError::unavailable(name, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(name, status = status.as_u16(), "registry miss");
            return Err(RegistryError::NotFound(name.to_string()));
        }

        let project: ProjectResponse = response
            .json()
            .map_err(|e| RegistryError::unavailable(name, format!("invalid response: {}", e)))?;

        Ok(RegistryRecord {
            name: project.info.name,
            latest_version: project.info.version,
            dependencies: parse_requirements(&project.info.requires_dist.unwrap_or_default()),
        })
    }
}

impl RegistryClient for PypiRegistry {
    fn lookup(&self, name: &str) -> RegistryResult<RegistryRecord> {
        self.fetch(name, None)
    }

    fn lookup_release(&self, name: &str, version: &str) -> RegistryResult<RegistryRecord> {
        match self.fetch(name, Some(version)) {
            Err(RegistryError::NotFound(_)) => {
                debug!(name, version, "release not published, using latest");
                self.fetch(name, None)
            }
            answer => answer,
        }
    }
}

/// Names and versions are used as URL path segments verbatim
fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '!'))
}
