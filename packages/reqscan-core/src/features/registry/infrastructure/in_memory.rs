//! In-memory registry

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::requirement::parse_requirements;
use crate::features::registry::ports::{RegistryClient, RegistryError, RegistryRecord, RegistryResult};
use crate::shared::models::normalize_name;

/// Registry backed by a map, keyed by normalized name
///
/// Counts lookups so callers can assert on memoization.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    projects: HashMap<String, RegistryRecord>,
    releases: HashMap<(String, String), RegistryRecord>,
    unavailable: HashSet<String>,
    lookups: AtomicUsize,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a project; `requires` uses `requires_dist` syntax
    pub fn with_project(mut self, name: &str, version: &str, requires: &[&str]) -> Self {
        self.projects.insert(normalize_name(name), record(name, version, requires));
        self
    }

    /// Add a specific release, served by `lookup_release`
    pub fn with_release(mut self, name: &str, version: &str, requires: &[&str]) -> Self {
        self.releases.insert(
            (normalize_name(name), version.to_string()),
            record(name, version, requires),
        );
        self
    }

    /// Make lookups of `name` fail as if the network were down
    pub fn with_unavailable(mut self, name: &str) -> Self {
        self.unavailable.insert(normalize_name(name));
        self
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

fn record(name: &str, version: &str, requires: &[&str]) -> RegistryRecord {
    RegistryRecord {
        name: name.to_string(),
        latest_version: version.to_string(),
        dependencies: parse_requirements(requires),
    }
}

impl RegistryClient for InMemoryRegistry {
    fn lookup(&self, name: &str) -> RegistryResult<RegistryRecord> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let key = normalize_name(name);
        if self.unavailable.contains(&key) {
            return Err(RegistryError::unavailable(name, "connection refused"));
        }
        self.projects
            .get(&key)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(name.to_string()))
    }

    fn lookup_release(&self, name: &str, version: &str) -> RegistryResult<RegistryRecord> {
        let key = (normalize_name(name), version.to_string());
        match self.releases.get(&key) {
            Some(release) => {
                self.lookups.fetch_add(1, Ordering::SeqCst);
                Ok(release.clone())
            }
            None => self.lookup(name),
        }
    }
}
