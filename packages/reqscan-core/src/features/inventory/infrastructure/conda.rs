//! Conda (managed environment) inventory
//!
//! Each installed conda package leaves `$CONDA_PREFIX/conda-meta/<name>-<version>-<build>.json`
//! with its name, version and the files it installed relative to the prefix.

use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::manifest::exports_from_paths;
use crate::features::inventory::ports::PackageInventory;
use crate::shared::models::{Package, PackageOrigin, Result};

const SITE_PACKAGES_MARKER: &str = "site-packages/";

#[derive(Debug, Deserialize)]
struct CondaMeta {
    name: String,
    version: String,
    #[serde(default)]
    files: Vec<String>,
}

/// Packages managed by a conda environment
#[derive(Debug, Clone)]
pub struct CondaInventory {
    prefix: PathBuf,
}

impl CondaInventory {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Inventory of the active environment, if any (`$CONDA_PREFIX`)
    pub fn from_env() -> Option<Self> {
        let prefix = env::var_os("CONDA_PREFIX")?;
        let inventory = Self::new(prefix);
        inventory.meta_dir().is_dir().then_some(inventory)
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    fn meta_dir(&self) -> PathBuf {
        self.prefix.join("conda-meta")
    }

    /// Every package recorded in `conda-meta`, sorted by file name
    ///
    /// Unreadable or malformed records are skipped.
    pub fn list_managed_packages(&self) -> Result<Vec<Package>> {
        let meta_dir = self.meta_dir();
        if !meta_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        let records = WalkDir::new(&meta_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "json").unwrap_or(false));

        for entry in records {
            let meta = match read_meta(entry.path()) {
                Ok(meta) => meta,
                Err(reason) => {
                    warn!(path = %entry.path().display(), reason = %reason, "skipping conda record");
                    continue;
                }
            };

            let site_files = meta.files.iter().filter_map(|f| site_relative(f));
            let package = Package::new(meta.name, meta.version)
                .with_origin(PackageOrigin::Conda)
                .with_exports(exports_from_paths(site_files));

            if seen.insert(package.key()) {
                packages.push(package);
            }
        }

        debug!(count = packages.len(), prefix = %self.prefix.display(), "conda inventory");
        Ok(packages)
    }
}

impl PackageInventory for CondaInventory {
    fn list_installed(&self) -> Result<Vec<Package>> {
        self.list_managed_packages()
    }

    fn name(&self) -> &'static str {
        "conda"
    }
}

fn read_meta(path: &Path) -> std::result::Result<CondaMeta, String> {
    let text = fs::read_to_string(path).map_err(|e| e.to_string())?;
    serde_json::from_str(&text).map_err(|e| e.to_string())
}

/// Path below `site-packages/`, for files installed there
fn site_relative(file: &str) -> Option<&str> {
    let index = file.find(SITE_PACKAGES_MARKER)?;
    Some(&file[index + SITE_PACKAGES_MARKER.len()..])
}
