//! Site-packages inventory
//!
//! Reads `*.dist-info` and `*.egg-info` entries of one or more site-packages
//! directories. The scanned project is never imported or executed; the only
//! process spawned is `python3` asking for its own site directories.

use std::collections::{BTreeSet, HashSet};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, warn};
use walkdir::WalkDir;

use super::manifest::{
    exports_from_installed_files, exports_from_record, exports_from_top_level, parse_metadata,
    split_dist_dir_name,
};
use crate::features::inventory::ports::PackageInventory;
use crate::shared::models::{Package, PackageOrigin, Result};

const SITE_QUERY: &str =
    "import json, site; print(json.dumps(site.getsitepackages() + [site.getusersitepackages()]))";

/// Installed distributions of a Python environment
#[derive(Debug, Clone, Default)]
pub struct SitePackagesInventory {
    paths: Vec<PathBuf>,
}

impl SitePackagesInventory {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    /// Locate site-packages: `$VIRTUAL_ENV` first, else ask `python3`
    pub fn discover() -> Self {
        if let Some(venv) = env::var_os("VIRTUAL_ENV") {
            let paths = venv_site_packages(Path::new(&venv));
            if !paths.is_empty() {
                debug!(venv = ?venv, paths = ?paths, "using virtualenv site-packages");
                return Self::new(paths);
            }
        }

        match query_interpreter() {
            Some(paths) => {
                debug!(paths = ?paths, "using interpreter site-packages");
                Self::new(paths)
            }
            None => {
                warn!("no Python environment found; local inventory is empty");
                Self::default()
            }
        }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl PackageInventory for SitePackagesInventory {
    fn list_installed(&self) -> Result<Vec<Package>> {
        let mut seen = HashSet::new();
        let mut packages = Vec::new();

        for dir in self.paths.iter().filter(|p| p.is_dir()) {
            let entries = WalkDir::new(dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok());

            for entry in entries {
                let Some(package) = read_distribution(entry.path()) else {
                    continue;
                };
                if seen.insert(package.key()) {
                    packages.push(package);
                }
            }
        }

        debug!(count = packages.len(), "site-packages inventory");
        Ok(packages)
    }

    fn name(&self) -> &'static str {
        "site-packages"
    }
}

/// Read one `.dist-info` / `.egg-info` entry (directory, or legacy egg-info file)
fn read_distribution(path: &Path) -> Option<Package> {
    let file_name = path.file_name()?.to_str()?;
    let (dir_name, dir_version) = split_dist_dir_name(file_name)?;
    let is_dist_info = file_name.ends_with(".dist-info");

    let metadata = if path.is_dir() {
        let metadata_file = if is_dist_info { "METADATA" } else { "PKG-INFO" };
        fs::read_to_string(path.join(metadata_file)).ok()
    } else {
        fs::read_to_string(path).ok()
    };
    let (name, version) = metadata.as_deref().map(parse_metadata).unwrap_or((None, None));

    let name = name.unwrap_or(dir_name);
    let version = version.or(dir_version)?;

    let exports = if path.is_dir() {
        read_exports(path, is_dist_info)
    } else {
        Default::default()
    };
    if exports.is_empty() {
        debug!(distribution = %name, "no exported names in manifest");
    }

    Some(
        Package::new(name, version)
            .with_origin(PackageOrigin::Local)
            .with_exports(exports),
    )
}

/// `top_level.txt`, else `RECORD` / `installed-files.txt`
fn read_exports(dir: &Path, is_dist_info: bool) -> BTreeSet<String> {
    if let Ok(text) = fs::read_to_string(dir.join("top_level.txt")) {
        let exports = exports_from_top_level(&text);
        if !exports.is_empty() {
            return exports;
        }
    }
    let (manifest, parse): (&str, fn(&str) -> BTreeSet<String>) = if is_dist_info {
        ("RECORD", exports_from_record)
    } else {
        ("installed-files.txt", exports_from_installed_files)
    };
    fs::read_to_string(dir.join(manifest))
        .map(|text| parse(&text))
        .unwrap_or_default()
}

fn venv_site_packages(venv: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();

    let windows = venv.join("Lib").join("site-packages");
    if windows.is_dir() {
        paths.push(windows);
    }

    let lib = venv.join("lib");
    let pythons = WalkDir::new(&lib)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with("python"));
    for entry in pythons {
        let site = entry.path().join("site-packages");
        if site.is_dir() {
            paths.push(site);
        }
    }
    paths
}

fn query_interpreter() -> Option<Vec<PathBuf>> {
    let output = Command::new("python3").args(["-c", SITE_QUERY]).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let paths: Vec<String> = serde_json::from_slice(&output.stdout).ok()?;
    Some(paths.into_iter().map(PathBuf::from).collect())
}
