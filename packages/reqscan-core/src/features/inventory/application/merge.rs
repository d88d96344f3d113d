//! Inventory merging

use std::collections::HashMap;
use tracing::debug;

use crate::features::inventory::ports::PackageInventory;
use crate::shared::models::{Package, Result};

/// Merge by normalized distribution name; `local` wins on conflict
///
/// Order: every local package in its order, then managed-only packages in
/// theirs. A managed package that loses keeps contributing its exports when
/// the local record has none.
pub fn merge_inventories(local: Vec<Package>, managed: Vec<Package>) -> Vec<Package> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<Package> = Vec::with_capacity(local.len() + managed.len());

    for package in local.into_iter().chain(managed) {
        match index.get(&package.key()) {
            Some(&existing) => {
                let winner = &mut merged[existing];
                if winner.exports.is_empty() {
                    winner.exports = package.exports;
                }
            }
            None => {
                index.insert(package.key(), merged.len());
                merged.push(package);
            }
        }
    }
    merged
}

/// Primary inventory plus an optional managed one, merged on listing
pub struct CompositeInventory {
    primary: Box<dyn PackageInventory>,
    managed: Option<Box<dyn PackageInventory>>,
}

impl CompositeInventory {
    pub fn new(primary: Box<dyn PackageInventory>) -> Self {
        Self {
            primary,
            managed: None,
        }
    }

    pub fn with_managed(mut self, managed: Box<dyn PackageInventory>) -> Self {
        self.managed = Some(managed);
        self
    }
}

impl PackageInventory for CompositeInventory {
    fn list_installed(&self) -> Result<Vec<Package>> {
        let local = self.primary.list_installed()?;
        let managed = match self.managed {
            Some(ref managed) => managed.list_installed()?,
            None => Vec::new(),
        };
        debug!(
            primary = self.primary.name(),
            local = local.len(),
            managed = managed.len(),
            "merging inventories"
        );
        Ok(merge_inventories(local, managed))
    }

    fn name(&self) -> &'static str {
        "composite"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inventory::infrastructure::FixtureInventory;
    use crate::shared::models::PackageOrigin;

    #[test]
    fn test_local_wins_on_conflict() {
        let local = vec![Package::new("NumPy", "1.26.0")
            .with_origin(PackageOrigin::Local)
            .with_exports(["numpy"])];
        let managed = vec![
            Package::new("numpy", "1.24.0").with_origin(PackageOrigin::Conda),
            Package::new("scipy", "1.11.0")
                .with_origin(PackageOrigin::Conda)
                .with_exports(["scipy"]),
        ];

        let merged = merge_inventories(local, managed);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].version, "1.26.0");
        assert_eq!(merged[0].origin, PackageOrigin::Local);
        assert_eq!(merged[1].distribution_name, "scipy");
    }

    #[test]
    fn test_managed_exports_fill_gaps() {
        let local = vec![Package::new("pyyaml", "6.0").with_origin(PackageOrigin::Local)];
        let managed = vec![Package::new("PyYAML", "6.0").with_exports(["yaml"])];

        let merged = merge_inventories(local, managed);
        assert_eq!(merged.len(), 1);
        assert!(merged[0].exports_name("yaml"));
        assert_eq!(merged[0].origin, PackageOrigin::Local);
    }

    #[test]
    fn test_composite_inventory() {
        let composite = CompositeInventory::new(Box::new(FixtureInventory::new(vec![
            Package::new("requests", "2.31.0").with_exports(["requests"]),
        ])))
        .with_managed(Box::new(FixtureInventory::new(vec![
            Package::new("requests", "2.28.0"),
            Package::new("conda-only", "1.0"),
        ])));

        let packages = composite.list_installed().unwrap();
        let names: Vec<_> = packages.iter().map(|p| p.to_string()).collect();
        assert_eq!(names, vec!["requests==2.31.0", "conda-only==1.0"]);
    }
}
