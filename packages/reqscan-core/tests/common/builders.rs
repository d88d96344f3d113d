//! Test data builders

use reqscan_core::features::inventory::FixtureInventory;
use reqscan_core::shared::models::{Package, PackageOrigin};

/// Builder for an in-memory inventory of installed distributions
#[derive(Debug, Default)]
pub struct InventoryBuilder {
    packages: Vec<Package>,
}

impl InventoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installed distribution exporting the given top-level names
    pub fn installed(mut self, name: &str, version: &str, exports: &[&str]) -> Self {
        self.packages.push(
            Package::new(name, version)
                .with_origin(PackageOrigin::Local)
                .with_exports(exports.iter().copied()),
        );
        self
    }

    pub fn build(self) -> FixtureInventory {
        FixtureInventory::new(self.packages)
    }

    pub fn boxed(self) -> Box<FixtureInventory> {
        Box::new(self.build())
    }
}

/// `name==version` strings, in order
pub fn pinned(packages: &[Package]) -> Vec<String> {
    packages.iter().map(|p| p.to_string()).collect()
}
