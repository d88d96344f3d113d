//! In-memory inventory

use crate::features::inventory::ports::PackageInventory;
use crate::shared::models::{Package, Result};

/// Fixed package list, for tests and for embedding callers that already
/// know their environment
#[derive(Debug, Clone, Default)]
pub struct FixtureInventory {
    packages: Vec<Package>,
}

impl FixtureInventory {
    pub fn new(packages: Vec<Package>) -> Self {
        Self { packages }
    }

    pub fn with(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }
}

impl PackageInventory for FixtureInventory {
    fn list_installed(&self) -> Result<Vec<Package>> {
        Ok(self.packages.clone())
    }

    fn name(&self) -> &'static str {
        "fixture"
    }
}
