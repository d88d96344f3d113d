//! Inventory port
//!
//! The resolver only sees installed packages through this trait, so tests
//! and alternative environments plug in without touching the filesystem.

use crate::shared::models::{Package, Result};

/// Source of installed packages
pub trait PackageInventory: Send + Sync {
    /// Every installed distribution with its version and exported import names
    fn list_installed(&self) -> Result<Vec<Package>>;

    /// Name used in logs
    fn name(&self) -> &'static str {
        "inventory"
    }
}
