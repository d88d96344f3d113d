//! Inventory Feature
//!
//! What is installed locally, and which import names each installed
//! distribution provides.
//!
//! ## Structure
//! - `ports/` - PackageInventory trait
//! - `infrastructure/` - site-packages, conda and fixture inventories
//! - `application/` - merge_inventories, CompositeInventory

pub mod application;
pub mod infrastructure;
pub mod ports;

pub use application::{merge_inventories, CompositeInventory};
pub use infrastructure::{CondaInventory, FixtureInventory, SitePackagesInventory};
pub use ports::PackageInventory;
