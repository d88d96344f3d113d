//! Inventory adapters

pub mod conda;
pub mod fixture;
pub mod manifest;
pub mod site_packages;

pub use conda::CondaInventory;
pub use fixture::FixtureInventory;
pub use site_packages::SitePackagesInventory;
