//! Registry Feature
//!
//! Latest versions and declared dependencies from a remote package index.
//!
//! ## Structure
//! - `ports/` - RegistryClient trait, RegistryRecord, RegistryError
//! - `infrastructure/` - PyPI JSON client, in-memory registry, requirement parsing

pub mod infrastructure;
pub mod ports;

pub use infrastructure::{InMemoryRegistry, PypiRegistry};
pub use ports::{DeclaredDependency, RegistryClient, RegistryError, RegistryRecord, RegistryResult};
