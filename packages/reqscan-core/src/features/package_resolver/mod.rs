//! Package Resolver Feature
//!
//! Maps filtered import names to distributions and versions using the
//! override table, the local inventory and the registry, in that order.
//!
//! ## Structure
//! - `domain/` - OverrideTable, Resolution, ambiguity tie-break
//! - `application/` - PackageResolver

pub mod application;
pub mod domain;

pub use application::PackageResolver;
pub use domain::{choose_ambiguous, OverrideTable, Resolution};
