//! Transitive Feature
//!
//! Expands resolved packages into their registry-declared dependency
//! closure, bounded by depth.
//!
//! ## Structure
//! - `domain/` - DependencyGraph (petgraph), DependencyEdge, Expansion
//! - `application/` - TransitiveResolver

pub mod application;
pub mod domain;

pub use application::TransitiveResolver;
pub use domain::{DependencyEdge, DependencyGraph, Expansion};
