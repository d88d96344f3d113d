//! Transitive resolver domain

mod dependency_graph;
mod expansion;

pub use dependency_graph::{DependencyEdge, DependencyGraph};
pub use expansion::Expansion;
