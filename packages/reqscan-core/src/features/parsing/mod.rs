//! Parsing Feature
//!
//! Turns a scan root into loaded Python text.
//!
//! ## Structure
//! - `domain/` - SourceModule, SourceSet
//! - `infrastructure/` - walker, file reader, notebook projection
//! - `application/` - load_sources

pub mod application;
pub mod domain;
pub mod infrastructure;

// Re-exports
pub use application::{load_sources, LoadedSources};
pub use domain::{SourceKind, SourceModule, SourceSet};
pub use infrastructure::{discover_sources, parse_module, read_source, ExclusionSet};
