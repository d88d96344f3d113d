//! Parsing domain models

mod source_module;

pub use source_module::{SourceKind, SourceModule, SourceSet};
