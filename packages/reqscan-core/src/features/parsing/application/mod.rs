//! Parsing application layer

mod load_sources;

pub use load_sources::{load_sources, LoadedSources};
