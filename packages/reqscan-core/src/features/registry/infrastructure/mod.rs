//! Registry adapters

pub mod in_memory;
pub mod pypi;
pub mod requirement;

pub use in_memory::InMemoryRegistry;
pub use pypi::PypiRegistry;
pub use requirement::{parse_requirement, parse_requirements};
