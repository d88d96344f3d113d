//! Import extraction application layer

mod extract_imports;

pub use extract_imports::{extract_imports, extract_imports_from_sources, extract_imports_with};
