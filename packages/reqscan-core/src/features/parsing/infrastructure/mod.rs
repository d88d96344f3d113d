//! Parsing infrastructure: filesystem walking, file loading, tree-sitter

pub mod notebook;
pub mod python_parser;
pub mod source_reader;
pub mod walker;

pub use notebook::notebook_to_python;
pub use python_parser::parse_module;
pub use source_reader::read_source;
pub use walker::{discover_sources, ExclusionSet};
