//! Utility modules shared across features
//!
//! - `tree_sitter`: Tree-sitter parsing, traversal and literal decoding

pub mod tree_sitter;
