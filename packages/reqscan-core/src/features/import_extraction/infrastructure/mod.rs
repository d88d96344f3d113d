//! Tree-sitter based import extraction

pub mod aliases;
pub mod constant_fold;
pub mod import_visitor;

pub use aliases::DynamicImportAliases;
pub use constant_fold::fold_constant_string;
pub use import_visitor::{extract_file_imports, FileImports};
