//! Tree-sitter based environment access extraction

pub mod env_aliases;
pub mod env_visitor;

pub use env_aliases::{EnvAliases, EnvGetter};
pub use env_visitor::extract_file_env_vars;
