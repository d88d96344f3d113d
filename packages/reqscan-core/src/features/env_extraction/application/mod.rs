//! Env extraction application layer

mod extract_env;

pub use extract_env::{extract_env_vars, extract_env_vars_from_sources, extract_env_vars_with};
