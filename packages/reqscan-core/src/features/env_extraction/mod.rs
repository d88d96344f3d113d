//! Env Extraction Feature
//!
//! Finds the environment variables a program reads, with their defaults and
//! whether the program can run without them.
//!
//! ## Structure
//! - `domain/` - EnvVarRecord, EnvScan
//! - `infrastructure/` - environ alias prepass, access visitor
//! - `application/` - extract_env_vars

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{extract_env_vars, extract_env_vars_from_sources, extract_env_vars_with};
pub use domain::{EnvScan, EnvVarRecord};
