//! Env extraction domain

mod env_var;

pub use env_var::{EnvScan, EnvVarRecord};
