//! Configuration System
//!
//! Three tiers with progressive disclosure:
//! - Level 1: `ReqscanConfig::default()` (no file, no flags)
//! - Level 2: builder overrides (what the CLI does with its flags)
//! - Level 3: YAML file (`version: 1` schema)
//!
//! # Examples
//!
//! ```rust,ignore
//! use reqscan_core::config::{ReqscanConfig, ResolutionMode};
//!
//! let config = ReqscanConfig::default()
//!     .mode(ResolutionMode::Compat)
//!     .max_depth(1)
//!     .build()?;
//!
//! let config = ReqscanConfig::from_yaml("reqscan.yaml")?;
//! let ctx = config.resolution_context("./my-project");
//! ```

pub mod context;
pub mod error;
pub mod io;
pub mod reqscan_config;
pub mod validation;

// Re-exports
pub use context::{LibraryRequest, ResolutionContext, ResolutionMode};
pub use error::{ConfigError, ConfigResult};
pub use io::{ConfigFileV1, RegistrySettings};
pub use reqscan_config::ReqscanConfig;
pub use validation::Validatable;
