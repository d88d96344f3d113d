//! Configuration validation
//!
//! Range checks for every tunable. Called by `ReqscanConfig::build` and after
//! YAML loading.

use super::error::{ConfigError, ConfigResult};
use super::io::RegistrySettings;
use super::reqscan_config::ReqscanConfig;
use crate::shared::constants::resolution::MAX_DEPTH_LIMIT;

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Check `value` lies within `min..=max`
fn check_range<T>(field: &str, value: T, min: T, max: T, hint: &str) -> ConfigResult<()>
where
    T: PartialOrd + ToString,
{
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

impl Validatable for RegistrySettings {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "registry.timeout_ms",
            self.timeout_ms,
            100,
            120_000,
            "Use a timeout between 100ms and 2 minutes",
        )?;
        check_range(
            "registry.max_in_flight",
            self.max_in_flight,
            1,
            64,
            "Registry lookups are I/O-bound; 8 is usually plenty",
        )?;
        if self.enabled && !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(ConfigError::Custom(format!(
                "registry.url must be an http(s) URL, got '{}'",
                self.url
            )));
        }
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "RegistrySettings"
    }
}

impl Validatable for ReqscanConfig {
    fn validate(&self) -> ConfigResult<()> {
        check_range(
            "max_depth",
            self.max_depth,
            0,
            MAX_DEPTH_LIMIT,
            "Deep closures explode quickly; most projects need 1-2",
        )?;
        if let Some((import, _)) = self
            .overrides
            .iter()
            .find(|(import, dist)| import.trim().is_empty() || dist.trim().is_empty())
        {
            return Err(ConfigError::Custom(format!(
                "override for '{}' has an empty import or distribution name",
                import
            )));
        }
        self.registry.validate()
    }

    fn config_name(&self) -> &'static str {
        "ReqscanConfig"
    }
}
