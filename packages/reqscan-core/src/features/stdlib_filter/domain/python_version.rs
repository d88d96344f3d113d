//! Target Python version

use std::fmt;

use crate::config::{ConfigError, ConfigResult};

/// `major.minor` of the interpreter the manifest is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PythonVersion {
    pub major: u8,
    pub minor: u8,
}

impl PythonVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Parse `3.11` or `3.11.4` (the patch level is ignored)
    pub fn parse(text: &str) -> ConfigResult<Self> {
        let invalid = || ConfigError::InvalidPythonVersion(text.to_string());

        let mut parts = text.trim().split('.');
        let major: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if let Some(patch) = parts.next() {
            if patch.parse::<u16>().is_err() {
                return Err(invalid());
            }
        }
        if major != 3 || parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self { major, minor })
    }
}

impl Default for PythonVersion {
    fn default() -> Self {
        Self::new(3, 12)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
