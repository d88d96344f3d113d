//! Scan configuration
//!
//! Three tiers, later tiers win:
//! 1. `ReqscanConfig::default()`
//! 2. YAML file (`ReqscanConfig::from_yaml`)
//! 3. Builder calls (the CLI applies its flags this way)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::context::{LibraryRequest, ResolutionContext, ResolutionMode};
use super::error::{ConfigError, ConfigResult};
use super::io::{ConfigFileV1, RegistrySettings};
use super::validation::Validatable;
use crate::features::stdlib_filter::PythonVersion;
use crate::shared::constants::resolution::DEFAULT_MAX_DEPTH;
use crate::shared::models::normalize_name;

const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Complete scan configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ReqscanConfig {
    pub mode: ResolutionMode,
    pub max_depth: usize,
    pub exclude: Vec<String>,
    pub python_version: PythonVersion,
    /// Extra import name → distribution name overrides
    pub overrides: BTreeMap<String, String>,
    /// Normalized distribution name → version
    pub pins: BTreeMap<String, String>,
    pub libraries: Vec<LibraryRequest>,
    /// Explicit site-packages directories; empty means auto-discover
    pub site_packages: Vec<PathBuf>,
    pub include_conda: bool,
    pub scan_notebooks: bool,
    /// Custom stdlib table (one module per line)
    pub stdlib_file: Option<PathBuf>,
    pub registry: RegistrySettings,
}

impl Default for ReqscanConfig {
    fn default() -> Self {
        Self {
            mode: ResolutionMode::Latest,
            max_depth: DEFAULT_MAX_DEPTH,
            exclude: Vec::new(),
            python_version: PythonVersion::default(),
            overrides: BTreeMap::new(),
            pins: BTreeMap::new(),
            libraries: Vec::new(),
            site_packages: Vec::new(),
            include_conda: true,
            scan_notebooks: false,
            stdlib_file: None,
            registry: RegistrySettings::default(),
        }
    }
}

impl ReqscanConfig {
    /// Load from a YAML file on top of the defaults
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let file: ConfigFileV1 = serde_yaml::from_str(content)?;

        // Version check
        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let mut config = Self::default();
        if let Some(mode) = file.mode {
            config.mode = ResolutionMode::from_str(&mode)?;
        }
        if let Some(max_depth) = file.max_depth {
            config.max_depth = max_depth;
        }
        if let Some(exclude) = file.exclude {
            config.exclude = exclude;
        }
        if let Some(python_version) = file.python_version {
            config.python_version = PythonVersion::parse(&python_version)?;
        }
        if let Some(overrides) = file.overrides {
            config.overrides = overrides;
        }
        if let Some(pins) = file.pins {
            config.pins = pins
                .into_iter()
                .map(|(name, version)| (normalize_name(&name), version))
                .collect();
        }
        if let Some(site_packages) = file.site_packages {
            config.site_packages = site_packages;
        }
        if let Some(include_conda) = file.include_conda {
            config.include_conda = include_conda;
        }
        if let Some(scan_notebooks) = file.scan_notebooks {
            config.scan_notebooks = scan_notebooks;
        }
        if let Some(stdlib_file) = file.stdlib_file {
            config.stdlib_file = Some(stdlib_file);
        }
        if let Some(registry) = file.registry {
            config.registry = registry;
        }

        config.validate()?;
        Ok(config)
    }

    /// Export as YAML (schema v1)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = ConfigFileV1 {
            version: Some(1),
            mode: Some(self.mode.as_str().to_string()),
            max_depth: Some(self.max_depth),
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
            python_version: Some(self.python_version.to_string()),
            overrides: (!self.overrides.is_empty()).then(|| self.overrides.clone()),
            pins: (!self.pins.is_empty()).then(|| self.pins.clone()),
            site_packages: (!self.site_packages.is_empty()).then(|| self.site_packages.clone()),
            include_conda: Some(self.include_conda),
            scan_notebooks: Some(self.scan_notebooks),
            stdlib_file: self.stdlib_file.clone(),
            registry: Some(self.registry.clone()),
        };
        Ok(serde_yaml::to_string(&file)?)
    }

    // ═══════════════════════════════════════════════════════════════════
    // Builder overrides
    // ═══════════════════════════════════════════════════════════════════

    pub fn mode(mut self, mode: ResolutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn python_version(mut self, version: PythonVersion) -> Self {
        self.python_version = version;
        self
    }

    pub fn libraries(mut self, libraries: Vec<LibraryRequest>) -> Self {
        self.libraries.extend(libraries);
        self
    }

    pub fn pin(mut self, name: &str, version: impl Into<String>) -> Self {
        self.pins.insert(normalize_name(name), version.into());
        self
    }

    pub fn scan_notebooks(mut self, enabled: bool) -> Self {
        self.scan_notebooks = enabled;
        self
    }

    pub fn offline(mut self) -> Self {
        self.registry.enabled = false;
        self
    }

    /// Validate, then return self
    pub fn build(self) -> ConfigResult<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Context for one run over `root`
    pub fn resolution_context(&self, root: impl Into<PathBuf>) -> ResolutionContext {
        let mut ctx = ResolutionContext::new(root)
            .with_mode(self.mode)
            .with_max_depth(self.max_depth)
            .with_exclusions(self.exclude.clone());
        ctx.python_version = self.python_version;
        ctx.scan_notebooks = self.scan_notebooks;
        ctx.pins = self.pins.clone();
        for library in &self.libraries {
            ctx = ctx.with_library(library.clone());
        }
        ctx
    }
}
