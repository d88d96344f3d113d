//! Scan Pipeline
//!
//! ```text
//! discover → load ─┬→ imports → stdlib filter → resolve → libraries → transitive
//!                  └→ env vars (when requested)
//! ```
//!
//! Sources are discovered and read once and shared by both extractors.
//! Stage diagnostics are concatenated in stage order and deduplicated.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::report::{dedupe_diagnostics, ScanReport};
use crate::config::{ReqscanConfig, ResolutionContext};
use crate::features::env_extraction::extract_env_vars_from_sources;
use crate::features::import_extraction::extract_imports_from_sources;
use crate::features::inventory::{CompositeInventory, CondaInventory, PackageInventory, SitePackagesInventory};
use crate::features::package_resolver::{OverrideTable, PackageResolver};
use crate::features::parsing::{discover_sources, load_sources};
use crate::features::registry::{PypiRegistry, RegistryClient};
use crate::features::stdlib_filter::{filter_stdlib, StdlibTable};
use crate::features::transitive::TransitiveResolver;
use crate::shared::models::{Package, PackageOrigin, Result};

pub struct ScanPipeline {
    config: ReqscanConfig,
    inventory: Box<dyn PackageInventory>,
    registry: Option<Box<dyn RegistryClient>>,
    stdlib: StdlibTable,
    overrides: OverrideTable,
}

impl ScanPipeline {
    /// Pipeline with an explicit inventory and no registry
    pub fn new(config: ReqscanConfig, inventory: Box<dyn PackageInventory>) -> Result<Self> {
        let stdlib = match config.stdlib_file {
            Some(ref path) => StdlibTable::from_file(path)?,
            None => StdlibTable::for_version(config.python_version),
        };
        let overrides = OverrideTable::builtin().with_overrides(&config.overrides);

        Ok(Self {
            config,
            inventory,
            registry: None,
            stdlib,
            overrides,
        })
    }

    /// Pipeline wired to the real environment and PyPI, as configured
    pub fn from_config(config: ReqscanConfig) -> Result<Self> {
        let site_packages = if config.site_packages.is_empty() {
            SitePackagesInventory::discover()
        } else {
            SitePackagesInventory::new(config.site_packages.clone())
        };
        debug!(paths = ?site_packages.paths(), "site-packages inventory");

        let mut inventory = CompositeInventory::new(Box::new(site_packages));
        if config.include_conda {
            if let Some(conda) = CondaInventory::from_env() {
                debug!(prefix = %conda.prefix().display(), "including conda environment");
                inventory = inventory.with_managed(Box::new(conda));
            }
        }

        let registry = if config.registry.enabled {
            Some(PypiRegistry::from_settings(&config.registry)?)
        } else {
            None
        };

        let mut pipeline = Self::new(config, Box::new(inventory))?;
        if let Some(registry) = registry {
            pipeline = pipeline.with_registry(Box::new(registry));
        }
        Ok(pipeline)
    }

    pub fn with_registry(mut self, registry: Box<dyn RegistryClient>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &ReqscanConfig {
        &self.config
    }

    /// Scan `root`; env vars are extracted only when `generate_env` is set
    pub fn run(&self, root: &Path, generate_env: bool) -> Result<ScanReport> {
        let start = Instant::now();
        let ctx = self.config.resolution_context(root);
        let mut diagnostics = Vec::new();

        let (sources, walk_diagnostics) =
            discover_sources(root, &ctx.exclusions, ctx.scan_notebooks)?;
        diagnostics.extend(walk_diagnostics);
        let loaded = load_sources(&sources);
        diagnostics.extend(loaded.diagnostics);

        let mut imports = extract_imports_from_sources(&loaded.modules);
        diagnostics.append(&mut imports.diagnostics);

        let names = imports.module_names();
        let user_exclusions = bare_exclusions(&ctx);
        let local_imports = local_imports(&names, &self.stdlib, &user_exclusions, &sources.local_modules);
        for name in &local_imports {
            debug!(import = %name, "import provided by a project module, not required");
        }
        let exclusions: Vec<String> = user_exclusions
            .into_iter()
            .chain(sources.local_modules.iter().cloned())
            .collect();
        let import_names = filter_stdlib(&names, &self.stdlib, &exclusions);
        debug!(
            extracted = names.len(),
            third_party = import_names.len(),
            "stdlib filter applied"
        );

        let registry = self.registry.as_deref();
        let resolver = PackageResolver::new(self.inventory.as_ref(), registry, &self.overrides)?
            .with_max_in_flight(self.config.registry.max_in_flight);
        let mut resolution = resolver.resolve(&import_names, &ctx)?;
        if !ctx.libraries.is_empty() {
            let replaced = resolution.merge_requested(resolver.resolve_libraries(&ctx.libraries, &ctx)?);
            for package in &replaced {
                debug!(
                    package = %package.distribution_name,
                    version = %package.version,
                    "import-derived record replaced by requested library"
                );
            }
        }
        diagnostics.append(&mut resolution.diagnostics);

        let mut cycles = Vec::new();
        let packages = match registry {
            Some(registry) if ctx.max_depth > 0 => {
                let expansion = TransitiveResolver::new(registry)
                    .with_max_in_flight(self.config.registry.max_in_flight)
                    .expand(&resolution.resolved, ctx.max_depth)?;
                diagnostics.extend(expansion.diagnostics);
                cycles = expansion.cycles;
                restore_seeds(&resolution.resolved, expansion.packages, &ctx)
            }
            None if ctx.max_depth > 0 => {
                warn!(max_depth = ctx.max_depth, "transitive expansion needs the registry; skipped");
                resolution.resolved
            }
            _ => resolution.resolved,
        };

        let env_vars = if generate_env {
            let mut env = extract_env_vars_from_sources(&loaded.modules);
            diagnostics.append(&mut env.diagnostics);
            env.records
        } else {
            Vec::new()
        };

        let report = ScanReport {
            import_names,
            local_imports,
            packages,
            unknown: resolution.unknown,
            env_vars,
            diagnostics: dedupe_diagnostics(diagnostics),
            cycles,
            files_scanned: imports.files_scanned,
            duration: start.elapsed(),
        };

        info!(
            root = %root.display(),
            files = report.files_scanned,
            packages = report.packages.len(),
            unknown = report.unknown.len(),
            env_vars = report.env_vars.len(),
            diagnostics = report.diagnostics.len(),
            elapsed_ms = report.duration.as_millis() as u64,
            "scan complete"
        );
        Ok(report)
    }
}

/// User exclusions that name modules rather than paths
fn bare_exclusions(ctx: &ResolutionContext) -> Vec<String> {
    ctx.exclusions
        .iter()
        .filter(|e| !e.contains('/') && !e.contains('\\'))
        .cloned()
        .collect()
}

/// Non-stdlib imports that a project module satisfies, first-seen order
fn local_imports(
    names: &[String],
    stdlib: &StdlibTable,
    user_exclusions: &[String],
    local_modules: &[String],
) -> Vec<String> {
    let local: HashSet<&str> = local_modules.iter().map(String::as_str).collect();
    filter_stdlib(names, stdlib, user_exclusions)
        .into_iter()
        .filter(|name| local.contains(name.as_str()))
        .collect()
}

/// Put the resolver's records back for seeds (display name, origin, import
/// name) and apply pins to discovered packages
fn restore_seeds(seeds: &[Package], closure: Vec<Package>, ctx: &ResolutionContext) -> Vec<Package> {
    let by_key: HashMap<String, &Package> = seeds.iter().map(|p| (p.key(), p)).collect();
    closure
        .into_iter()
        .map(|package| match by_key.get(&package.key()) {
            Some(seed) => (*seed).clone(),
            None => {
                let mut package = package.with_origin(PackageOrigin::Remote);
                if let Some(pinned) = ctx.pinned_version(&package.distribution_name) {
                    package.version = pinned.to_string();
                }
                package
            }
        })
        .collect()
}
