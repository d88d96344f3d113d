//! Package Name Resolver
//!
//! Import name → installable distribution. Per name, the first hit wins:
//!
//! 1. override table (version from the local inventory, else the registry in
//!    any mode, else unknown); an override hit always emits its distribution
//! 2. exactly one installed distribution exports the name
//! 3. several do: deterministic tie-break + `AmbiguousPackageMapping`
//! 4. registry lookup by import name (`compat` mode needs a pin)
//! 5. nothing: `UnknownPackage`
//!
//! Local decisions are made first; the remaining registry lookups then run on
//! a bounded pool and are merged back in input order.

use std::collections::HashMap;
use tracing::{debug, info};

use crate::config::{LibraryRequest, ResolutionContext, ResolutionMode};
use crate::features::inventory::PackageInventory;
use crate::features::package_resolver::domain::{choose_ambiguous, OverrideTable, Resolution};
use crate::features::registry::{RegistryClient, RegistryError, RegistryRecord, RegistryResult};
use crate::shared::constants::registry::DEFAULT_MAX_IN_FLIGHT;
use crate::shared::models::{
    normalize_name, Diagnostic, DiagnosticKind, Package, PackageOrigin, Result, UNKNOWN_VERSION,
};
use crate::shared::parallel_optimizer::{bounded_pool, ordered_map};

/// Outcome for one name before the registry is consulted
enum LocalDecision {
    Found(Package),
    Query { query: String, origin: PackageOrigin },
}

pub struct PackageResolver<'a> {
    installed: Vec<Package>,
    /// Import name → indices into `installed`
    exports: HashMap<String, Vec<usize>>,
    /// Normalized distribution name → index into `installed`
    by_key: HashMap<String, usize>,
    registry: Option<&'a dyn RegistryClient>,
    overrides: &'a OverrideTable,
    max_in_flight: usize,
}

impl<'a> PackageResolver<'a> {
    /// Snapshot the inventory once; lookups during resolution are in-memory
    pub fn new(
        inventory: &dyn PackageInventory,
        registry: Option<&'a dyn RegistryClient>,
        overrides: &'a OverrideTable,
    ) -> Result<Self> {
        let installed = inventory.list_installed()?;

        let mut exports: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_key = HashMap::new();
        for (index, package) in installed.iter().enumerate() {
            by_key.entry(package.key()).or_insert(index);
            for name in &package.exports {
                exports.entry(name.clone()).or_default().push(index);
            }
        }

        debug!(
            inventory = inventory.name(),
            installed = installed.len(),
            exported_names = exports.len(),
            "resolver ready"
        );

        Ok(Self {
            installed,
            exports,
            by_key,
            registry,
            overrides,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        })
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Resolve filtered import names to packages
    pub fn resolve<S: AsRef<str>>(&self, names: &[S], ctx: &ResolutionContext) -> Result<Resolution> {
        let mut resolution = Resolution::default();
        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();

        let decisions: Vec<LocalDecision> = names
            .iter()
            .map(|name| self.decide_locally(name, &mut resolution.diagnostics))
            .collect();

        let queries: Vec<String> = decisions
            .iter()
            .filter_map(|d| match d {
                LocalDecision::Query { query, .. } => Some(query.clone()),
                LocalDecision::Found(_) => None,
            })
            .collect();
        let mut answers = self.lookup_all(&queries, |registry, name| registry.lookup(name))?;

        for (name, decision) in names.iter().zip(decisions) {
            match decision {
                LocalDecision::Found(package) => {
                    resolution.push_package(self.apply_pin(package, ctx));
                }
                LocalDecision::Query { query, origin } => {
                    let answer = answers.remove(&query);
                    self.accept_remote(name, &query, origin, answer, ctx, &mut resolution);
                }
            }
        }

        info!(
            names = names.len(),
            resolved = resolution.resolved.len(),
            unknown = resolution.unknown.len(),
            "resolution complete"
        );
        Ok(resolution)
    }

    /// Resolve explicitly requested libraries by distribution name
    ///
    /// Local inventory first, then the registry. A request with a version asks
    /// for that release and keeps the requested version. Requests that resolve
    /// nowhere produce `InvalidLibraryOverride`.
    pub fn resolve_libraries(
        &self,
        requests: &[LibraryRequest],
        ctx: &ResolutionContext,
    ) -> Result<Resolution> {
        let mut resolution = Resolution::default();

        let remote: Vec<&LibraryRequest> = requests
            .iter()
            .filter(|r| !self.by_key.contains_key(&normalize_name(&r.name)))
            .collect();
        let mut answers = self.lookup_all(
            &remote.iter().map(|r| r.name.clone()).collect::<Vec<_>>(),
            |registry, name| {
                let request = remote.iter().find(|r| r.name == name);
                match request.and_then(|r| r.version.as_deref()) {
                    Some(version) => registry.lookup_release(name, version),
                    None => registry.lookup(name),
                }
            },
        )?;

        for request in requests {
            if let Some(&index) = self.by_key.get(&normalize_name(&request.name)) {
                let mut package = self.installed[index].clone();
                if let Some(ref version) = request.version {
                    package.version = version.clone();
                }
                resolution.push_package(self.apply_pin(package, ctx));
                continue;
            }

            match answers.remove(&request.name) {
                Some(Ok(record)) => {
                    let version = request.version.clone().unwrap_or(record.latest_version);
                    resolution.push_package(
                        Package::new(record.name, version).with_origin(PackageOrigin::Remote),
                    );
                }
                Some(Err(RegistryError::Unavailable { reason, .. })) => {
                    resolution.push_unknown(request.name.clone());
                    resolution.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::RegistryUnavailable,
                        request.name.clone(),
                        reason,
                    ));
                }
                None if self.registry.is_none() && request.version.is_some() => {
                    let version = request.version.clone().unwrap_or_default();
                    resolution.push_package(Package::new(request.name.clone(), version));
                }
                Some(Err(RegistryError::NotFound(_))) | None => {
                    resolution.push_unknown(request.name.clone());
                    resolution.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::InvalidLibraryOverride,
                        request.name.clone(),
                        "requested library is neither installed nor published",
                    ));
                }
            }
        }

        Ok(resolution)
    }

    fn decide_locally(&self, name: &str, diagnostics: &mut Vec<Diagnostic>) -> LocalDecision {
        if let Some(distribution) = self.overrides.get(name) {
            return match self.by_key.get(&normalize_name(distribution)) {
                Some(&index) => LocalDecision::Found(
                    self.installed[index]
                        .clone()
                        .with_import_name(name)
                        .with_origin(PackageOrigin::Override),
                ),
                None => LocalDecision::Query {
                    query: distribution.to_string(),
                    origin: PackageOrigin::Override,
                },
            };
        }

        let candidates: Vec<&Package> = self
            .exports
            .get(name)
            .map(|indices| indices.iter().map(|&i| &self.installed[i]).collect())
            .unwrap_or_default();

        match candidates.as_slice() {
            [] => LocalDecision::Query {
                query: name.to_string(),
                origin: PackageOrigin::Remote,
            },
            [only] => LocalDecision::Found((*only).clone().with_import_name(name)),
            several => {
                let chosen = choose_ambiguous(name, several).unwrap_or(several[0]);
                let mut names: Vec<&str> = several.iter().map(|p| p.distribution_name.as_str()).collect();
                names.sort_unstable();
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::AmbiguousPackageMapping,
                    name,
                    format!(
                        "exported by {}; chose {}",
                        names.join(", "),
                        chosen.distribution_name
                    ),
                ));
                LocalDecision::Found(chosen.clone().with_import_name(name))
            }
        }
    }

    fn accept_remote(
        &self,
        name: &str,
        query: &str,
        origin: PackageOrigin,
        answer: Option<RegistryResult<RegistryRecord>>,
        ctx: &ResolutionContext,
        resolution: &mut Resolution,
    ) {
        if origin == PackageOrigin::Override {
            self.accept_override(name, query, answer, ctx, resolution);
            return;
        }

        match answer {
            Some(Ok(record)) => {
                let pinned = ctx
                    .pinned_version(&record.name)
                    .or_else(|| ctx.pinned_version(query))
                    .map(str::to_string);
                let version = match (ctx.mode, pinned) {
                    (_, Some(pinned)) => pinned,
                    (ResolutionMode::Latest, None) => record.latest_version,
                    (ResolutionMode::Compat, None) => {
                        resolution.push_unknown(name);
                        resolution.diagnostics.push(Diagnostic::new(
                            DiagnosticKind::UnknownPackage,
                            name,
                            format!(
                                "'{}' is only in the registry and compat mode requires a pinned version",
                                record.name
                            ),
                        ));
                        return;
                    }
                };
                resolution.push_package(
                    Package::new(record.name, version)
                        .with_import_name(name)
                        .with_origin(origin),
                );
            }
            Some(Err(RegistryError::Unavailable { reason, .. })) => {
                resolution.push_unknown(name);
                resolution.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::RegistryUnavailable,
                    name,
                    reason,
                ));
            }
            Some(Err(RegistryError::NotFound(_))) | None => {
                let message = if self.registry.is_some() {
                    "no installed distribution or registry project provides this import"
                } else {
                    "no installed distribution provides this import (registry disabled)"
                };
                resolution.push_unknown(name);
                resolution
                    .diagnostics
                    .push(Diagnostic::new(DiagnosticKind::UnknownPackage, name, message));
            }
        }
    }

    /// An override names its distribution; only the version comes from the
    /// registry, so neither a miss nor `compat` mode can drop it
    fn accept_override(
        &self,
        name: &str,
        distribution: &str,
        answer: Option<RegistryResult<RegistryRecord>>,
        ctx: &ResolutionContext,
        resolution: &mut Resolution,
    ) {
        let version = match answer {
            Some(Ok(record)) => record.latest_version,
            Some(Err(RegistryError::Unavailable { reason, .. })) => {
                resolution.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::RegistryUnavailable,
                    name,
                    reason,
                ));
                UNKNOWN_VERSION.to_string()
            }
            Some(Err(RegistryError::NotFound(_))) | None => {
                debug!(import = name, distribution, "override target has no known version");
                UNKNOWN_VERSION.to_string()
            }
        };
        let package = Package::new(distribution, version)
            .with_import_name(name)
            .with_origin(PackageOrigin::Override);
        resolution.push_package(self.apply_pin(package, ctx));
    }

    /// Run registry lookups on a bounded pool; one lookup per distinct name
    fn lookup_all<F>(
        &self,
        names: &[String],
        lookup: F,
    ) -> Result<HashMap<String, RegistryResult<RegistryRecord>>>
    where
        F: Fn(&dyn RegistryClient, &str) -> RegistryResult<RegistryRecord> + Sync + Send,
    {
        let Some(registry) = self.registry else {
            return Ok(HashMap::new());
        };

        let mut unique: Vec<String> = Vec::new();
        for name in names {
            if !unique.contains(name) {
                unique.push(name.clone());
            }
        }
        if unique.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(lookups = unique.len(), max_in_flight = self.max_in_flight, "registry lookups");
        let pool = bounded_pool(self.max_in_flight)?;
        let answers = ordered_map(&pool, &unique, |name| lookup(registry, name.as_str()));
        Ok(unique.into_iter().zip(answers).collect())
    }

    fn apply_pin(&self, mut package: Package, ctx: &ResolutionContext) -> Package {
        if let Some(pinned) = ctx.pinned_version(&package.distribution_name) {
            package.version = pinned.to_string();
        }
        package
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::inventory::FixtureInventory;
    use crate::features::registry::InMemoryRegistry;
    use crate::shared::models::count_kind;
    use pretty_assertions::assert_eq;

    fn summary(resolution: &Resolution) -> Vec<String> {
        resolution.resolved.iter().map(|p| p.to_string()).collect()
    }

    fn local(name: &str, version: &str, exports: &[&str]) -> Package {
        Package::new(name, version)
            .with_origin(PackageOrigin::Local)
            .with_exports(exports.iter().copied())
    }

    #[test]
    fn test_precedence_chain() {
        let inventory = FixtureInventory::new(vec![
            local("Pillow", "10.0.1", &["PIL"]),
            local("requests", "2.31.0", &["requests"]),
        ]);
        let registry = InMemoryRegistry::new()
            .with_project("scikit-learn", "1.3.2", &[])
            .with_project("flask", "3.0.0", &[]);
        let overrides = OverrideTable::builtin();
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides).unwrap();

        let ctx = ResolutionContext::new(".");
        let resolution = resolver
            .resolve(&["PIL", "requests", "sklearn", "flask", "nonexistent_mod"], &ctx)
            .unwrap();

        assert_eq!(
            summary(&resolution),
            vec![
                "Pillow==10.0.1",
                "requests==2.31.0",
                "scikit-learn==1.3.2",
                "flask==3.0.0",
            ]
        );
        assert_eq!(resolution.resolved[0].origin, PackageOrigin::Override);
        assert_eq!(resolution.resolved[2].origin, PackageOrigin::Override);
        assert_eq!(resolution.resolved[3].origin, PackageOrigin::Remote);
        assert_eq!(resolution.unknown, vec!["nonexistent_mod"]);
        assert_eq!(count_kind(&resolution.diagnostics, DiagnosticKind::UnknownPackage), 1);
    }

    #[test]
    fn test_override_wins_over_local_exports() {
        let inventory = FixtureInventory::new(vec![
            local("yaml-shim", "0.1", &["yaml"]),
            local("PyYAML", "6.0.1", &["yaml", "_yaml"]),
        ]);
        let overrides = OverrideTable::builtin();
        let resolver = PackageResolver::new(&inventory, None, &overrides).unwrap();

        let resolution = resolver.resolve(&["yaml"], &ResolutionContext::new(".")).unwrap();
        assert_eq!(summary(&resolution), vec!["PyYAML==6.0.1"]);
        assert!(resolution.diagnostics.is_empty());
    }

    #[test]
    fn test_ambiguous_mapping_is_deterministic() {
        let packages = vec![
            local("python-jwt", "4.0", &["jwt"]),
            local("PyJWT", "2.8.0", &["jwt"]),
        ];
        let overrides = OverrideTable::empty();
        let ctx = ResolutionContext::new(".");

        let mut reversed = packages.clone();
        reversed.reverse();
        for order in [packages, reversed] {
            let inventory = FixtureInventory::new(order);
            let resolver = PackageResolver::new(&inventory, None, &overrides).unwrap();
            let resolution = resolver.resolve(&["jwt"], &ctx).unwrap();

            assert_eq!(summary(&resolution), vec!["PyJWT==2.8.0"]);
            assert_eq!(
                count_kind(&resolution.diagnostics, DiagnosticKind::AmbiguousPackageMapping),
                1
            );
        }
    }

    #[test]
    fn test_two_imports_one_distribution() {
        let inventory = FixtureInventory::new(vec![local("PyYAML", "6.0.1", &["yaml", "_yaml"])]);
        let overrides = OverrideTable::empty();
        let resolver = PackageResolver::new(&inventory, None, &overrides).unwrap();

        let resolution = resolver
            .resolve(&["yaml", "_yaml"], &ResolutionContext::new("."))
            .unwrap();
        assert_eq!(summary(&resolution), vec!["PyYAML==6.0.1"]);
    }

    #[test]
    fn test_compat_mode_requires_pin() {
        let inventory = FixtureInventory::default();
        let registry = InMemoryRegistry::new()
            .with_project("flask", "3.0.0", &[])
            .with_project("click", "8.1.7", &[]);
        let overrides = OverrideTable::empty();
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides).unwrap();

        let ctx = ResolutionContext::new(".")
            .with_mode(ResolutionMode::Compat)
            .with_pin("Flask", "2.0.0");
        let resolution = resolver.resolve(&["flask", "click"], &ctx).unwrap();

        assert_eq!(summary(&resolution), vec!["flask==2.0.0"]);
        assert_eq!(resolution.unknown, vec!["click"]);
    }

    #[test]
    fn test_registry_unavailable_degrades_to_unknown() {
        let inventory = FixtureInventory::default();
        let registry = InMemoryRegistry::new()
            .with_project("numpy", "1.26.2", &[])
            .with_unavailable("pandas");
        let overrides = OverrideTable::empty();
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides)
            .unwrap()
            .with_max_in_flight(2);

        let resolution = resolver
            .resolve(&["numpy", "pandas"], &ResolutionContext::new("."))
            .unwrap();
        assert_eq!(summary(&resolution), vec!["numpy==1.26.2"]);
        assert_eq!(resolution.unknown, vec!["pandas"]);
        assert_eq!(
            count_kind(&resolution.diagnostics, DiagnosticKind::RegistryUnavailable),
            1
        );
    }

    #[test]
    fn test_offline_without_local_match() {
        let inventory = FixtureInventory::default();
        let overrides = OverrideTable::builtin();
        let resolver = PackageResolver::new(&inventory, None, &overrides).unwrap();

        let resolution = resolver
            .resolve(&["PIL", "requests"], &ResolutionContext::new("."))
            .unwrap();
        assert_eq!(summary(&resolution), vec![format!("Pillow=={}", UNKNOWN_VERSION)]);
        assert_eq!(resolution.resolved[0].version, UNKNOWN_VERSION);
        assert_eq!(resolution.resolved[0].origin, PackageOrigin::Override);
        assert_eq!(resolution.unknown, vec!["requests"]);
        assert_eq!(count_kind(&resolution.diagnostics, DiagnosticKind::UnknownPackage), 1);
    }

    #[test]
    fn test_override_ignores_compat_gate() {
        let inventory = FixtureInventory::default();
        let registry = InMemoryRegistry::new()
            .with_project("Pillow", "10.2.0", &[])
            .with_project("httpx", "0.26.0", &[]);
        let overrides = OverrideTable::builtin();
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides).unwrap();

        let ctx = ResolutionContext::new(".").with_mode(ResolutionMode::Compat);
        let resolution = resolver.resolve(&["PIL", "httpx"], &ctx).unwrap();

        assert_eq!(summary(&resolution), vec!["Pillow==10.2.0"]);
        assert_eq!(resolution.resolved[0].import_name.as_deref(), Some("PIL"));
        assert_eq!(resolution.unknown, vec!["httpx"]);
    }

    #[test]
    fn test_override_survives_registry_miss_and_outage() {
        let inventory = FixtureInventory::default();
        let registry = InMemoryRegistry::new().with_unavailable("PyYAML");
        let overrides = OverrideTable::builtin();
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides).unwrap();

        let ctx = ResolutionContext::new(".").with_pin("scikit-learn", "1.3.2");
        let resolution = resolver.resolve(&["yaml", "sklearn"], &ctx).unwrap();

        assert_eq!(
            summary(&resolution),
            vec![format!("PyYAML=={}", UNKNOWN_VERSION), "scikit-learn==1.3.2".to_string()]
        );
        assert!(resolution.unknown.is_empty());
        assert_eq!(
            count_kind(&resolution.diagnostics, DiagnosticKind::RegistryUnavailable),
            1
        );
    }

    #[test]
    fn test_each_remote_name_looked_up_once() {
        let inventory = FixtureInventory::default();
        let registry = InMemoryRegistry::new().with_project("attrs", "23.1.0", &[]);
        let mut overrides = OverrideTable::empty();
        overrides.insert("attr", "attrs");
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides).unwrap();

        let resolution = resolver
            .resolve(&["attr", "attrs"], &ResolutionContext::new("."))
            .unwrap();
        assert_eq!(summary(&resolution), vec!["attrs==23.1.0"]);
        assert_eq!(registry.lookup_count(), 1);
    }

    #[test]
    fn test_library_requests() {
        let inventory = FixtureInventory::new(vec![local("langchain", "0.1.0", &["langchain"])]);
        let registry = InMemoryRegistry::new()
            .with_project("langchain-core", "0.1.23", &[])
            .with_release("langchain-openai", "0.0.5", &[]);
        let overrides = OverrideTable::empty();
        let resolver = PackageResolver::new(&inventory, Some(&registry), &overrides).unwrap();

        let requests =
            LibraryRequest::parse_list("langchain,langchain-core,langchain-openai==0.0.5,no-such-lib")
                .unwrap();
        let ctx = ResolutionContext::new(".");
        let resolution = resolver.resolve_libraries(&requests, &ctx).unwrap();

        assert_eq!(
            summary(&resolution),
            vec![
                "langchain==0.1.0",
                "langchain-core==0.1.23",
                "langchain-openai==0.0.5",
            ]
        );
        assert_eq!(resolution.unknown, vec!["no-such-lib"]);
        assert_eq!(
            count_kind(&resolution.diagnostics, DiagnosticKind::InvalidLibraryOverride),
            1
        );
    }

    #[test]
    fn test_offline_library_with_version_is_trusted() {
        let inventory = FixtureInventory::default();
        let overrides = OverrideTable::empty();
        let resolver = PackageResolver::new(&inventory, None, &overrides).unwrap();

        let requests = LibraryRequest::parse_list("fastapi==0.110.0,uvicorn").unwrap();
        let resolution = resolver
            .resolve_libraries(&requests, &ResolutionContext::new("."))
            .unwrap();
        assert_eq!(summary(&resolution), vec!["fastapi==0.110.0"]);
        assert_eq!(resolution.unknown, vec!["uvicorn"]);
    }
}
