//! Transitive Resolver
//!
//! Breadth-first closure over registry-declared dependencies, bounded by
//! `max_depth`. Each frontier is looked up on a bounded pool; answers are
//! merged in frontier order so the closure is deterministic.
//!
//! Every closure member is looked up at most once per run. Members found at
//! the last level are still looked up, for their version only.

use std::collections::HashSet;
use tracing::{debug, info, trace};

use crate::features::registry::{RegistryClient, RegistryError, RegistryRecord, RegistryResult};
use crate::features::transitive::domain::{DependencyEdge, DependencyGraph, Expansion};
use crate::shared::constants::registry::DEFAULT_MAX_IN_FLIGHT;
use crate::shared::models::{
    normalize_name, Diagnostic, DiagnosticKind, Package, PackageOrigin, Result, UNKNOWN_VERSION,
};
use crate::shared::parallel_optimizer::{bounded_pool, ordered_map};

/// One pending registry query
struct Query {
    name: String,
    /// Known release to ask for (seeds with a version)
    release: Option<String>,
}

pub struct TransitiveResolver<'a> {
    registry: &'a dyn RegistryClient,
    max_in_flight: usize,
}

impl<'a> TransitiveResolver<'a> {
    pub fn new(registry: &'a dyn RegistryClient) -> Self {
        Self {
            registry,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    /// Expand `seeds` into their dependency closure
    ///
    /// Seeds are normalized and deduplicated and keep their versions.
    /// `max_depth == 0` returns them without touching the registry.
    pub fn expand(&self, seeds: &[Package], max_depth: usize) -> Result<Expansion> {
        let mut expansion = Expansion::default();
        let mut graph = DependencyGraph::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: Vec<usize> = Vec::new();

        for seed in seeds {
            let package = seed.clone().normalized();
            if visited.insert(package.distribution_name.clone()) {
                graph.node(&package.distribution_name);
                frontier.push(expansion.packages.len());
                expansion.packages.push(package);
            }
        }
        let seed_count = expansion.packages.len();

        if max_depth == 0 || frontier.is_empty() {
            return Ok(expansion);
        }

        let pool = bounded_pool(self.max_in_flight)?;
        let mut depth = 0;

        while !frontier.is_empty() {
            let queries: Vec<Query> = frontier
                .iter()
                .map(|&index| {
                    let package = &expansion.packages[index];
                    Query {
                        name: package.distribution_name.clone(),
                        release: (index < seed_count && package.has_known_version())
                            .then(|| package.version.clone()),
                    }
                })
                .collect();

            debug!(depth, lookups = queries.len(), "expanding frontier");
            let answers: Vec<RegistryResult<RegistryRecord>> =
                ordered_map(&pool, &queries, |query| match query.release {
                    Some(ref version) => self.registry.lookup_release(&query.name, version),
                    None => self.registry.lookup(&query.name),
                });

            let mut next = Vec::new();
            for (&index, answer) in frontier.iter().zip(answers) {
                let is_seed = index < seed_count;
                let name = expansion.packages[index].distribution_name.clone();

                let record = match answer {
                    Ok(record) => record,
                    Err(error) => {
                        self.record_failure(&name, is_seed, error, &mut expansion.diagnostics);
                        continue;
                    }
                };

                if !is_seed {
                    expansion.packages[index].version = record.latest_version.clone();
                }
                if depth == max_depth {
                    continue;
                }

                for dependency in record.dependencies {
                    let key = normalize_name(&dependency.name);
                    graph.add_edge(DependencyEdge {
                        from: name.clone(),
                        to: key.clone(),
                        constraint: dependency.constraint,
                    });
                    if visited.insert(key.clone()) {
                        next.push(expansion.packages.len());
                        expansion
                            .packages
                            .push(Package::new(key, UNKNOWN_VERSION).with_origin(PackageOrigin::Remote));
                    }
                }

                let declared: Vec<&str> = graph
                    .dependencies(&name)
                    .iter()
                    .map(|edge| edge.to.as_str())
                    .collect();
                trace!(package = %name, depth, dependencies = ?declared, "expanded");
            }

            if depth == max_depth {
                break;
            }
            depth += 1;
            frontier = next;
        }

        expansion.cycles = graph.cycles();
        for cycle in &expansion.cycles {
            debug!(members = %cycle.join(" -> "), "dependency cycle");
        }

        info!(
            seeds = seed_count,
            closure = expansion.packages.len(),
            edges = graph.edge_count(),
            max_depth,
            "transitive expansion complete"
        );
        Ok(expansion)
    }

    fn record_failure(
        &self,
        name: &str,
        is_seed: bool,
        error: RegistryError,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        match error {
            RegistryError::Unavailable { reason, .. } => {
                diagnostics.push(Diagnostic::new(DiagnosticKind::RegistryUnavailable, name, reason));
            }
            // Seeds were already resolved locally; not being published is fine
            RegistryError::NotFound(_) if is_seed => {
                debug!(package = name, "seed not in registry, not expanded");
            }
            RegistryError::NotFound(_) => {
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::UnknownPackage,
                    name,
                    "declared dependency not found in registry",
                ));
            }
        }
    }
}
