//! Resolution results and the ambiguity tie-break

use crate::shared::models::{normalize_name, Diagnostic, Package};

/// Output of one resolver run
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Unique by normalized distribution name, in input-name order
    pub resolved: Vec<Package>,
    /// Names that resolved nowhere
    pub unknown: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    /// Append a package unless its distribution is already resolved
    pub fn push_package(&mut self, package: Package) -> bool {
        let key = package.key();
        if self.resolved.iter().any(|p| p.key() == key) {
            return false;
        }
        self.resolved.push(package);
        true
    }

    pub fn push_unknown(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.unknown.contains(&name) {
            self.unknown.push(name);
        }
    }

    /// Fold in explicitly requested libraries
    ///
    /// A requested package replaces an import-derived record of the same
    /// distribution in place, inheriting its import name. Returns the records
    /// that were replaced.
    pub fn merge_requested(&mut self, requested: Resolution) -> Vec<Package> {
        let mut replaced = Vec::new();
        for mut package in requested.resolved {
            let key = package.key();
            match self.resolved.iter_mut().find(|p| p.key() == key) {
                Some(existing) => {
                    if package.import_name.is_none() {
                        package.import_name = existing.import_name.clone();
                    }
                    replaced.push(std::mem::replace(existing, package));
                }
                None => self.resolved.push(package),
            }
        }
        for name in requested.unknown {
            self.push_unknown(name);
        }
        self.diagnostics.extend(requested.diagnostics);
        replaced
    }
}

/// Pick one of several installed distributions exporting the same import name
///
/// In order:
/// 1. a distribution whose normalized name equals the normalized import name
/// 2. the shortest normalized distribution name
/// 3. the lexicographically smallest normalized name
///
/// Depends only on the candidates' names, never on their order.
pub fn choose_ambiguous<'p>(import_name: &str, candidates: &[&'p Package]) -> Option<&'p Package> {
    let wanted = normalize_name(import_name);
    candidates.iter().copied().min_by(|a, b| {
        let (ka, kb) = (a.key(), b.key());
        let exact = (ka != wanted).cmp(&(kb != wanted));
        exact
            .then_with(|| ka.len().cmp(&kb.len()))
            .then_with(|| ka.cmp(&kb))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str) -> Package {
        Package::new(name, "1.0").with_exports(["jwt"])
    }

    #[test]
    fn test_exact_name_wins() {
        let a = pkg("python-jwt");
        let b = pkg("jwt");
        let c = pkg("PyJWT");
        let chosen = choose_ambiguous("jwt", &[&a, &b, &c]).unwrap();
        assert_eq!(chosen.distribution_name, "jwt");
    }

    #[test]
    fn test_shortest_then_lexicographic() {
        let a = pkg("python-jwt");
        let b = pkg("PyJWT");
        let c = pkg("aajwt");
        let chosen = choose_ambiguous("jwt", &[&a, &b, &c]).unwrap();
        assert_eq!(chosen.distribution_name, "aajwt");
    }

    #[test]
    fn test_order_independent() {
        let a = pkg("python-jwt");
        let b = pkg("PyJWT");
        let forward = choose_ambiguous("jwt", &[&a, &b]).unwrap().key();
        let backward = choose_ambiguous("jwt", &[&b, &a]).unwrap().key();
        assert_eq!(forward, backward);
        assert_eq!(forward, "pyjwt");
    }

    #[test]
    fn test_resolution_dedupes_by_key() {
        let mut resolution = Resolution::default();
        assert!(resolution.push_package(Package::new("PyYAML", "6.0")));
        assert!(!resolution.push_package(Package::new("pyyaml", "5.0")));
        assert_eq!(resolution.resolved.len(), 1);
        assert_eq!(resolution.resolved[0].version, "6.0");
    }

    #[test]
    fn test_requested_library_replaces_import_record() {
        let mut resolution = Resolution::default();
        resolution.push_package(Package::new("requests", "2.31.0").with_import_name("requests"));
        resolution.push_package(Package::new("PyYAML", "6.0.1"));

        let mut requested = Resolution::default();
        requested.push_package(Package::new("Requests", "2.0.0"));
        requested.push_package(Package::new("httpx", "0.26.0"));
        requested.push_unknown("no-such-lib");

        let replaced = resolution.merge_requested(requested);

        let summary: Vec<String> = resolution.resolved.iter().map(|p| p.to_string()).collect();
        assert_eq!(summary, vec!["Requests==2.0.0", "PyYAML==6.0.1", "httpx==0.26.0"]);
        assert_eq!(resolution.resolved[0].import_name.as_deref(), Some("requests"));
        assert_eq!(replaced.len(), 1);
        assert_eq!(replaced[0].version, "2.31.0");
        assert_eq!(resolution.unknown, vec!["no-such-lib"]);
    }
}
