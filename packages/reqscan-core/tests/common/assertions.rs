//! Custom assertions for test verification

use std::collections::HashSet;

use reqscan_core::shared::models::{Diagnostic, DiagnosticKind, Package};

/// Assert that no two packages share a normalized distribution name
pub fn assert_no_duplicate_packages(packages: &[Package]) {
    let mut seen = HashSet::new();
    for package in packages {
        assert!(
            seen.insert(package.key()),
            "duplicate distribution {} in {:?}",
            package.key(),
            packages.iter().map(|p| &p.distribution_name).collect::<Vec<_>>()
        );
    }
}

/// Assert the number of diagnostics of one kind
pub fn assert_diagnostic_count(diagnostics: &[Diagnostic], kind: DiagnosticKind, expected: usize) {
    let found: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.kind == kind).collect();
    assert_eq!(
        found.len(),
        expected,
        "expected {expected} {} diagnostics, got {:?}",
        kind.as_str(),
        found
    );
}

/// Assert `subset ⊆ superset`
pub fn assert_subset(subset: &[String], superset: &[String]) {
    let superset: HashSet<&String> = superset.iter().collect();
    let missing: Vec<&String> = subset.iter().filter(|n| !superset.contains(n)).collect();
    assert!(missing.is_empty(), "missing from superset: {:?}", missing);
}
