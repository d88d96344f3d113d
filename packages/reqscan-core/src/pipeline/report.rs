//! Scan report

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::features::env_extraction::EnvVarRecord;
use crate::shared::models::{Diagnostic, DiagnosticKind, Package};

/// Everything one scan produced
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    /// Third-party import names after stdlib/local filtering, first-seen order
    pub import_names: Vec<String>,
    /// Imports dropped because a project module of the same name provides them
    pub local_imports: Vec<String>,
    /// Resolved packages in resolution order (closure order with transitive)
    pub packages: Vec<Package>,
    /// Import or library names that resolved nowhere
    pub unknown: Vec<String>,
    /// Populated only when env generation was requested
    pub env_vars: Vec<EnvVarRecord>,
    pub diagnostics: Vec<Diagnostic>,
    /// Dependency cycles seen during transitive expansion
    pub cycles: Vec<Vec<String>>,
    pub files_scanned: usize,
    #[serde(skip)]
    pub duration: Duration,
}

impl ScanReport {
    pub fn package(&self, name: &str) -> Option<&Package> {
        let key = crate::shared::models::normalize_name(name);
        self.packages.iter().find(|p| p.key() == key)
    }

    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}

/// Drop repeated diagnostics, keeping the first of each
///
/// Import and env extraction parse the same files, so a broken file is
/// reported by both.
pub fn dedupe_diagnostics(diagnostics: Vec<Diagnostic>) -> Vec<Diagnostic> {
    let mut seen: HashSet<(DiagnosticKind, String, Option<PathBuf>, Option<u32>)> = HashSet::new();
    diagnostics
        .into_iter()
        .filter(|d| seen.insert((d.kind, d.subject.clone(), d.file.clone(), d.line)))
        .collect()
}
