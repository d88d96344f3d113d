//! Import records and scan results

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use crate::shared::models::Diagnostic;

/// How an import was written
///
/// When several apply to one occurrence the most specific wins:
/// `DynamicLiteral` > `Conditional` > `Late` > `Static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
    /// Top-level `import x` / `from x import y`
    Static,
    /// `importlib.import_module` / `__import__` with a constant name
    DynamicLiteral,
    /// Same call with a name that is not a constant expression
    DynamicUnresolvable,
    /// Inside a `try` guarded by `except ImportError` (or equivalent)
    Conditional,
    /// Inside a function body
    Late,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Static => "static",
            ImportKind::DynamicLiteral => "dynamic-literal",
            ImportKind::DynamicUnresolvable => "dynamic-unresolvable",
            ImportKind::Conditional => "conditional",
            ImportKind::Late => "late",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One import occurrence
///
/// For `DynamicUnresolvable` records `module_root_name` holds the source text
/// of the argument expression instead of a module name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ImportRecord {
    pub module_root_name: String,
    pub kind: ImportKind,
    pub file: PathBuf,
    pub line: u32,
}

impl ImportRecord {
    pub fn new(module_root_name: impl Into<String>, kind: ImportKind, file: impl Into<PathBuf>, line: u32) -> Self {
        Self {
            module_root_name: module_root_name.into(),
            kind,
            file: file.into(),
            line,
        }
    }

    pub fn is_resolvable(&self) -> bool {
        self.kind != ImportKind::DynamicUnresolvable
    }
}

/// Result of one extraction run
#[derive(Debug, Clone, Default)]
pub struct ImportScan {
    /// Unique per (file, line, root), in file order then source order
    pub records: Vec<ImportRecord>,
    /// Modules provided by the scanned project itself
    pub local_modules: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
}

impl ImportScan {
    /// Distinct root module names, first-seen order, unresolvable records excluded
    pub fn module_names(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .filter(|r| r.is_resolvable())
            .filter(|r| seen.insert(r.module_root_name.as_str()))
            .map(|r| r.module_root_name.clone())
            .collect()
    }

    pub fn records_of_kind(&self, kind: ImportKind) -> impl Iterator<Item = &ImportRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_names_dedupe_and_skip_unresolvable() {
        let scan = ImportScan {
            records: vec![
                ImportRecord::new("requests", ImportKind::Static, "a.py", 1),
                ImportRecord::new("name + x", ImportKind::DynamicUnresolvable, "a.py", 2),
                ImportRecord::new("numpy", ImportKind::Late, "a.py", 5),
                ImportRecord::new("requests", ImportKind::Static, "b.py", 1),
            ],
            ..Default::default()
        };
        assert_eq!(scan.module_names(), vec!["requests", "numpy"]);
        assert_eq!(scan.records_of_kind(ImportKind::Static).count(), 2);
    }
}
