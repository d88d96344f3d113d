//! Import-name override table
//!
//! Curated mismatches between what code imports and what is published
//! (`PIL` is installed as `Pillow`). Shipped as data, extendable from config.

use std::collections::{BTreeMap, HashMap};

const BUILTIN_MAPPING: &str = include_str!("../../../../data/import_mapping.txt");

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideTable {
    entries: HashMap<String, String>,
}

impl OverrideTable {
    /// Table without any entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// The shipped mapping
    pub fn builtin() -> Self {
        let entries = BUILTIN_MAPPING
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once(':'))
            .map(|(import, dist)| (import.trim().to_string(), dist.trim().to_string()))
            .collect();
        Self { entries }
    }

    /// Add (or replace) entries; config overrides go through here
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (import, dist) in overrides {
            self.entries.insert(import.clone(), dist.clone());
        }
        self
    }

    pub fn insert(&mut self, import_name: impl Into<String>, distribution: impl Into<String>) {
        self.entries.insert(import_name.into(), distribution.into());
    }

    /// Distribution name for an import name (exact, case-sensitive match)
    pub fn get(&self, import_name: &str) -> Option<&str> {
        self.entries.get(import_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
