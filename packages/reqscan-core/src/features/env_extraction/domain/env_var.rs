//! Environment variable records

use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::shared::models::Diagnostic;

/// One environment variable read by the scanned code
///
/// Identity is `name`; the first occurrence in the tree determines the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvVarRecord {
    pub name: String,
    /// First literal default seen at the deciding access, if any
    pub default: Option<String>,
    /// No default and no fallback: the program fails without it
    pub required: bool,
    /// Position in first-seen order across the whole scan
    pub order: usize,
    pub file: PathBuf,
    pub line: u32,
}

impl EnvVarRecord {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
            required: true,
            order: 0,
            file: PathBuf::new(),
            line: 0,
        }
    }

    pub fn optional(name: impl Into<String>, default: Option<String>) -> Self {
        Self {
            default,
            required: false,
            ..Self::required(name)
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }
}

/// Result of an env-var scan
#[derive(Debug, Default)]
pub struct EnvScan {
    pub records: Vec<EnvVarRecord>,
    pub diagnostics: Vec<Diagnostic>,
    pub files_scanned: usize,
}

impl EnvScan {
    /// Append records, keeping only names not seen yet, and renumber `order`
    pub fn absorb(&mut self, records: Vec<EnvVarRecord>) {
        let mut seen: HashSet<String> = self.records.iter().map(|r| r.name.clone()).collect();
        for mut record in records {
            if seen.insert(record.name.clone()) {
                record.order = self.records.len();
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&EnvVarRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.name.as_str()).collect()
    }
}
