//! Result of a transitive expansion

use crate::shared::models::{Diagnostic, Package};

#[derive(Debug, Default)]
pub struct Expansion {
    /// Seeds first, then discovered packages in breadth-first order
    pub packages: Vec<Package>,
    pub diagnostics: Vec<Diagnostic>,
    /// Dependency cycles among closure members (sorted member names)
    pub cycles: Vec<Vec<String>>,
}

impl Expansion {
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.packages
            .iter()
            .map(|p| p.distribution_name.as_str())
            .collect()
    }
}
