//! Source module representation

use std::path::{Path, PathBuf};

use crate::shared::constants::discovery::{NOTEBOOK_EXTENSION, PYTHON_EXTENSION};

/// Kind of source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// `.py` file
    Python,
    /// `.ipynb` notebook, projected to its code cells
    Notebook,
}

impl SourceKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            PYTHON_EXTENSION => Some(SourceKind::Python),
            NOTEBOOK_EXTENSION => Some(SourceKind::Notebook),
            _ => None,
        }
    }
}

/// A source file's text, read once per scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceModule {
    pub path: PathBuf,
    /// Python text (for notebooks: code cells joined by newlines)
    pub text: String,
    pub kind: SourceKind,
}

impl SourceModule {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            kind: SourceKind::Python,
        }
    }

    pub fn with_kind(mut self, kind: SourceKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Files selected for a scan, in deterministic (sorted) order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceSet {
    pub root: PathBuf,
    pub files: Vec<PathBuf>,
    /// Names importable from inside the project itself (module stems and
    /// package directories), in first-seen order
    pub local_modules: Vec<String>,
}

impl SourceSet {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}
