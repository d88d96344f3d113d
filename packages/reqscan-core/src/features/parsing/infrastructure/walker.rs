//! Source discovery
//!
//! Walks a file or directory with walkdir in sorted order, so every run over an
//! unchanged tree visits the same files in the same order.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::features::parsing::domain::{SourceKind, SourceSet};
use crate::shared::constants::discovery::{IGNORED_DIRS, IGNORED_DIR_SUFFIXES};
use crate::shared::models::{Diagnostic, ReqscanError, Result};

/// User exclusions plus the built-in ignore list
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    /// Bare names, matched against any path component
    names: HashSet<String>,
    /// Absolute or root-joined path prefixes
    paths: Vec<PathBuf>,
}

impl ExclusionSet {
    pub fn new(root: &Path, exclusions: &[String]) -> Self {
        let mut names = HashSet::new();
        let mut paths = Vec::new();

        for entry in exclusions {
            let entry = entry.trim().trim_end_matches(['/', '\\']);
            if entry.is_empty() {
                continue;
            }
            if entry.contains('/') || entry.contains('\\') {
                let path = Path::new(entry);
                paths.push(if path.is_absolute() {
                    path.to_path_buf()
                } else {
                    root.join(path)
                });
            } else {
                names.insert(entry.to_string());
            }
        }

        Self { names, paths }
    }

    pub fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self.names.contains(name.as_ref()) {
            return true;
        }
        if is_dir
            && (IGNORED_DIRS.contains(&name.as_ref())
                || IGNORED_DIR_SUFFIXES.iter().any(|s| name.ends_with(s)))
        {
            return true;
        }
        self.paths.iter().any(|prefix| path.starts_with(prefix))
    }
}

/// Discover the files to scan under `root`
///
/// Fatal: `root` missing, or nothing to scan. Unwalkable entries (permission
/// errors, broken links) become diagnostics.
pub fn discover_sources(
    root: &Path,
    exclusions: &[String],
    include_notebooks: bool,
) -> Result<(SourceSet, Vec<Diagnostic>)> {
    if !root.exists() {
        return Err(ReqscanError::root_not_found(root.display().to_string()));
    }

    let exclusion_set = ExclusionSet::new(root, exclusions);
    let mut files = Vec::new();
    let mut diagnostics = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !exclusion_set.is_excluded(e.path(), e.file_type().is_dir()));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                warn!(path = %path.display(), error = %err, "skipping unwalkable entry");
                diagnostics.push(Diagnostic::unreadable(&path, err.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }
        match SourceKind::from_path(entry.path()) {
            Some(SourceKind::Python) => files.push(entry.into_path()),
            Some(SourceKind::Notebook) if include_notebooks => files.push(entry.into_path()),
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(ReqscanError::no_source_files(root.display().to_string()));
    }

    let local_modules = collect_local_modules(root, &files);
    debug!(
        root = %root.display(),
        files = files.len(),
        local_modules = local_modules.len(),
        "discovered sources"
    );

    Ok((
        SourceSet {
            root: root.to_path_buf(),
            files,
            local_modules,
        },
        diagnostics,
    ))
}

/// Module names the project itself provides
///
/// Every directory between the root and a `.py` file is a (namespace) package,
/// and every `.py` stem is a module.
fn collect_local_modules(root: &Path, files: &[PathBuf]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut modules = Vec::new();

    for file in files {
        if SourceKind::from_path(file) != Some(SourceKind::Python) {
            continue;
        }
        let relative = file.strip_prefix(root).unwrap_or(file);

        let dirs = relative
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .filter_map(|c| match c {
                Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
                _ => None,
            });
        let stem = file
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .filter(|s| !(s.starts_with("__") && s.ends_with("__")));

        for name in dirs.chain(stem) {
            if seen.insert(name.clone()) {
                modules.push(name);
            }
        }
    }

    modules
}
