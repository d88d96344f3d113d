//! Extract imports use case
//!
//! Discover → load → parse+visit (parallel, per file) → ordered merge.

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

use crate::features::import_extraction::domain::ImportScan;
use crate::features::import_extraction::infrastructure::{extract_file_imports, FileImports};
use crate::features::parsing::{discover_sources, load_sources, parse_module, SourceModule};
use crate::shared::models::{Diagnostic, Result};

/// Extract imports from a file or directory tree (`.py` files only)
pub fn extract_imports(root: &Path, exclusions: &[String]) -> Result<ImportScan> {
    extract_imports_with(root, exclusions, false)
}

/// Extract imports, optionally scanning notebooks too
pub fn extract_imports_with(
    root: &Path,
    exclusions: &[String],
    include_notebooks: bool,
) -> Result<ImportScan> {
    let (sources, mut diagnostics) = discover_sources(root, exclusions, include_notebooks)?;
    let loaded = load_sources(&sources);
    diagnostics.extend(loaded.diagnostics);

    let mut scan = extract_imports_from_sources(&loaded.modules);
    diagnostics.append(&mut scan.diagnostics);
    scan.diagnostics = diagnostics;
    scan.local_modules = sources.local_modules;

    info!(
        root = %root.display(),
        files = scan.files_scanned,
        records = scan.records.len(),
        diagnostics = scan.diagnostics.len(),
        "import extraction complete"
    );
    Ok(scan)
}

/// Extract imports from already-loaded modules
///
/// Files are parsed in parallel; results merge in input order.
pub fn extract_imports_from_sources(modules: &[SourceModule]) -> ImportScan {
    let per_file: Vec<std::result::Result<FileImports, Diagnostic>> = modules
        .par_iter()
        .map(|module| {
            let tree = parse_module(module)?;
            Ok(extract_file_imports(&tree, &module.text, &module.path))
        })
        .collect();

    let mut scan = ImportScan::default();
    for result in per_file {
        match result {
            Ok(mut file) => {
                scan.files_scanned += 1;
                scan.records.append(&mut file.records);
                scan.diagnostics.append(&mut file.diagnostics);
            }
            Err(diagnostic) => {
                debug!(diagnostic = %diagnostic, "skipping file");
                scan.diagnostics.push(diagnostic);
            }
        }
    }
    scan
}
