//! Extract env vars use case
//!
//! Same discovery and parsing as import extraction; per-file records merge
//! in file order so "first occurrence" means first in sorted path order.

use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

use crate::features::env_extraction::domain::{EnvScan, EnvVarRecord};
use crate::features::env_extraction::infrastructure::extract_file_env_vars;
use crate::features::parsing::{discover_sources, load_sources, parse_module, SourceModule};
use crate::shared::models::{Diagnostic, Result};

/// Extract environment variables read anywhere under `root`
pub fn extract_env_vars(root: &Path) -> Result<EnvScan> {
    extract_env_vars_with(root, &[], false)
}

/// Extract environment variables with exclusions, optionally from notebooks
pub fn extract_env_vars_with(
    root: &Path,
    exclusions: &[String],
    include_notebooks: bool,
) -> Result<EnvScan> {
    let (sources, mut diagnostics) = discover_sources(root, exclusions, include_notebooks)?;
    let loaded = load_sources(&sources);
    diagnostics.extend(loaded.diagnostics);

    let mut scan = extract_env_vars_from_sources(&loaded.modules);
    diagnostics.append(&mut scan.diagnostics);
    scan.diagnostics = diagnostics;

    info!(
        root = %root.display(),
        files = scan.files_scanned,
        variables = scan.records.len(),
        required = scan.records.iter().filter(|r| r.required).count(),
        "env extraction complete"
    );
    Ok(scan)
}

/// Extract environment variables from already-loaded modules
pub fn extract_env_vars_from_sources(modules: &[SourceModule]) -> EnvScan {
    let per_file: Vec<std::result::Result<Vec<EnvVarRecord>, Diagnostic>> = modules
        .par_iter()
        .map(|module| {
            let tree = parse_module(module)?;
            Ok(extract_file_env_vars(&tree, &module.text, &module.path))
        })
        .collect();

    let mut scan = EnvScan::default();
    for result in per_file {
        match result {
            Ok(records) => {
                scan.files_scanned += 1;
                scan.absorb(records);
            }
            Err(diagnostic) => {
                debug!(diagnostic = %diagnostic, "skipping file");
                scan.diagnostics.push(diagnostic);
            }
        }
    }
    scan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::DiagnosticKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_occurrence_across_files() {
        let modules = vec![
            SourceModule::new("a.py", "import os\nPORT = os.getenv('PORT', '8000')\n"),
            SourceModule::new("b.py", "def broken(:\n"),
            SourceModule::new("c.py", "import os\nPORT = os.environ['PORT']\nKEY = os.environ['KEY']\n"),
        ];

        let scan = extract_env_vars_from_sources(&modules);
        assert_eq!(scan.names(), vec!["PORT", "KEY"]);
        assert_eq!(scan.files_scanned, 2);
        assert_eq!(scan.diagnostics.len(), 1);
        assert_eq!(scan.diagnostics[0].kind, DiagnosticKind::UnparsableSource);

        let port = scan.get("PORT").unwrap();
        assert_eq!(port.file, Path::new("a.py"));
        assert!(!port.required);
        assert_eq!(scan.get("KEY").unwrap().order, 1);
    }

    #[test]
    fn test_extract_from_tree() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("app")).unwrap();
        fs::write(
            dir.path().join("app/config.py"),
            "from os import environ\nDEBUG = environ.get('DEBUG', 'False')\n",
        )
        .unwrap();
        fs::write(dir.path().join("main.py"), "import os\nos.getenv('API_KEY')\n").unwrap();

        let scan = extract_env_vars(dir.path()).unwrap();
        assert_eq!(scan.names(), vec!["DEBUG", "API_KEY"]);
        assert!(scan.get("API_KEY").unwrap().required);
    }
}
