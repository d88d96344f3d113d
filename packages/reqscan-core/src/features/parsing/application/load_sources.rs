//! Load sources use case
//!
//! Reads every discovered file in parallel. Results come back in file order,
//! so the diagnostics list and module list are identical across runs.

use rayon::prelude::*;
use tracing::debug;

use crate::features::parsing::domain::{SourceModule, SourceSet};
use crate::features::parsing::infrastructure::read_source;
use crate::shared::models::Diagnostic;

/// Files that loaded, plus one diagnostic per file that did not
#[derive(Debug, Default)]
pub struct LoadedSources {
    pub modules: Vec<SourceModule>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn load_sources(set: &SourceSet) -> LoadedSources {
    let results: Vec<_> = set.files.par_iter().map(|path| read_source(path)).collect();

    let mut loaded = LoadedSources::default();
    for result in results {
        match result {
            Ok(module) => loaded.modules.push(module),
            Err(diagnostic) => loaded.diagnostics.push(diagnostic),
        }
    }

    debug!(
        loaded = loaded.modules.len(),
        skipped = loaded.diagnostics.len(),
        "loaded sources"
    );
    loaded
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_keeps_file_order_and_skips_bad_files() {
        let dir = TempDir::new().unwrap();
        let files: Vec<_> = ["a.py", "b.py", "c.py"]
            .iter()
            .map(|name| dir.path().join(name))
            .collect();
        fs::write(&files[0], "import a").unwrap();
        fs::write(&files[1], b"\xff\xfe").unwrap();
        fs::write(&files[2], "import c").unwrap();

        let set = SourceSet {
            root: dir.path().to_path_buf(),
            files: files.clone(),
            local_modules: vec![],
        };
        let loaded = load_sources(&set);

        assert_eq!(loaded.modules.len(), 2);
        assert_eq!(loaded.modules[0].path, files[0]);
        assert_eq!(loaded.modules[1].path, files[2]);
        assert_eq!(loaded.diagnostics.len(), 1);
    }
}
