//! Source file reader
//!
//! Reads one file into a [`SourceModule`]. Failures come back as a
//! diagnostic so the caller can skip the file and keep going.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::notebook::notebook_to_python;
use crate::features::parsing::domain::{SourceKind, SourceModule};
use crate::shared::models::Diagnostic;

const UTF8_BOM: char = '\u{feff}';

/// Read a `.py` or `.ipynb` file
pub fn read_source(path: &Path) -> Result<SourceModule, Diagnostic> {
    let kind = SourceKind::from_path(path).unwrap_or(SourceKind::Python);

    let bytes = fs::read(path).map_err(|e| {
        debug!(path = %path.display(), error = %e, "read failed");
        Diagnostic::unreadable(path, e.to_string())
    })?;

    let text = String::from_utf8(bytes)
        .map_err(|e| Diagnostic::unreadable(path, format!("not valid UTF-8: {}", e.utf8_error())))?;
    let text = match text.strip_prefix(UTF8_BOM) {
        Some(stripped) => stripped.to_string(),
        None => text,
    };

    let text = match kind {
        SourceKind::Python => text,
        SourceKind::Notebook => notebook_to_python(&text)
            .map_err(|reason| Diagnostic::unparsable(path, reason))?,
    };

    Ok(SourceModule::new(path, text).with_kind(kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::DiagnosticKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_and_strips_bom() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "\u{feff}import os\n").unwrap();

        let module = read_source(&path).unwrap();
        assert_eq!(module.text, "import os\n");
        assert_eq!(module.kind, SourceKind::Python);
    }

    #[test]
    fn test_non_utf8_is_unreadable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("latin1.py");
        fs::write(&path, b"# caf\xe9\nimport os\n").unwrap();

        let diag = read_source(&path).unwrap_err();
        assert_eq!(diag.kind, DiagnosticKind::UnreadableSource);
        assert_eq!(diag.file.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let diag = read_source(Path::new("/no/such/file.py")).unwrap_err();
        assert_eq!(diag.kind, DiagnosticKind::UnreadableSource);
    }

    #[test]
    fn test_broken_notebook_is_unparsable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nb.ipynb");
        fs::write(&path, "{ not json").unwrap();

        let diag = read_source(&path).unwrap_err();
        assert_eq!(diag.kind, DiagnosticKind::UnparsableSource);
    }
}
