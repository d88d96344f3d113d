//! Tree-sitter parsing of a loaded module
//!
//! Tree-sitter always produces a tree; a tree containing ERROR or MISSING
//! nodes is treated as unparsable so half-recovered syntax never yields
//! phantom imports.

use tree_sitter::Tree;

use crate::features::parsing::domain::SourceModule;
use crate::shared::models::Diagnostic;
use crate::shared::utils::tree_sitter::{first_error_line, parse_python};

pub fn parse_module(module: &SourceModule) -> Result<Tree, Diagnostic> {
    let tree = parse_python(&module.text)
        .map_err(|e| Diagnostic::unparsable(&module.path, e.message))?;

    if let Some(line) = first_error_line(&tree) {
        let mut diagnostic = Diagnostic::unparsable(&module.path, "syntax error");
        diagnostic.line = Some(line);
        return Err(diagnostic);
    }
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::DiagnosticKind;

    #[test]
    fn test_valid_module_parses() {
        let module = SourceModule::new("ok.py", "import os\n\ndef f():\n    return 1\n");
        assert!(parse_module(&module).is_ok());
    }

    #[test]
    fn test_syntax_error_is_reported_with_line() {
        let module = SourceModule::new("bad.py", "import os\n\ndef broken(:\n    pass\n");
        let diag = parse_module(&module).unwrap_err();
        assert_eq!(diag.kind, DiagnosticKind::UnparsableSource);
        assert!(diag.line.is_some());
    }
}
