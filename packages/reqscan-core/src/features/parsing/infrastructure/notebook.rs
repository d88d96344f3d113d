//! Notebook projection
//!
//! An `.ipynb` file is scanned as the concatenation of its code cells.
//! IPython magics and shell escapes are blanked so they neither break the
//! parser nor shift line numbers within a cell.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Notebook {
    #[serde(default)]
    cells: Vec<Cell>,
}

#[derive(Debug, Deserialize)]
struct Cell {
    cell_type: String,
    #[serde(default)]
    source: CellSource,
}

/// nbformat allows either one string or a list of lines
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CellSource {
    Text(String),
    Lines(Vec<String>),
}

impl Default for CellSource {
    fn default() -> Self {
        CellSource::Text(String::new())
    }
}

impl CellSource {
    fn text(&self) -> String {
        match self {
            CellSource::Text(text) => text.clone(),
            CellSource::Lines(lines) => lines.concat(),
        }
    }
}

/// Join a notebook's code cells into one Python text
pub fn notebook_to_python(json: &str) -> Result<String, String> {
    let notebook: Notebook =
        serde_json::from_str(json).map_err(|e| format!("invalid notebook JSON: {}", e))?;

    let mut out = String::new();
    for cell in notebook.cells.iter().filter(|c| c.cell_type == "code") {
        for line in cell.source.text().lines() {
            let trimmed = line.trim_start();
            if !(trimmed.starts_with('%') || trimmed.starts_with('!')) {
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_code_cells_are_kept() {
        let json = r#"{
            "cells": [
                {"cell_type": "markdown", "source": ["import not_code\n"]},
                {"cell_type": "code", "source": ["import pandas as pd\n", "%matplotlib inline\n"]},
                {"cell_type": "code", "source": "!pip install rich\nimport rich"}
            ],
            "nbformat": 4
        }"#;

        let text = notebook_to_python(json).unwrap();
        assert!(text.contains("import pandas as pd"));
        assert!(text.contains("import rich"));
        assert!(!text.contains("not_code"));
        assert!(!text.contains("matplotlib"));
        assert!(!text.contains("pip install"));
    }

    #[test]
    fn test_empty_notebook() {
        assert_eq!(notebook_to_python("{}").unwrap(), "");
    }

    #[test]
    fn test_invalid_json() {
        assert!(notebook_to_python("[1, 2").is_err());
    }
}
