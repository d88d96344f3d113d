//! Version-keyed standard library table
//!
//! Baseline data (3.8) plus the additions and removals of each later release.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::python_version::PythonVersion;
use crate::shared::models::{ReqscanError, Result};

const BASELINE: &str = include_str!("../../../../data/stdlib_baseline.txt");
const BASELINE_VERSION: PythonVersion = PythonVersion::new(3, 8);

struct ReleaseDelta {
    version: PythonVersion,
    added: &'static [&'static str],
    removed: &'static [&'static str],
}

const RELEASES: &[ReleaseDelta] = &[
    ReleaseDelta {
        version: PythonVersion::new(3, 9),
        added: &["graphlib", "zoneinfo", "_zoneinfo"],
        removed: &["dummy_threading", "_dummy_thread"],
    },
    ReleaseDelta {
        version: PythonVersion::new(3, 10),
        added: &[],
        removed: &["formatter", "parser", "symbol", "_bootlocale"],
    },
    ReleaseDelta {
        version: PythonVersion::new(3, 11),
        added: &["tomllib"],
        removed: &["binhex"],
    },
    ReleaseDelta {
        version: PythonVersion::new(3, 12),
        added: &[],
        removed: &["distutils", "imp", "asynchat", "asyncore", "smtpd"],
    },
    ReleaseDelta {
        version: PythonVersion::new(3, 13),
        added: &["_colorize", "_pyrepl"],
        removed: &[
            "aifc", "audioop", "cgi", "cgitb", "chunk", "crypt", "imghdr", "mailcap", "msilib",
            "nis", "nntplib", "ossaudiodev", "pipes", "sndhdr", "spwd", "sunau", "telnetlib", "uu",
            "xdrlib", "lib2to3", "_crypt", "_msi",
        ],
    },
    ReleaseDelta {
        version: PythonVersion::new(3, 14),
        added: &["annotationlib", "compression"],
        removed: &[],
    },
];

/// Set of top-level module names shipped with the interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StdlibTable {
    modules: HashSet<String>,
}

impl StdlibTable {
    /// Table for a target release
    ///
    /// Releases older than the baseline use the baseline; releases newer
    /// than the last known delta use the newest table.
    pub fn for_version(version: PythonVersion) -> Self {
        let mut modules = parse_module_list(BASELINE);
        for release in RELEASES.iter().filter(|r| r.version <= version) {
            debug_assert!(release.version > BASELINE_VERSION);
            for name in release.added {
                modules.insert((*name).to_string());
            }
            for name in release.removed {
                modules.remove(*name);
            }
        }
        Self { modules }
    }

    /// Custom table, one module per line (`#` comments allowed)
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            ReqscanError::config(format!("cannot read stdlib table: {}", e))
                .with_file(path.display().to_string())
                .with_source(e)
        })?;
        Ok(Self {
            modules: parse_module_list(&text),
        })
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            modules: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Default for StdlibTable {
    fn default() -> Self {
        Self::for_version(PythonVersion::default())
    }
}

fn parse_module_list(text: &str) -> HashSet<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
