//! `Requires-Dist` parsing
//!
//! Entries carrying an `extra == "..."` marker belong to optional feature
//! sets and are ignored. Other markers are kept; they are not evaluated.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::features::registry::ports::DeclaredDependency;

static REQUIREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*([^;]*?)\s*(?:;\s*(.*))?$")
        .unwrap()
});

static EXTRA_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bextra\s*==").unwrap());

/// Parse one `requires_dist` entry; `None` for optional or malformed entries
pub fn parse_requirement(entry: &str) -> Option<DeclaredDependency> {
    let captures = REQUIREMENT.captures(entry)?;
    if let Some(marker) = captures.get(3) {
        if EXTRA_MARKER.is_match(marker.as_str()) {
            return None;
        }
    }

    let name = captures.get(1)?.as_str();
    let constraint = captures
        .get(2)
        .map(|c| c.as_str().trim().trim_start_matches('(').trim_end_matches(')').trim())
        .unwrap_or("");

    Some(DeclaredDependency::new(name, constraint))
}

/// Parse a whole `requires_dist` list, keeping declaration order
pub fn parse_requirements<S: AsRef<str>>(entries: &[S]) -> Vec<DeclaredDependency> {
    entries
        .iter()
        .filter_map(|e| parse_requirement(e.as_ref()))
        .collect()
}
