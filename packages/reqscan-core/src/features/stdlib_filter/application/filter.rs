//! Standard library filter

use std::collections::HashSet;
use tracing::debug;

use crate::features::stdlib_filter::domain::StdlibTable;

/// Drop stdlib modules and excluded names, keeping first-seen order
///
/// `exclusions` holds names the user asked to ignore plus the project's own
/// local modules.
pub fn filter_stdlib<S: AsRef<str>>(
    names: &[S],
    table: &StdlibTable,
    exclusions: &[String],
) -> Vec<String> {
    let excluded: HashSet<&str> = exclusions.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();

    let kept: Vec<String> = names
        .iter()
        .map(AsRef::as_ref)
        .filter(|name| !table.contains(name) && !excluded.contains(name))
        .filter(|name| seen.insert(*name))
        .map(str::to_string)
        .collect();

    debug!(input = names.len(), kept = kept.len(), "stdlib filter");
    kept
}
