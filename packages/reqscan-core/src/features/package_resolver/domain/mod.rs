//! Package resolver domain

mod override_table;
mod resolution;

pub use override_table::OverrideTable;
pub use resolution::{choose_ambiguous, Resolution};
