//! Import extraction domain models

mod import_record;

pub use import_record::{ImportKind, ImportRecord, ImportScan};
