//! Import Extraction Feature
//!
//! Finds every module a program depends on: static imports, constant-folded
//! `importlib`/`__import__` calls, function-local imports and imports guarded
//! by `try/except ImportError`.
//!
//! ## Structure
//! - `domain/` - ImportKind, ImportRecord, ImportScan
//! - `infrastructure/` - alias prepass, constant folding, tree visitor
//! - `application/` - extract_imports

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{extract_imports, extract_imports_from_sources, extract_imports_with};
pub use domain::{ImportKind, ImportRecord, ImportScan};
