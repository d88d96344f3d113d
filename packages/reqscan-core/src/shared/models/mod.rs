//! Shared models

mod diagnostic;
mod error;
mod package;

pub use diagnostic::{count_kind, Diagnostic, DiagnosticKind};
pub use error::{ErrorKind, ReqscanError, Result};
pub use package::{normalize_name, Package, PackageOrigin, UNKNOWN_VERSION};
