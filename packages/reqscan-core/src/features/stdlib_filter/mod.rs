//! Standard Library Filter Feature
//!
//! Removes interpreter-provided modules and the project's own modules from
//! the extracted names. The stdlib table is data keyed by target version.

pub mod application;
pub mod domain;

pub use application::filter_stdlib;
pub use domain::{PythonVersion, StdlibTable};
