//! Standard library filter domain

mod python_version;
mod stdlib_table;

pub use python_version::PythonVersion;
pub use stdlib_table::StdlibTable;
