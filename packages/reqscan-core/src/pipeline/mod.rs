//! Scan pipeline and output rendering
//!
//! ## Structure
//! - `scan` - ScanPipeline: extraction → filtering → resolution → expansion
//! - `report` - ScanReport, diagnostic dedupe
//! - `render` - requirements and env file rendering, guarded file output

pub mod render;
pub mod report;
pub mod scan;

pub use render::{render_env, render_requirements, write_output, EnvFileKind, PinStyle};
pub use report::{dedupe_diagnostics, ScanReport};
pub use scan::ScanPipeline;
