/*
 * Reqscan Core - Python dependency manifest generator
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Package, Diagnostic, errors), tree-sitter helpers
 * - config/      : ReqscanConfig, ResolutionContext
 * - features/    : Vertical slices (parsing → imports → stdlib filter → resolver → transitive, env vars)
 * - pipeline/    : ScanPipeline orchestration and output rendering
 *
 * Performance:
 * - Rayon work-stealing over source files
 * - Bounded pool for registry lookups
 */

#![allow(clippy::should_implement_trait)] // from_str naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

// ═══════════════════════════════════════════════════════════════════════════
// Module Exports - Feature-First Architecture
// ═══════════════════════════════════════════════════════════════════════════

/// Configuration (defaults → YAML → CLI overrides)
pub mod config;

/// Shared models and utilities
pub mod shared;

/// Feature modules (vertical slices)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

// Re-exports
pub use config::{ReqscanConfig, ResolutionContext, ResolutionMode};
pub use features::env_extraction::{extract_env_vars, EnvVarRecord};
pub use features::import_extraction::{extract_imports, ImportKind, ImportRecord};
pub use features::inventory::{merge_inventories, PackageInventory};
pub use features::package_resolver::PackageResolver;
pub use features::registry::RegistryClient;
pub use features::stdlib_filter::{filter_stdlib, PythonVersion, StdlibTable};
pub use features::transitive::TransitiveResolver;
pub use pipeline::{PinStyle, ScanPipeline, ScanReport};
pub use shared::models::{Diagnostic, DiagnosticKind, Package, ReqscanError, Result};
