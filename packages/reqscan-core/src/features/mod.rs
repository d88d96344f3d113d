//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations

pub mod parsing;

pub mod import_extraction;

pub mod stdlib_filter;

// Installed distributions (site-packages, conda)
pub mod inventory;

// Remote package index (PyPI JSON API)
pub mod registry;

pub mod package_resolver;

// Bounded-depth dependency closure
pub mod transitive;

pub mod env_extraction;
