//! Centralized Configuration Constants
//!
//! Defaults and tunable limits used across features.

/// Thread pool configuration
pub mod thread_pool {
    /// Percentage of available CPU cores used for file parsing
    pub const CPU_UTILIZATION_PERCENT: f64 = 0.75;

    /// Minimum number of threads (always use at least 1)
    pub const MIN_THREADS: usize = 1;
}

/// Source discovery
pub mod discovery {
    /// Directory names never descended into
    pub const IGNORED_DIRS: &[&str] = &[
        ".git",
        ".hg",
        ".svn",
        ".tox",
        ".nox",
        ".mypy_cache",
        ".pytest_cache",
        "__pycache__",
        "node_modules",
        "venv",
        ".venv",
        "env",
        ".env",
        "site-packages",
        "build",
        "dist",
    ];

    /// Directory name suffixes never descended into
    pub const IGNORED_DIR_SUFFIXES: &[&str] = &[".egg-info", ".dist-info"];

    /// Python source extension
    pub const PYTHON_EXTENSION: &str = "py";

    /// Jupyter notebook extension
    pub const NOTEBOOK_EXTENSION: &str = "ipynb";
}

/// Registry client
pub mod registry {
    /// PyPI JSON API base URL
    pub const DEFAULT_INDEX_URL: &str = "https://pypi.org/pypi";

    /// Per-request timeout
    pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

    /// Concurrent lookups in flight
    pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

    pub const USER_AGENT: &str = concat!("reqscan/", env!("CARGO_PKG_VERSION"));
}

/// Resolution limits
pub mod resolution {
    /// Default transitive depth (0 = no expansion)
    pub const DEFAULT_MAX_DEPTH: usize = 0;

    /// Hard ceiling on transitive depth
    pub const MAX_DEPTH_LIMIT: usize = 10;
}
