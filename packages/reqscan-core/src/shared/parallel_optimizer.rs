//! Bounded Rayon pools
//!
//! Two workloads run in parallel:
//! - file parsing (CPU-bound, sized from the core count)
//! - registry lookups (I/O-bound, sized from the configured in-flight limit)
//!
//! Both return results in input order so callers merge them with a single
//! writer afterwards.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::shared::constants::thread_pool::{CPU_UTILIZATION_PERCENT, MIN_THREADS};
use crate::shared::models::Result;

/// Worker count for CPU-bound work (75% of cores)
pub fn cpu_workers() -> usize {
    let num_cpus = num_cpus::get();
    ((num_cpus as f64 * CPU_UTILIZATION_PERCENT) as usize).max(MIN_THREADS)
}

/// Build a dedicated pool with at most `threads` workers
pub fn bounded_pool(threads: usize) -> Result<ThreadPool> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads.max(MIN_THREADS))
        .thread_name(|i| format!("reqscan-worker-{}", i))
        .build()?;
    Ok(pool)
}

/// Map `items` on `pool`, preserving input order
pub fn ordered_map<T, R, F>(pool: &ThreadPool, items: &[T], f: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    pool.install(|| items.par_iter().map(|item| f(item)).collect())
}
