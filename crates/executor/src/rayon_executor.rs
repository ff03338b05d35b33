//! Rayon-backed executor.

use folio_traits::Executor;
use rayon::prelude::*;

/// Spreads jobs over rayon's global work-stealing pool.
///
/// Each breaking job owns its arena, so jobs never contend with each other.
/// `collect` on an indexed parallel iterator preserves input order, so results
/// line up with the submitted units.
///
/// The pool size is whatever rayon's global pool was configured with
/// (`rayon::ThreadPoolBuilder::build_global` before the first use), which
/// defaults to the number of CPU cores.
#[derive(Debug, Clone)]
pub struct RayonExecutor {
    num_threads: usize,
}

impl RayonExecutor {
    pub fn new() -> Self {
        Self {
            num_threads: rayon::current_num_threads(),
        }
    }
}

impl Default for RayonExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RayonExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_par_iter().map(f).collect()
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        items.into_par_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        self.num_threads
    }

    fn name(&self) -> &'static str {
        "RayonExecutor"
    }
}
