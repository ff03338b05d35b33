//! Executor seam for running independent breaking jobs.
//!
//! A single optimization run is synchronous and owns its own arena, so a batch
//! of paragraphs or page flows can be spread across threads without any
//! coordination. This trait lets callers pick how that happens.

use std::fmt::Debug;

/// Runs a batch of independent jobs, possibly in parallel.
///
/// Results are always returned in input order, whatever the scheduling.
///
/// # Implementations
///
/// - `SyncExecutor`: runs jobs one after another on the calling thread
/// - `RayonExecutor`: work-stealing thread pool (in `folio-executor`)
pub trait Executor: Send + Sync + Debug {
    /// Apply `f` to every item and collect the results in input order.
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static;

    /// Like [`Executor::execute_all`] for jobs that can fail. One failure does
    /// not stop the other jobs.
    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static;

    /// Number of jobs that may run at once. 1 for sequential executors.
    fn parallelism(&self) -> usize;

    /// Human-readable name, for logs.
    fn name(&self) -> &'static str;
}

/// Runs every job on the calling thread.
#[derive(Debug, Clone, Default)]
pub struct SyncExecutor;

impl SyncExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Executor for SyncExecutor {
    fn execute_all<T, R, F>(&self, items: Vec<T>, f: F) -> Vec<R>
    where
        T: Send + 'static,
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn execute_all_fallible<T, R, E, F>(&self, items: Vec<T>, f: F) -> Vec<Result<R, E>>
    where
        T: Send + 'static,
        R: Send + 'static,
        E: Send + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + Clone + 'static,
    {
        items.into_iter().map(f).collect()
    }

    fn parallelism(&self) -> usize {
        1
    }

    fn name(&self) -> &'static str {
        "SyncExecutor"
    }
}
