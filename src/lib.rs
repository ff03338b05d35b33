//! Optimal line and page breaking.
//!
//! The engine lives in [`folio_layout`]; this crate runs it over batches of
//! paragraphs and page flows, reads JSON jobs and backs the `folio` binary.
//!
//! ```no_run
//! use folio::{Typesetter, ParagraphBuilder};
//!
//! let paragraph = ParagraphBuilder::new("a few words to set", |s| s.len() as i32 * 6);
//! let results = Typesetter::default().break_all(vec![paragraph], 120);
//! ```

mod error;
pub mod job;

pub use error::FolioError;
pub use folio_executor::{Executor, ExecutorImpl, SyncExecutor};
pub use folio_layout::*;
pub use folio_traits::{ElementSource, SourceError};

use std::sync::Arc;

/// How each unit is broken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Strategy {
    /// Minimum total demerits, relaxing as needed.
    #[default]
    Optimal,
    /// Greedy, one segment at a time.
    FirstFit,
}

/// Breaks batches of independent units on an executor.
///
/// Every unit gets its own run, so results never depend on how the executor
/// schedules them.
#[derive(Debug, Clone)]
pub struct Typesetter {
    config: BreakingConfig,
    page_config: PageBreakingConfig,
    executor: ExecutorImpl,
    strategy: Strategy,
    profiler: Arc<dyn Profiler>,
}

impl Typesetter {
    pub fn new(config: BreakingConfig) -> Self {
        Self {
            config,
            page_config: PageBreakingConfig {
                breaking: config,
                ..PageBreakingConfig::default()
            },
            executor: ExecutorImpl::default(),
            strategy: Strategy::Optimal,
            profiler: folio_layout::perf::default_profiler(),
        }
    }

    pub fn with_executor(mut self, executor: ExecutorImpl) -> Self {
        self.executor = executor;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Profiler shared by every unit of a batch. Its summary is logged after
    /// each batch.
    pub fn with_profiler(mut self, profiler: Arc<dyn Profiler>) -> Self {
        self.profiler = profiler;
        self
    }

    /// Footnote settings for [`Typesetter::paginate_all`]. The breaking
    /// settings stay those given to [`Typesetter::new`].
    pub fn with_page_config(mut self, page_config: PageBreakingConfig) -> Self {
        self.page_config = PageBreakingConfig {
            breaking: self.config,
            ..page_config
        };
        self
    }

    pub fn config(&self) -> &BreakingConfig {
        &self.config
    }

    pub fn page_config(&self) -> &PageBreakingConfig {
        &self.page_config
    }

    pub fn executor(&self) -> &ExecutorImpl {
        &self.executor
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn profiler(&self) -> &Arc<dyn Profiler> {
        &self.profiler
    }

    /// Breaks every source into segments of `sizes`. Results come back in
    /// input order; one failing unit does not affect the others.
    pub fn break_all<S, T>(&self, sources: Vec<S>, sizes: T) -> Vec<Result<BreakResult, FolioError>>
    where
        S: ElementSource + Send + 'static,
        T: TargetSizes + Send + Sync + 'static,
    {
        let config = self.config;
        let strategy = self.strategy;
        let profiler = Arc::clone(&self.profiler);
        let sizes = Arc::new(sizes);
        log::debug!(
            "Breaking {} units on {} ({} workers)",
            sources.len(),
            self.executor.name(),
            self.executor.parallelism()
        );

        let results = self.executor.execute_all_fallible(sources, move |source: S| {
            let seq = source.elements()?;
            let breaker = Breaker::with_profiler(config, Arc::clone(&profiler));
            let result = match strategy {
                Strategy::Optimal => breaker.break_lines(&seq, &*sizes),
                Strategy::FirstFit => breaker.first_fit(&seq, &*sizes),
            };
            result.map_err(|err| {
                log::warn!("Cannot break '{}': {}", source.label(), err);
                FolioError::from(err)
            })
        });
        self.profiler.log_summary("break_all");
        results
    }

    /// Paginates every flow into pages of `sizes`, in input order.
    pub fn paginate_all<T>(&self, flows: Vec<PageFlow>, sizes: T) -> Vec<Result<Pagination, FolioError>>
    where
        T: TargetSizes + Send + Sync + 'static,
    {
        let page_config = self.page_config;
        let profiler = Arc::clone(&self.profiler);
        let sizes = Arc::new(sizes);
        let results = self.executor.execute_all_fallible(flows, move |flow: PageFlow| {
            PageBreaker::with_profiler(page_config, Arc::clone(&profiler))
                .paginate(&flow, &*sizes)
                .map_err(FolioError::from)
        });
        self.profiler.log_summary("paginate_all");
        results
    }
}

impl Default for Typesetter {
    fn default() -> Self {
        Self::new(BreakingConfig::default())
    }
}
