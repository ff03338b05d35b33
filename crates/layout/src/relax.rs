//! The relaxation controller.
//!
//! Runs the search with a strict tolerance, then a loosened one, then with
//! every box boundary legal and restarts enabled. The last pass always
//! produces a result; the pass that succeeded is reported on it.

use crate::BreakError;
use crate::config::BreakingConfig;
use crate::hooks::{BreakHooks, NoHooks};
use crate::perf::{Profiler, default_profiler};
use crate::result::{BreakPass, BreakResult, SearchStats};
use crate::search::{BreakingAlgorithm, PassOutcome, SearchParams};
use crate::sizes::TargetSizes;
use crate::validate::validate;
use folio_types::Element;
use std::sync::Arc;

const PASSES: [BreakPass; 3] = [
    BreakPass::Strict,
    BreakPass::Loosened,
    BreakPass::ForceEverywhere,
];

#[derive(Debug)]
pub struct Breaker {
    config: BreakingConfig,
    profiler: Arc<dyn Profiler>,
}

impl Breaker {
    pub fn new(config: BreakingConfig) -> Self {
        Self::with_profiler(config, default_profiler())
    }

    /// Records into `profiler`, which may be shared with other breakers.
    pub fn with_profiler(config: BreakingConfig, profiler: Arc<dyn Profiler>) -> Self {
        Self { config, profiler }
    }

    pub fn config(&self) -> &BreakingConfig {
        &self.config
    }

    pub fn profiler(&self) -> &Arc<dyn Profiler> {
        &self.profiler
    }

    /// Breaks `seq` into segments of the given target sizes.
    pub fn break_lines<T>(&self, seq: &[Element], sizes: &T) -> Result<BreakResult, BreakError>
    where
        T: TargetSizes + ?Sized,
    {
        self.run_with_hooks(seq, sizes, &NoHooks).map(|(result, _)| result)
    }

    /// Breaks `seq` with search hooks. Also returns the hook state after each
    /// segment.
    pub fn run_with_hooks<H, T>(
        &self,
        seq: &[Element],
        sizes: &T,
        hooks: &H,
    ) -> Result<(BreakResult, Vec<H::State>), BreakError>
    where
        H: BreakHooks,
        T: TargetSizes + ?Sized,
    {
        if seq.is_empty() {
            return Err(BreakError::NoLegalBreakpoint);
        }
        validate(seq)?;
        self.profiler.count_run();

        let algorithm = BreakingAlgorithm::new(seq, sizes, hooks, &self.config);
        let mut stats = SearchStats::default();

        for pass in PASSES {
            let params = SearchParams::for_pass(pass, &self.config);
            let outcome = self.timed_pass(&algorithm, &params);
            stats.absorb(&outcome.stats);
            self.profiler.count("nodes_created", outcome.stats.nodes_created);

            let Some((mut result, states)) = outcome.found else {
                continue;
            };
            result.stats = stats;

            if pass == BreakPass::ForceEverywhere {
                if let Some(limit) = self.config.max_segments {
                    if result.len() > limit as usize {
                        return Err(BreakError::SegmentLimitExceeded {
                            limit,
                            found: result.len(),
                        });
                    }
                }
                log::warn!(
                    "Degraded breaking of {} elements: {} segments, {} overfull, {} restarts",
                    seq.len(),
                    result.len(),
                    result.segments.iter().filter(|s| s.overfull).count(),
                    result.stats.restarts
                );
                self.profiler.count("degraded", 1);
                return Ok((result, states));
            }

            if self.acceptable(&result) {
                log::debug!(
                    "{:?} pass broke {} elements into {} segments (demerits {:.1})",
                    pass,
                    seq.len(),
                    result.len(),
                    result.total_demerits
                );
                return Ok((result, states));
            }
            log::debug!("{:?} pass result rejected, worst ratio {:?}", pass, result.worst_natural_ratio());
        }

        Err(BreakError::NoLegalBreakpoint)
    }

    /// Greedy breaking, reported as [`BreakPass::FirstFit`].
    pub fn first_fit<T>(&self, seq: &[Element], sizes: &T) -> Result<BreakResult, BreakError>
    where
        T: TargetSizes + ?Sized,
    {
        if seq.is_empty() {
            return Err(BreakError::NoLegalBreakpoint);
        }
        validate(seq)?;
        self.profiler.count_run();
        BreakingAlgorithm::new(seq, sizes, &NoHooks, &self.config)
            .first_fit()
            .map(|(result, _)| result)
            .ok_or(BreakError::NoLegalBreakpoint)
    }

    fn acceptable(&self, result: &BreakResult) -> bool {
        if let Some(limit) = self.config.max_segments {
            if result.len() > limit as usize {
                return false;
            }
        }
        match (self.config.acceptable_ratio, result.worst_natural_ratio()) {
            (Some(bound), Some(worst)) => worst <= bound,
            _ => true,
        }
    }

    fn timed_pass<H, T>(
        &self,
        algorithm: &BreakingAlgorithm<'_, H, T>,
        params: &SearchParams,
    ) -> PassOutcome<H::State>
    where
        H: BreakHooks,
        T: TargetSizes + ?Sized,
    {
        #[cfg(feature = "profiling")]
        let started = instant::Instant::now();

        let outcome = algorithm.run(params);

        #[cfg(feature = "profiling")]
        self.profiler.record(&format!("{:?}", params.pass), started.elapsed());

        outcome
    }
}

impl Default for Breaker {
    fn default() -> Self {
        Self::new(BreakingConfig::default())
    }
}
