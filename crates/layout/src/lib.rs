use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreakError {
    #[error("The element sequence has no legal breakpoint under any pass.")]
    NoLegalBreakpoint,
    #[error("Invalid element sequence at index {index}: {reason}.")]
    InvalidElementSequence { index: usize, reason: String },
    #[error("Breaking needs {found} segments but at most {limit} are allowed.")]
    SegmentLimitExceeded { limit: u32, found: usize },
}

pub mod active;
pub mod config;
pub mod cost;
pub mod hooks;
pub mod measure;
pub mod page;
pub mod paragraph;
pub mod perf;
pub mod relax;
pub mod result;
pub mod search;
pub mod sizes;
pub mod validate;

pub use self::config::{BreakingConfig, DemeritWeights, PageBreakingConfig, Space};
pub use self::hooks::{BreakHooks, Candidate, HookFit, NoHooks};
pub use self::measure::{INFINITE_RATIO, Measure, Totals, adjustment_ratio, measure};
pub use self::page::{Block, FlowBuilder, Footnote, FootnotePiece, Page, PageBreaker, PageFlow, Pagination};
pub use self::paragraph::{ParagraphBuilder, TextAlign};
pub use self::perf::{DebugProfiler, NoOpProfiler, Profiler};
pub use self::relax::Breaker;
pub use self::result::{BreakPass, BreakResult, SearchStats, Segment, SegmentEnd};
pub use self::sizes::{SizeFn, TargetSizes};

// Element model re-exported so consumers need only this crate.
pub use folio_types::{BreakKind, Element, FIL, FitnessClass, INFINITE};

#[cfg(test)]
mod test_utils;
