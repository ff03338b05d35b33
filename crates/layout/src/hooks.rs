//! Extension seam of the breakpoint search.
//!
//! Page breaking adds material to a page that is not part of the element
//! sequence (footnotes). Hooks see every candidate segment, may add to its
//! measure and demerits, and carry a small state along each path.

use crate::active::ActiveNode;
use crate::measure::Measure;
use folio_types::BreakKind;
use std::fmt::Debug;

/// A segment the search is about to evaluate.
#[derive(Debug)]
pub struct Candidate<'a, S> {
    /// The node the segment starts from.
    pub from: &'a ActiveNode<S>,
    pub break_index: usize,
    pub kind: BreakKind,
    /// Measure of the segment's own elements, penalty width included.
    pub natural: Measure,
    pub target: i32,
    /// The legal breakpoint considered just before this one.
    pub previous_break: usize,
    /// No legal breakpoint lies between `from` and this break.
    pub first_after_from: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HookFit<S> {
    /// Added to the segment's natural measure before the ratio is computed.
    pub extra: Measure,
    /// Added to the segment's demerits.
    pub demerits: f64,
    /// State of the node created from this candidate.
    pub state: S,
}

pub trait BreakHooks {
    type State: Copy + Default + Debug + PartialEq;

    fn fit(&self, candidate: &Candidate<'_, Self::State>) -> HookFit<Self::State>;
}

/// Plain line breaking.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl BreakHooks for NoHooks {
    type State = ();

    #[inline]
    fn fit(&self, _candidate: &Candidate<'_, ()>) -> HookFit<()> {
        HookFit {
            extra: Measure::ZERO,
            demerits: 0.0,
            state: (),
        }
    }
}
