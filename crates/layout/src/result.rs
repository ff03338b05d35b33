use crate::active::ActiveNode;
use crate::measure::Measure;
use folio_types::{BreakKind, Element, FitnessClass};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The relaxation pass that produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakPass {
    Strict,
    Loosened,
    /// Every box boundary was a legal break and overfull segments were allowed.
    ForceEverywhere,
    /// Greedy breaking, not produced by the relaxation passes.
    FirstFit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentEnd {
    Natural,
    Forced,
    EndOfSequence,
}

/// One line or page of a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub index: u32,
    /// Boundaries of the segment in the element sequence.
    pub start: usize,
    pub end: usize,
    /// Elements laid out on the segment, leading discardables dropped.
    pub content: Range<usize>,
    /// The glue or penalty the segment ends at.
    pub break_element: Option<usize>,
    pub ending: SegmentEnd,
    pub ratio: f64,
    pub fitness: FitnessClass,
    pub target: i32,
    /// Measure the ratio was computed from.
    pub natural: Measure,
    pub demerits: f64,
    /// The segment could not shrink enough to fit its target.
    pub overfull: bool,
}

impl Segment {
    /// Width of `element` once the segment's ratio is applied.
    ///
    /// Boxes and penalties keep their width. Overfull segments shrink their
    /// glue fully and no further.
    pub fn adjusted_glue_width(&self, element: &Element) -> f64 {
        match element {
            Element::Glue {
                width,
                stretch,
                shrink,
                ..
            } => {
                if self.ratio >= 0.0 {
                    *width as f64 + self.ratio * *stretch as f64
                } else {
                    *width as f64 + self.ratio.max(-1.0) * *shrink as f64
                }
            }
            other => other.width() as f64,
        }
    }

    pub fn is_forced(&self) -> bool {
        self.ending == SegmentEnd::Forced
    }
}

/// Counters of one breaking run, summed over every pass that ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub passes: u32,
    pub nodes_created: usize,
    pub nodes_deactivated: usize,
    /// Largest frontier seen in any pass.
    pub peak_active: usize,
    /// Restarts of the force-everywhere pass.
    pub restarts: usize,
}

impl SearchStats {
    pub(crate) fn absorb(&mut self, other: &SearchStats) {
        self.passes += other.passes;
        self.nodes_created += other.nodes_created;
        self.nodes_deactivated += other.nodes_deactivated;
        self.peak_active = self.peak_active.max(other.peak_active);
        self.restarts += other.restarts;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakResult {
    /// Strictly increasing, from 0 to the sequence length.
    pub boundaries: Vec<usize>,
    pub segments: Vec<Segment>,
    pub pass: BreakPass,
    pub total_demerits: f64,
    pub stats: SearchStats,
}

impl BreakResult {
    /// The result needed the force-everywhere pass.
    pub fn degraded(&self) -> bool {
        self.pass == BreakPass::ForceEverywhere
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn ratios(&self) -> impl Iterator<Item = f64> + '_ {
        self.segments.iter().map(|s| s.ratio)
    }

    /// Largest ratio among segments ending at a natural break.
    pub fn worst_natural_ratio(&self) -> Option<f64> {
        self.segments
            .iter()
            .filter(|s| s.ending == SegmentEnd::Natural)
            .map(|s| s.ratio)
            .reduce(f64::max)
    }

    pub fn has_overfull(&self) -> bool {
        self.segments.iter().any(|s| s.overfull)
    }

    /// Builds the result from a root-first path of nodes.
    pub(crate) fn from_path<S>(
        path: &[&ActiveNode<S>],
        len: usize,
        pass: BreakPass,
        stats: SearchStats,
    ) -> Self {
        let mut boundaries = Vec::with_capacity(path.len());
        let mut segments = Vec::with_capacity(path.len().saturating_sub(1));
        boundaries.push(0);

        let last = path.len().saturating_sub(1);
        for (k, (from, to)) in path.iter().tuple_windows().enumerate() {
            let end = if k + 1 == last { len } else { to.position };
            let ending = match to.break_kind {
                BreakKind::End => SegmentEnd::EndOfSequence,
                _ if to.forced => SegmentEnd::Forced,
                _ => SegmentEnd::Natural,
            };
            let break_element = match to.break_kind {
                BreakKind::Glue | BreakKind::Penalty => Some(to.position),
                BreakKind::BoxBoundary | BreakKind::End => None,
            };
            segments.push(Segment {
                index: k as u32,
                start: from.position,
                end,
                content: from.content_start.min(to.position)..to.position,
                break_element,
                ending,
                ratio: to.ratio,
                fitness: to.fitness_class,
                target: to.target,
                natural: to.natural,
                demerits: to.demerits,
                overfull: to.ratio < -1.0,
            });
            boundaries.push(end);
        }

        let total_demerits = path.last().map(|n| n.total_demerits).unwrap_or(0.0);
        Self {
            boundaries,
            segments,
            pass,
            total_demerits,
            stats,
        }
    }
}
