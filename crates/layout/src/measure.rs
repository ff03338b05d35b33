//! Width, stretch and shrink accounting.
//!
//! The search never re-measures a segment from scratch. It keeps the running
//! sum of everything before the scan position and stores, on every node, the
//! sum up to where that node's content begins. A segment's measure is the
//! difference of the two.
//!
//! Running sums are kept as [`Totals`] in `i64`: every forced line break ends
//! in a `FIL` glue, so a few hundred of them already pass `i32::MAX`. Only the
//! difference for one segment is narrowed back to a [`Measure`].

use folio_types::{BreakKind, Element, is_discardable_after_break};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Sub};

/// Ratio reported when a segment would need stretch or shrink it does not have.
pub const INFINITE_RATIO: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub width: i32,
    pub stretch: i32,
    pub shrink: i32,
}

impl Measure {
    pub const ZERO: Measure = Measure {
        width: 0,
        stretch: 0,
        shrink: 0,
    };

    pub fn new(width: i32, stretch: i32, shrink: i32) -> Self {
        Self {
            width,
            stretch,
            shrink,
        }
    }

    /// Contribution of one element to a segment it sits inside. Penalties only
    /// count when a segment ends at them, see [`break_width`].
    pub fn of(element: &Element) -> Self {
        match element {
            Element::Box { width, .. } => Self::new(*width, 0, 0),
            Element::Glue {
                width,
                stretch,
                shrink,
                ..
            } => Self::new(*width, *stretch, *shrink),
            Element::Penalty { .. } => Self::ZERO,
        }
    }

    /// Adds a width only, as for a penalty or an extra box.
    pub fn with_width(self, width: i32) -> Self {
        Self {
            width: self.width.saturating_add(width),
            ..self
        }
    }
}

impl Add for Measure {
    type Output = Measure;

    fn add(self, rhs: Measure) -> Measure {
        Measure::new(
            self.width.saturating_add(rhs.width),
            self.stretch.saturating_add(rhs.stretch),
            self.shrink.saturating_add(rhs.shrink),
        )
    }
}

impl AddAssign for Measure {
    fn add_assign(&mut self, rhs: Measure) {
        *self = *self + rhs;
    }
}

impl Sub for Measure {
    type Output = Measure;

    fn sub(self, rhs: Measure) -> Measure {
        Measure::new(
            self.width.saturating_sub(rhs.width),
            self.stretch.saturating_sub(rhs.stretch),
            self.shrink.saturating_sub(rhs.shrink),
        )
    }
}

/// Running sum of element measures from the start of the sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub width: i64,
    pub stretch: i64,
    pub shrink: i64,
}

impl Totals {
    pub const ZERO: Totals = Totals {
        width: 0,
        stretch: 0,
        shrink: 0,
    };
}

impl Add<Measure> for Totals {
    type Output = Totals;

    fn add(self, rhs: Measure) -> Totals {
        Totals {
            width: self.width + i64::from(rhs.width),
            stretch: self.stretch + i64::from(rhs.stretch),
            shrink: self.shrink + i64::from(rhs.shrink),
        }
    }
}

impl AddAssign<Measure> for Totals {
    fn add_assign(&mut self, rhs: Measure) {
        *self = *self + rhs;
    }
}

/// The measure between two running sums, saturated to the `i32` range.
impl Sub for Totals {
    type Output = Measure;

    fn sub(self, rhs: Totals) -> Measure {
        Measure::new(
            narrow(self.width - rhs.width),
            narrow(self.stretch - rhs.stretch),
            narrow(self.shrink - rhs.shrink),
        )
    }
}

fn narrow(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl From<Measure> for (i32, i32, i32) {
    fn from(m: Measure) -> Self {
        (m.width, m.stretch, m.shrink)
    }
}

/// Signed amount the glue of a segment must stretch (positive) or shrink
/// (negative) to fill `target`.
///
/// Missing stretch or shrink yields `±INFINITE_RATIO` instead of a division
/// by zero.
pub fn adjustment_ratio(natural: Measure, target: i32) -> f64 {
    let diff = target - natural.width;
    if diff > 0 {
        if natural.stretch > 0 {
            diff as f64 / natural.stretch as f64
        } else {
            INFINITE_RATIO
        }
    } else if diff < 0 {
        if natural.shrink > 0 {
            diff as f64 / natural.shrink as f64
        } else {
            -INFINITE_RATIO
        }
    } else {
        0.0
    }
}

/// Width added by ending a segment at `i`: the penalty's own width, nothing for
/// glue, box boundaries and the end of the sequence.
pub fn break_width(seq: &[Element], i: usize) -> i32 {
    match seq.get(i) {
        Some(Element::Penalty { width, .. }) => *width,
        _ => 0,
    }
}

/// Index of the first element laid out after a break of `kind` at `i`.
///
/// The break element itself is consumed for glue and penalty breaks. After it,
/// glue, auxiliary boxes and non-forced penalties are skipped until an ordinary
/// box, a forced penalty or the end of the sequence.
pub fn content_start(seq: &[Element], i: usize, kind: BreakKind) -> usize {
    let mut j = match kind {
        BreakKind::Glue | BreakKind::Penalty => i + 1,
        BreakKind::BoxBoundary => i,
        BreakKind::End => return seq.len(),
    };
    while let Some(element) = seq.get(j) {
        let skip = match element {
            Element::Penalty { .. } => !element.is_forced_break(),
            _ => is_discardable_after_break(element),
        };
        if !skip {
            break;
        }
        j += 1;
    }
    j.min(seq.len())
}

/// Sums `[start, end)` after dropping what a break at `start` would discard.
/// `start == 0` is the beginning of the sequence and drops nothing.
pub fn measure(seq: &[Element], start: usize, end: usize) -> Measure {
    let end = end.min(seq.len());
    let from = if start == 0 {
        0
    } else {
        let kind = folio_types::break_kind_at(seq, start).unwrap_or(BreakKind::BoxBoundary);
        content_start(seq, start, kind)
    };
    sum(seq, from, end)
}

/// Plain sum of `[from, to)`.
pub fn sum(seq: &[Element], from: usize, to: usize) -> Measure {
    if from >= to {
        return Measure::ZERO;
    }
    seq[from..to]
        .iter()
        .fold(Measure::ZERO, |acc, e| acc + Measure::of(e))
}
