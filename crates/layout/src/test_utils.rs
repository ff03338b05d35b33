//! Sequence builders and an exhaustive reference search for tests.

use crate::config::BreakingConfig;
use crate::cost::{BreakCost, segment_demerits};
use crate::measure::{Measure, Totals, adjustment_ratio, break_width, content_start, sum};
use folio_types::{BreakKind, Element, FitnessClass, break_kind_at};

/// Boxes of the given widths separated by identical glue.
pub fn words(widths: &[i32], space: i32, stretch: i32, shrink: i32) -> Vec<Element> {
    let mut seq = Vec::with_capacity(widths.len() * 2);
    for (k, w) in widths.iter().enumerate() {
        if k > 0 {
            seq.push(Element::glue(space, stretch, shrink));
        }
        seq.push(Element::boxed(*w));
    }
    seq
}

struct Start {
    content_start: usize,
    totals: Totals,
    fitness: FitnessClass,
    flagged: bool,
    demerits: f64,
}

/// Lowest total demerits over every path the search may legally take with the
/// given threshold, found by trying all of them. `None` if no path exists.
pub fn brute_force_min(seq: &[Element], target: i32, threshold: f64, config: &BreakingConfig) -> Option<f64> {
    let len = seq.len();
    let mut prefix = vec![Totals::ZERO; len + 1];
    for (i, e) in seq.iter().enumerate() {
        prefix[i + 1] = prefix[i] + Measure::of(e);
    }
    let legal: Vec<usize> = (1..=len)
        .filter(|i| *i == len || break_kind_at(seq, *i).is_some())
        .collect();

    let root = Start {
        content_start: 0,
        totals: Totals::ZERO,
        fitness: FitnessClass::Decent,
        flagged: false,
        demerits: 0.0,
    };
    let mut best = None;
    extend(seq, &prefix, &legal, target, threshold, config, &root, &mut best);
    best
}

#[allow(clippy::too_many_arguments)]
fn extend(
    seq: &[Element],
    prefix: &[Totals],
    legal: &[usize],
    target: i32,
    threshold: f64,
    config: &BreakingConfig,
    from: &Start,
    best: &mut Option<f64>,
) {
    let len = seq.len();
    if from.content_start >= len {
        if best.is_none_or(|b| from.demerits < b) {
            *best = Some(from.demerits);
        }
        return;
    }

    for &i in legal {
        let forced = i == len || seq[i].is_forced_break();
        if i < from.content_start || (i == from.content_start && !forced) {
            continue;
        }
        let natural = (prefix[i] - from.totals).with_width(break_width(seq, i));
        let ratio = adjustment_ratio(natural, target);
        if ratio < -1.0 {
            // The search drops the start node here, so nothing further is reachable.
            break;
        }
        if ratio <= threshold || forced {
            let kind = if i == len {
                BreakKind::End
            } else {
                break_kind_at(seq, i).unwrap_or(BreakKind::BoxBoundary)
            };
            let fitness = FitnessClass::from_ratio(ratio);
            let flagged = i < len && seq[i].is_flagged();
            let cost = BreakCost {
                penalty: if kind == BreakKind::Penalty { seq[i].cost() } else { None },
                forced,
                consecutive_flagged: flagged && from.flagged,
                fitness,
                previous_fitness: from.fitness,
            };
            let start = content_start(seq, i, kind);
            let next = Start {
                content_start: start,
                totals: prefix[i] + sum(seq, i, start),
                fitness,
                flagged,
                demerits: from.demerits + segment_demerits(ratio, &cost, config),
            };
            extend(seq, prefix, legal, target, threshold, config, &next, best);
        }
        if forced {
            break;
        }
    }
}
