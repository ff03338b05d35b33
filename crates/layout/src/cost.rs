//! Badness and demerits.

use crate::config::BreakingConfig;
use folio_types::FitnessClass;

/// Cubic badness `100 |r|^3`, saturating at `cap`.
pub fn badness(ratio: f64, cap: f64) -> f64 {
    let b = 100.0 * ratio.abs().powi(3);
    if b.is_finite() { b.min(cap) } else { cap }
}

/// What the demerits of one segment depend on besides its ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreakCost {
    /// Penalty cost at the break. `None` for glue, box boundaries and the end.
    pub penalty: Option<i32>,
    /// The break is forced (a forced penalty or the end of the sequence).
    pub forced: bool,
    /// Both this break and the previous one are flagged penalties.
    pub consecutive_flagged: bool,
    pub fitness: FitnessClass,
    pub previous_fitness: FitnessClass,
}

/// Demerits of a single segment.
///
/// `f = line_penalty + badness`. A positive penalty is added before squaring,
/// a negative non-forced penalty is subtracted squared, forced breaks
/// contribute nothing. The flagged and fitness surcharges are added on top.
pub fn segment_demerits(ratio: f64, cost: &BreakCost, config: &BreakingConfig) -> f64 {
    let weights = &config.weights;
    let f = weights.line_penalty + badness(ratio, config.badness_cap);
    let mut demerits = match cost.penalty {
        Some(p) if !cost.forced && p >= 0 => {
            let fp = f + p as f64;
            fp * fp
        }
        Some(p) if !cost.forced => f * f - (p as f64) * (p as f64),
        _ => f * f,
    };

    if cost.consecutive_flagged {
        demerits += weights.flagged_demerits;
    }
    if cost.fitness.distance(cost.previous_fitness) > 1 {
        demerits += weights.fitness_demerits;
    }
    demerits
}
