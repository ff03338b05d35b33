//! The breakpoint search.
//!
//! One scan over the sequence. At every legal breakpoint each active node is
//! tried as the start of a segment ending there; feasible segments become new
//! nodes, nodes that can no longer fit anything are deactivated. At the end the
//! cheapest surviving path is walked back to the root.

use crate::active::{ActiveNode, ActiveSet, NodeId};
use crate::config::BreakingConfig;
use crate::cost::{BreakCost, segment_demerits};
use crate::hooks::{BreakHooks, Candidate};
use crate::measure::{Measure, Totals, adjustment_ratio, break_width, content_start, sum};
use crate::result::{BreakPass, BreakResult, SearchStats};
use crate::sizes::TargetSizes;
use folio_types::{BreakKind, Element, FitnessClass, break_kind_at};
use std::collections::BTreeMap;

/// Rules of one relaxation pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    pub pass: BreakPass,
    /// Largest ratio accepted at a non-forced break.
    pub threshold: f64,
    /// Flagged penalties are legal breakpoints.
    pub allow_flagged: bool,
    /// Every interior box is a legal breakpoint.
    pub box_boundaries: bool,
    /// Keep fallback candidates and restart from them when the frontier empties.
    pub force: bool,
    /// Paths longer than this are not extended.
    pub max_segments: Option<u32>,
}

impl SearchParams {
    pub fn for_pass(pass: BreakPass, config: &BreakingConfig) -> Self {
        match pass {
            BreakPass::Strict | BreakPass::FirstFit => Self {
                pass,
                threshold: config.tolerance,
                allow_flagged: config.allow_flagged_breaks,
                box_boundaries: false,
                force: false,
                max_segments: config.max_segments,
            },
            BreakPass::Loosened => Self {
                pass,
                threshold: config.loose_tolerance,
                allow_flagged: true,
                box_boundaries: false,
                force: false,
                max_segments: config.max_segments,
            },
            BreakPass::ForceEverywhere => Self {
                pass,
                threshold: config.loose_tolerance,
                allow_flagged: true,
                box_boundaries: true,
                force: true,
                max_segments: None,
            },
        }
    }
}

/// Result of a single pass. `found` is `None` when the pass failed.
#[derive(Debug)]
pub struct PassOutcome<S> {
    pub found: Option<(BreakResult, Vec<S>)>,
    pub stats: SearchStats,
}

/// Everything known about the breakpoint under consideration.
#[derive(Debug, Clone, Copy)]
struct Breakpoint {
    index: usize,
    kind: BreakKind,
    forced: bool,
    flagged: bool,
    penalty: Option<i32>,
    width: i32,
    /// Measure of `[0, index)`.
    totals: Totals,
    content_start: usize,
    /// Measure of `[0, content_start)`.
    totals_after: Totals,
    previous_break: usize,
}

struct Scan<S> {
    active: ActiveSet<S>,
    last_too_long: Option<NodeId>,
    last_too_short: Option<NodeId>,
    last_restart: usize,
    restarts: usize,
}

pub struct BreakingAlgorithm<'a, H, T: ?Sized> {
    seq: &'a [Element],
    sizes: &'a T,
    hooks: &'a H,
    config: &'a BreakingConfig,
}

impl<'a, H, T> BreakingAlgorithm<'a, H, T>
where
    H: BreakHooks,
    T: TargetSizes + ?Sized,
{
    pub fn new(seq: &'a [Element], sizes: &'a T, hooks: &'a H, config: &'a BreakingConfig) -> Self {
        Self {
            seq,
            sizes,
            hooks,
            config,
        }
    }

    /// Key under which nodes at one breakpoint compete. Paths whose remaining
    /// segments all get the same size only differ by demerits.
    fn line_class(&self, line: u32) -> u32 {
        if self.config.looseness != 0 || self.config.max_segments.is_some() {
            return line;
        }
        match self.sizes.uniform_from() {
            Some(uniform) => line.min(uniform),
            None => line,
        }
    }

    fn break_kind(&self, i: usize, params: &SearchParams) -> Option<BreakKind> {
        let seq = self.seq;
        if i == 0 || i > seq.len() {
            return None;
        }
        if i == seq.len() {
            return Some(BreakKind::End);
        }
        match break_kind_at(seq, i) {
            Some(BreakKind::Penalty) if seq[i].is_flagged() && !params.allow_flagged => None,
            Some(kind) => Some(kind),
            None if params.box_boundaries && seq[i].is_box() => Some(BreakKind::BoxBoundary),
            None => None,
        }
    }

    fn breakpoint(&self, i: usize, kind: BreakKind, totals: Totals, previous_break: usize) -> Breakpoint {
        let element = self.seq.get(i);
        let start = content_start(self.seq, i, kind);
        Breakpoint {
            index: i,
            kind,
            forced: kind == BreakKind::End || element.is_some_and(Element::is_forced_break),
            flagged: element.is_some_and(Element::is_flagged),
            penalty: if kind == BreakKind::Penalty {
                element.and_then(Element::cost)
            } else {
                None
            },
            width: break_width(self.seq, i),
            totals,
            content_start: start,
            totals_after: totals + sum(self.seq, i, start),
            previous_break,
        }
    }

    /// Builds the node a segment from `from` to `bp` would create, or `None`
    /// when `from` cannot end a segment there.
    fn evaluate(&self, from: &ActiveNode<H::State>, id: NodeId, bp: &Breakpoint) -> Option<ActiveNode<H::State>> {
        if from.content_start >= self.seq.len() {
            return None;
        }
        if bp.index < from.content_start || (bp.index == from.content_start && !bp.forced) {
            return None;
        }

        let target = self.sizes.size(from.line_number);
        let natural = (bp.totals - from.totals).with_width(bp.width);
        let fit = self.hooks.fit(&Candidate {
            from,
            break_index: bp.index,
            kind: bp.kind,
            natural,
            target,
            previous_break: bp.previous_break,
            first_after_from: bp.previous_break <= from.position || bp.previous_break < from.content_start,
        });
        let measured = natural + fit.extra;
        let ratio = adjustment_ratio(measured, target);
        let fitness = FitnessClass::from_ratio(ratio);
        let cost = BreakCost {
            penalty: bp.penalty,
            forced: bp.forced,
            consecutive_flagged: bp.flagged && from.flagged,
            fitness,
            previous_fitness: from.fitness_class,
        };
        let demerits = segment_demerits(ratio, &cost, self.config) + fit.demerits;

        Some(ActiveNode {
            position: bp.index,
            content_start: bp.content_start,
            line_number: from.line_number + 1,
            fitness_class: fitness,
            totals: bp.totals_after,
            total_demerits: from.total_demerits + demerits,
            previous: Some(id),
            ratio,
            natural: measured,
            target,
            demerits,
            break_kind: bp.kind,
            flagged: bp.flagged,
            forced: bp.forced,
            state: fit.state,
        })
    }

    /// Runs one pass.
    pub fn run(&self, params: &SearchParams) -> PassOutcome<H::State> {
        let len = self.seq.len();
        let mut scan = Scan {
            active: ActiveSet::new(),
            last_too_long: None,
            last_too_short: None,
            last_restart: 0,
            restarts: 0,
        };
        scan.active.insert(ActiveNode::root());

        let mut totals = Totals::ZERO;
        let mut previous_break = 0;
        let mut i = 0;
        let mut failed = false;

        while i <= len {
            if let Some(kind) = self.break_kind(i, params) {
                let bp = self.breakpoint(i, kind, totals, previous_break);
                self.consider(&mut scan, &bp, params);
                previous_break = i;

                if scan.active.is_empty() {
                    match params.force.then(|| recover(&mut scan)).flatten() {
                        Some(restart) => {
                            let node = scan.active.get(restart);
                            i = node.content_start;
                            totals = node.totals;
                            previous_break = node.position;
                            continue;
                        }
                        None => {
                            failed = true;
                            break;
                        }
                    }
                }
            }
            if let Some(element) = self.seq.get(i) {
                totals += Measure::of(element);
            }
            i += 1;
        }

        let stats = SearchStats {
            passes: 1,
            nodes_created: scan.active.created(),
            nodes_deactivated: scan.active.deactivated(),
            peak_active: scan.active.peak_active(),
            restarts: scan.restarts,
        };
        if failed {
            log::debug!("{:?} pass found no feasible path", params.pass);
            return PassOutcome { found: None, stats };
        }

        let found = self.select_terminal(&scan.active).map(|terminal| {
            let path = scan.active.path(terminal);
            let states = path.iter().skip(1).map(|n| n.state).collect();
            (BreakResult::from_path(&path, len, params.pass, stats), states)
        });
        PassOutcome { found, stats }
    }

    fn consider(&self, scan: &mut Scan<H::State>, bp: &Breakpoint, params: &SearchParams) {
        let mut best: BTreeMap<(u32, FitnessClass), ActiveNode<H::State>> = BTreeMap::new();

        let frontier_len = scan.active.frontier().len();
        for k in 0..frontier_len {
            let id = scan.active.frontier()[k];
            if !scan.active.is_active(id) {
                continue;
            }
            let Some(node) = self.evaluate(scan.active.get(id), id, bp) else {
                continue;
            };

            if node.ratio < -1.0 || bp.forced {
                scan.active.deactivate(id);
            }

            let within_limit = params.max_segments.is_none_or(|max| node.line_number <= max);
            let feasible = node.ratio >= -1.0 && (node.ratio <= params.threshold || bp.forced);
            if feasible && within_limit {
                let key = (self.line_class(node.line_number), node.fitness_class);
                match best.get(&key) {
                    Some(kept) if kept.total_demerits <= node.total_demerits => {}
                    _ => {
                        best.insert(key, node);
                    }
                }
            } else if params.force && within_limit {
                let slot = if node.ratio < -1.0 {
                    &mut scan.last_too_long
                } else {
                    &mut scan.last_too_short
                };
                let better = slot.is_none_or(|kept| node.total_demerits <= scan.active.get(kept).total_demerits);
                if better {
                    *slot = Some(scan.active.insert_detached(node));
                }
            }
        }

        if !best.is_empty() {
            scan.last_too_short = None;
        }

        // Within a line class no continuation can make up for more than one
        // fitness surcharge.
        let mut floor: BTreeMap<u32, f64> = BTreeMap::new();
        for ((class, _), node) in &best {
            let entry = floor.entry(*class).or_insert(f64::INFINITY);
            *entry = entry.min(node.total_demerits);
        }
        let slack = self.config.weights.fitness_demerits;
        for ((class, _), node) in best {
            if node.total_demerits <= floor[&class] + slack {
                log::trace!(
                    "node at {} line {} {:?} ratio {:.3} demerits {:.1}",
                    node.position,
                    node.line_number,
                    node.fitness_class,
                    node.ratio,
                    node.total_demerits
                );
                scan.active.insert(node);
            }
        }

        scan.active.compact();
    }

    /// Cheapest final node, or the one closest to the requested looseness.
    fn select_terminal(&self, active: &ActiveSet<H::State>) -> Option<NodeId> {
        let len = self.seq.len();
        let finals: Vec<NodeId> = active
            .frontier()
            .iter()
            .copied()
            .filter(|id| active.is_active(*id) && active.get(*id).content_start >= len)
            .collect();

        let cheapest = |ids: &[NodeId]| {
            ids.iter().copied().reduce(|a, b| {
                if active.get(b).total_demerits < active.get(a).total_demerits {
                    b
                } else {
                    a
                }
            })
        };

        let best = cheapest(&finals)?;
        if self.config.looseness == 0 {
            return Some(best);
        }

        let wanted = active.get(best).line_number as i64 + self.config.looseness as i64;
        let distance = |id: NodeId| (active.get(id).line_number as i64 - wanted).abs();
        let closest = finals.iter().map(|id| distance(*id)).min()?;
        let candidates: Vec<NodeId> = finals.into_iter().filter(|id| distance(*id) == closest).collect();
        cheapest(&candidates)
    }

    /// Greedy breaking: each segment ends at the last breakpoint that still
    /// fits, or at the first one when nothing fits.
    pub fn first_fit(&self) -> Option<(BreakResult, Vec<H::State>)> {
        let params = SearchParams::for_pass(BreakPass::FirstFit, self.config);
        let len = self.seq.len();
        let mut active = ActiveSet::new();
        let mut current = active.insert(ActiveNode::root());
        let mut fitting: Option<ActiveNode<H::State>> = None;

        let mut totals = Totals::ZERO;
        let mut previous_break = 0;
        let mut i = 0;

        while i <= len {
            if let Some(kind) = self.break_kind(i, &params) {
                let bp = self.breakpoint(i, kind, totals, previous_break);
                previous_break = i;

                if let Some(node) = self.evaluate(active.get(current), current, &bp) {
                    let commit = if node.ratio < -1.0 {
                        Some(fitting.take().unwrap_or(node))
                    } else if bp.forced {
                        Some(node)
                    } else {
                        fitting = Some(node);
                        None
                    };

                    if let Some(node) = commit {
                        fitting = None;
                        i = node.content_start;
                        totals = node.totals;
                        previous_break = node.position;
                        active.deactivate(current);
                        current = active.insert(node);
                        if i >= len {
                            break;
                        }
                        continue;
                    }
                }
            }
            if let Some(element) = self.seq.get(i) {
                totals += Measure::of(element);
            }
            i += 1;
        }

        if active.get(current).content_start < len {
            return None;
        }
        let stats = SearchStats {
            passes: 1,
            nodes_created: active.created(),
            nodes_deactivated: active.deactivated(),
            peak_active: active.peak_active(),
            restarts: 0,
        };
        let path = active.path(current);
        let states = path.iter().skip(1).map(|n| n.state).collect();
        Some((BreakResult::from_path(&path, len, BreakPass::FirstFit, stats), states))
    }
}

/// Picks the fallback node a forced pass restarts from. The too-short
/// candidate is preferred unless it does not move past the previous restart.
fn recover<S>(scan: &mut Scan<S>) -> Option<NodeId> {
    let after_restart = |id: &NodeId| scan.active.get(*id).position > scan.last_restart;
    let choice = scan
        .last_too_short
        .filter(after_restart)
        .or_else(|| scan.last_too_long.filter(after_restart))?;

    let position = scan.active.get(choice).position;
    log::debug!("frontier empty, restarting from breakpoint {}", position);
    scan.active.activate(choice);
    scan.last_restart = position;
    scan.last_too_long = None;
    scan.last_too_short = None;
    scan.restarts += 1;
    Some(choice)
}
