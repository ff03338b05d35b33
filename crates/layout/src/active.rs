//! The dynamic-programming frontier.
//!
//! Nodes live in an append-only arena and are never mutated once pushed.
//! Deactivation flips a flag and drops the id from the frontier, so `previous`
//! links stay valid for the backward walk.

use crate::measure::{Measure, Totals};
use folio_types::{BreakKind, FitnessClass};

/// Index of a node in the arena of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A feasible partial solution ending at a breakpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNode<S> {
    /// Breakpoint index. 0 for the root.
    pub position: usize,
    /// First element laid out after the break.
    pub content_start: usize,
    /// Segments on the path up to this node.
    pub line_number: u32,
    /// Fitness of the segment ending here. `Decent` for the root.
    pub fitness_class: FitnessClass,
    /// Measure of `[0, content_start)`.
    pub totals: Totals,
    pub total_demerits: f64,
    pub previous: Option<NodeId>,

    // The segment ending at this node.
    pub ratio: f64,
    pub natural: Measure,
    pub target: i32,
    pub demerits: f64,
    pub break_kind: BreakKind,
    pub flagged: bool,
    pub forced: bool,

    /// Per-path state carried by search hooks.
    pub state: S,
}

impl<S: Default> ActiveNode<S> {
    pub fn root() -> Self {
        Self {
            position: 0,
            content_start: 0,
            line_number: 0,
            fitness_class: FitnessClass::Decent,
            totals: Totals::ZERO,
            total_demerits: 0.0,
            previous: None,
            ratio: 0.0,
            natural: Measure::ZERO,
            target: 0,
            demerits: 0.0,
            break_kind: BreakKind::End,
            flagged: false,
            forced: false,
            state: S::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ActiveSet<S> {
    arena: Vec<ActiveNode<S>>,
    live: Vec<bool>,
    frontier: Vec<NodeId>,
    live_count: usize,
    peak: usize,
    deactivated: usize,
}

impl<S> Default for ActiveSet<S> {
    fn default() -> Self {
        Self {
            arena: Vec::new(),
            live: Vec::new(),
            frontier: Vec::new(),
            live_count: 0,
            peak: 0,
            deactivated: 0,
        }
    }
}

impl<S> ActiveSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a node and makes it active.
    pub fn insert(&mut self, node: ActiveNode<S>) -> NodeId {
        let id = self.push(node, true);
        self.frontier.push(id);
        self.live_count += 1;
        self.peak = self.peak.max(self.live_count);
        id
    }

    /// Appends a node without activating it. Used for fallback candidates that
    /// may later seed a restart.
    pub fn insert_detached(&mut self, node: ActiveNode<S>) -> NodeId {
        self.push(node, false)
    }

    fn push(&mut self, node: ActiveNode<S>, live: bool) -> NodeId {
        let id = NodeId(self.arena.len() as u32);
        self.arena.push(node);
        self.live.push(live);
        id
    }

    pub fn activate(&mut self, id: NodeId) {
        if !self.live[id.index()] {
            self.live[id.index()] = true;
            self.frontier.push(id);
            self.live_count += 1;
            self.peak = self.peak.max(self.live_count);
        }
    }

    /// Marks a node inactive. The node stays in the arena; call
    /// [`ActiveSet::compact`] to drop it from the frontier.
    pub fn deactivate(&mut self, id: NodeId) {
        if std::mem::replace(&mut self.live[id.index()], false) {
            self.live_count -= 1;
            self.deactivated += 1;
        }
    }

    pub fn compact(&mut self) {
        let live = &self.live;
        self.frontier.retain(|id| live[id.index()]);
    }

    pub fn is_active(&self, id: NodeId) -> bool {
        self.live[id.index()]
    }

    pub fn get(&self, id: NodeId) -> &ActiveNode<S> {
        &self.arena[id.index()]
    }

    /// Active node ids in creation order, including ones deactivated since the
    /// last [`ActiveSet::compact`].
    pub fn frontier(&self) -> &[NodeId] {
        &self.frontier
    }

    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    pub fn created(&self) -> usize {
        self.arena.len()
    }

    pub fn deactivated(&self) -> usize {
        self.deactivated
    }

    /// Largest number of simultaneously active nodes.
    pub fn peak_active(&self) -> usize {
        self.peak
    }

    /// Follows `previous` links from `id` back to the root and returns the path
    /// root first.
    pub fn path(&self, id: NodeId) -> Vec<&ActiveNode<S>> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.get(current);
            path.push(node);
            cursor = node.previous;
        }
        path.reverse();
        path
    }
}
