use serde::{Deserialize, Serialize};

/// Penalty cost at or beyond which a break is forbidden (and, negated, forced).
pub const INFINITE: i32 = 1000;

/// Stretch of a "fill" glue, large enough that a segment ending in it is never loose.
pub const FIL: i32 = 10_000_000;

/// One measured atom of a breakable sequence.
///
/// Widths, stretch and shrink share one linear unit (millipoints by convention).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Element {
    /// Visible content of fixed width. Never a breakpoint by itself.
    Box {
        width: i32,
        #[serde(default)]
        auxiliary: bool,
    },
    /// Breakable, discardable space.
    Glue {
        width: i32,
        #[serde(default)]
        stretch: i32,
        #[serde(default)]
        shrink: i32,
        #[serde(default)]
        auxiliary: bool,
    },
    /// A candidate breakpoint with a cost. `width` is only added when breaking here.
    Penalty {
        #[serde(default)]
        width: i32,
        cost: i32,
        #[serde(default)]
        flagged: bool,
        #[serde(default)]
        auxiliary: bool,
    },
}

impl Element {
    pub fn boxed(width: i32) -> Self {
        Element::Box {
            width,
            auxiliary: false,
        }
    }

    pub fn auxiliary_box(width: i32) -> Self {
        Element::Box {
            width,
            auxiliary: true,
        }
    }

    pub fn glue(width: i32, stretch: i32, shrink: i32) -> Self {
        Element::Glue {
            width,
            stretch,
            shrink,
            auxiliary: false,
        }
    }

    pub fn penalty(width: i32, cost: i32, flagged: bool) -> Self {
        Element::Penalty {
            width,
            cost,
            flagged,
            auxiliary: false,
        }
    }

    /// A penalty that mandates a break.
    pub fn forced_break() -> Self {
        Self::penalty(0, -INFINITE, false)
    }

    /// A penalty that forbids a break.
    pub fn forbidden_break() -> Self {
        Self::penalty(0, INFINITE, false)
    }

    pub fn is_box(&self) -> bool {
        matches!(self, Element::Box { .. })
    }

    pub fn is_glue(&self) -> bool {
        matches!(self, Element::Glue { .. })
    }

    pub fn is_penalty(&self) -> bool {
        matches!(self, Element::Penalty { .. })
    }

    pub fn is_auxiliary(&self) -> bool {
        match self {
            Element::Box { auxiliary, .. }
            | Element::Glue { auxiliary, .. }
            | Element::Penalty { auxiliary, .. } => *auxiliary,
        }
    }

    /// Natural width. For penalties this is the width added when breaking there.
    pub fn width(&self) -> i32 {
        match self {
            Element::Box { width, .. }
            | Element::Glue { width, .. }
            | Element::Penalty { width, .. } => *width,
        }
    }

    pub fn stretch(&self) -> i32 {
        match self {
            Element::Glue { stretch, .. } => *stretch,
            _ => 0,
        }
    }

    pub fn shrink(&self) -> i32 {
        match self {
            Element::Glue { shrink, .. } => *shrink,
            _ => 0,
        }
    }

    /// Penalty cost, or `None` for boxes and glue.
    pub fn cost(&self) -> Option<i32> {
        match self {
            Element::Penalty { cost, .. } => Some(*cost),
            _ => None,
        }
    }

    pub fn is_flagged(&self) -> bool {
        matches!(self, Element::Penalty { flagged: true, .. })
    }

    pub fn is_forced_break(&self) -> bool {
        matches!(self, Element::Penalty { cost, .. } if *cost <= -INFINITE)
    }

    pub fn is_forbidden_break(&self) -> bool {
        matches!(self, Element::Penalty { cost, .. } if *cost >= INFINITE)
    }
}

/// How a segment boundary was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BreakKind {
    /// Break at a glue that follows a box; the glue is discarded.
    Glue,
    /// Break at a penalty with a finite (or forced) cost.
    Penalty,
    /// Break before a box that is not otherwise breakable. Only used by the
    /// force-everywhere fallback.
    BoxBoundary,
    /// The end of the sequence.
    End,
}

/// Returns whether a segment may end at index `i` of `seq`.
///
/// Index 0 and `seq.len()` are always legal: the start and end of a sequence
/// are valid boundaries regardless of what sits there.
pub fn is_legal_breakpoint(seq: &[Element], i: usize) -> bool {
    if i == 0 || i == seq.len() {
        return true;
    }
    break_kind_at(seq, i).is_some()
}

/// The kind of break available at an interior index, if any.
///
/// A penalty is breakable when its cost is below [`INFINITE`]; a glue only when
/// the element before it is a box.
pub fn break_kind_at(seq: &[Element], i: usize) -> Option<BreakKind> {
    if i == 0 || i >= seq.len() {
        return None;
    }
    match seq[i] {
        Element::Penalty { cost, .. } if cost < INFINITE => Some(BreakKind::Penalty),
        Element::Glue { .. } if seq[i - 1].is_box() => Some(BreakKind::Glue),
        _ => None,
    }
}

/// Glue and auxiliary boxes are dropped at the start of a new segment.
pub fn is_discardable_after_break(element: &Element) -> bool {
    match element {
        Element::Glue { .. } => true,
        Element::Box { auxiliary, .. } => *auxiliary,
        Element::Penalty { .. } => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words() -> Vec<Element> {
        vec![
            Element::boxed(100),
            Element::glue(10, 5, 3),
            Element::boxed(100),
            Element::glue(10, 5, 3),
            Element::glue(10, 5, 3),
            Element::penalty(0, INFINITE, false),
            Element::penalty(0, 50, true),
            Element::boxed(100),
        ]
    }

    #[test]
    fn test_glue_is_legal_only_after_box() {
        let seq = words();
        assert!(is_legal_breakpoint(&seq, 1));
        assert!(is_legal_breakpoint(&seq, 3));
        assert!(!is_legal_breakpoint(&seq, 4));
    }

    #[test]
    fn test_penalty_legality_follows_cost() {
        let seq = words();
        assert!(!is_legal_breakpoint(&seq, 5));
        assert!(is_legal_breakpoint(&seq, 6));
        assert_eq!(break_kind_at(&seq, 6), Some(BreakKind::Penalty));
    }

    #[test]
    fn test_boxes_are_never_breakpoints() {
        let seq = words();
        assert!(!is_legal_breakpoint(&seq, 2));
        assert!(!is_legal_breakpoint(&seq, 7));
    }

    #[test]
    fn test_sequence_ends_are_always_legal() {
        let seq = vec![Element::boxed(10), Element::glue(1, 1, 1)];
        assert!(is_legal_breakpoint(&seq, 0));
        assert!(is_legal_breakpoint(&seq, seq.len()));
        assert!(is_legal_breakpoint(&[], 0));
        assert!(!is_legal_breakpoint(&seq, seq.len() + 1));
    }

    #[test]
    fn test_discardability() {
        assert!(is_discardable_after_break(&Element::glue(1, 0, 0)));
        assert!(is_discardable_after_break(&Element::auxiliary_box(0)));
        assert!(!is_discardable_after_break(&Element::boxed(0)));
        assert!(!is_discardable_after_break(&Element::forced_break()));
    }

    #[test]
    fn test_forced_and_forbidden_penalties() {
        assert!(Element::forced_break().is_forced_break());
        assert!(Element::forbidden_break().is_forbidden_break());
        assert!(!Element::penalty(0, 999, false).is_forbidden_break());
        assert!(!Element::penalty(0, -999, false).is_forced_break());
    }

    #[test]
    fn test_deserializes_tagged_elements() {
        let json = r#"[
            {"type": "box", "width": 12},
            {"type": "glue", "width": 3, "stretch": 2},
            {"type": "penalty", "cost": -1000}
        ]"#;
        let seq: Vec<Element> = serde_json::from_str(json).unwrap();
        assert_eq!(seq[0], Element::boxed(12));
        assert_eq!(seq[1], Element::glue(3, 2, 0));
        assert!(seq[2].is_forced_break());
    }
}
