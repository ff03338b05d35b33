pub mod element;
pub mod fitness;

pub use element::{
    BreakKind, Element, FIL, INFINITE, break_kind_at, is_discardable_after_break,
    is_legal_breakpoint,
};
pub use fitness::FitnessClass;
