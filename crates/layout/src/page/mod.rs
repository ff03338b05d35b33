//! Page breaking.
//!
//! A page flow is an element sequence whose boxes are lines and whose glue is
//! vertical space, plus footnote bodies cited from some of those lines. Pages
//! are found by the same search as lines, with hooks that reserve room at the
//! bottom of each page for the footnotes cited on it.

mod breaker;
mod flow;
mod footnotes;

pub use breaker::{FootnotePiece, Page, PageBreaker, Pagination};
pub use flow::{Block, FlowBuilder, Footnote, PageFlow};
pub use footnotes::FootnoteHooks;
