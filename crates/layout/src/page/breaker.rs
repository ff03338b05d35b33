use super::flow::PageFlow;
use super::footnotes::FootnoteHooks;
use crate::BreakError;
use crate::config::PageBreakingConfig;
use crate::perf::Profiler;
use crate::relax::Breaker;
use crate::result::{BreakResult, Segment};
use crate::sizes::TargetSizes;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

/// Part of one footnote body placed on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FootnotePiece {
    /// Index into [`PageFlow::footnotes`].
    pub footnote: usize,
    /// Elements of the footnote body on this page.
    pub elements: Range<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub index: u32,
    /// `None` for pages that only carry footnotes left over from the body.
    pub body: Option<Segment>,
    pub footnotes: Vec<FootnotePiece>,
    /// Height of the footnote area, separator included.
    pub footnote_height: i32,
    /// Content does not fit the page height.
    pub overflow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pagination {
    pub pages: Vec<Page>,
    /// The body breaking behind the pages with a body.
    pub result: BreakResult,
}

impl Pagination {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn degraded(&self) -> bool {
        self.result.degraded()
    }

    /// Pieces of footnote `footnote` in page order.
    pub fn pieces_of(&self, footnote: usize) -> impl Iterator<Item = &FootnotePiece> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.footnotes.iter())
            .filter(move |piece| piece.footnote == footnote)
    }
}

/// Breaks page flows into pages, reserving room for footnotes.
#[derive(Debug)]
pub struct PageBreaker {
    config: PageBreakingConfig,
    breaker: Breaker,
}

impl PageBreaker {
    pub fn new(config: PageBreakingConfig) -> Self {
        Self {
            breaker: Breaker::new(config.breaking),
            config,
        }
    }

    pub fn with_profiler(config: PageBreakingConfig, profiler: Arc<dyn Profiler>) -> Self {
        Self {
            breaker: Breaker::with_profiler(config.breaking, profiler),
            config,
        }
    }

    pub fn config(&self) -> &PageBreakingConfig {
        &self.config
    }

    pub fn paginate<T>(&self, flow: &PageFlow, sizes: &T) -> Result<Pagination, BreakError>
    where
        T: TargetSizes + ?Sized,
    {
        let hooks = FootnoteHooks::new(flow.elements.len(), &flow.footnotes, &self.config)?;
        let (result, states) = self.breaker.run_with_hooks(&flow.elements, sizes, &hooks)?;
        let separator = hooks.separator();

        let mut pages = Vec::with_capacity(result.len());
        let mut placed = 0;
        for (segment, state) in result.segments.iter().zip(states) {
            let footnote_height = if state > placed {
                state - placed + separator.width
            } else {
                0
            };
            pages.push(Page {
                index: segment.index,
                body: Some(segment.clone()),
                footnotes: pieces(&hooks, placed, state),
                footnote_height,
                overflow: segment.overfull,
            });
            placed = state;
        }

        while placed < hooks.total() {
            let index = pages.len() as u32;
            let room = sizes.size(index) - separator.width;
            let (stop, overflow) = match hooks.furthest_stop(placed, placed + room, hooks.len()) {
                Some(stop) => (stop, false),
                None => match hooks.next_stop(placed) {
                    Some(stop) => (stop, true),
                    None => break,
                },
            };
            pages.push(Page {
                index,
                body: None,
                footnotes: pieces(&hooks, placed, stop),
                footnote_height: stop - placed + separator.width,
                overflow,
            });
            placed = stop;
        }

        for page in pages.iter().filter(|p| p.overflow) {
            log::warn!(
                "Page {} overflows: body {:?}, footnotes {}",
                page.index + 1,
                page.body.as_ref().map(|b| b.start..b.end),
                page.footnote_height
            );
        }

        Ok(Pagination { pages, result })
    }
}

impl Default for PageBreaker {
    fn default() -> Self {
        Self::new(PageBreakingConfig::default())
    }
}

fn pieces(hooks: &FootnoteHooks, from: i32, to: i32) -> Vec<FootnotePiece> {
    hooks
        .pieces(from, to)
        .into_iter()
        .map(|(footnote, elements)| FootnotePiece { footnote, elements })
        .collect()
}
