use super::flow::Footnote;
use crate::BreakError;
use crate::config::{PageBreakingConfig, Space};
use crate::hooks::{BreakHooks, Candidate, HookFit};
use crate::measure::{Measure, sum};
use crate::validate::validate;
use folio_types::{BreakKind, break_kind_at};

/// Reserves footnote space on pages.
///
/// All footnote material is laid end to end: footnote `k` occupies
/// `[start(k), end(k))` of one long column. The state of a path is how much of
/// that column has been placed on its pages so far.
#[derive(Debug)]
pub struct FootnoteHooks {
    /// End offset of each footnote in the column.
    ends: Vec<i32>,
    /// Legal split points of each footnote: (offset within the footnote,
    /// element index).
    splits: Vec<Vec<(i32, usize)>>,
    element_counts: Vec<usize>,
    /// Number of footnotes cited before each element index.
    cited_before: Vec<usize>,
    separator: Space,
    split_demerits: f64,
    deferred_demerits: f64,
}

impl FootnoteHooks {
    pub fn new(body_len: usize, footnotes: &[Footnote], config: &PageBreakingConfig) -> Result<Self, BreakError> {
        let mut ends = Vec::with_capacity(footnotes.len());
        let mut splits = Vec::with_capacity(footnotes.len());
        let mut element_counts = Vec::with_capacity(footnotes.len());
        let mut cited_before = vec![0; body_len + 1];
        let mut column = 0;
        let mut last_citation = 0;

        for (k, note) in footnotes.iter().enumerate() {
            if note.citation >= body_len || note.citation < last_citation {
                return Err(BreakError::InvalidElementSequence {
                    index: note.citation,
                    reason: format!("footnote {k} is cited out of order"),
                });
            }
            validate(&note.elements)?;
            last_citation = note.citation;

            let length = sum(&note.elements, 0, note.elements.len()).width;
            column += length;
            ends.push(column);
            element_counts.push(note.elements.len());
            splits.push(
                (1..note.elements.len())
                    .filter(|j| break_kind_at(&note.elements, *j).is_some())
                    .map(|j| (sum(&note.elements, 0, j).width, j))
                    .filter(|(offset, _)| *offset > 0 && *offset < length)
                    .collect(),
            );
            for count in &mut cited_before[note.citation + 1..] {
                *count += 1;
            }
        }

        Ok(Self {
            ends,
            splits,
            element_counts,
            cited_before,
            separator: config.footnote_separator,
            split_demerits: config.split_footnote_demerits,
            deferred_demerits: config.deferred_footnote_demerits,
        })
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }

    pub fn separator(&self) -> Space {
        self.separator
    }

    /// Total length of all footnote material.
    pub fn total(&self) -> i32 {
        self.ends.last().copied().unwrap_or(0)
    }

    fn start(&self, k: usize) -> i32 {
        if k == 0 { 0 } else { self.ends[k - 1] }
    }

    /// Column offset where the first `count` footnotes end.
    fn end_of_first(&self, count: usize) -> i32 {
        if count == 0 { 0 } else { self.ends[count - 1] }
    }

    /// Furthest offset in `(from, limit]` among the first `count` footnotes at
    /// which a page can stop: a footnote end or a legal split inside one.
    pub fn furthest_stop(&self, from: i32, limit: i32, count: usize) -> Option<i32> {
        let mut best = None;
        for k in 0..count.min(self.ends.len()) {
            let (start, end) = (self.start(k), self.ends[k]);
            if end <= from {
                continue;
            }
            if end <= limit {
                best = Some(end);
                continue;
            }
            best = self.splits[k]
                .iter()
                .map(|(offset, _)| start + offset)
                .filter(|offset| *offset > from && *offset <= limit)
                .max()
                .or(best);
            break;
        }
        best
    }

    /// Nearest offset after `from` at which a page can stop.
    pub fn next_stop(&self, from: i32) -> Option<i32> {
        let k = self.ends.iter().position(|end| *end > from)?;
        let start = self.start(k);
        self.splits[k]
            .iter()
            .map(|(offset, _)| start + offset)
            .find(|offset| *offset > from)
            .or(Some(self.ends[k]))
    }

    /// Element index inside footnote `k` at a column offset local to it.
    fn element_at(&self, k: usize, local: i32) -> usize {
        let length = self.ends[k] - self.start(k);
        if local <= 0 {
            return 0;
        }
        if local >= length {
            return self.element_counts[k];
        }
        self.splits[k]
            .iter()
            .find(|(offset, _)| *offset >= local)
            .map(|(_, j)| *j)
            .unwrap_or(self.element_counts[k])
    }

    /// Footnote pieces covering the column range `[from, to)`.
    pub fn pieces(&self, from: i32, to: i32) -> Vec<(usize, std::ops::Range<usize>)> {
        let mut pieces = Vec::new();
        for k in 0..self.ends.len() {
            let (start, end) = (self.start(k), self.ends[k]);
            let (lo, hi) = (from.max(start), to.min(end));
            if lo < hi {
                pieces.push((k, self.element_at(k, lo - start)..self.element_at(k, hi - start)));
            }
        }
        pieces
    }
}

impl BreakHooks for FootnoteHooks {
    type State = i32;

    fn fit(&self, candidate: &Candidate<'_, i32>) -> HookFit<i32> {
        let placed = candidate.from.state;
        let cited = self.cited_before[candidate.break_index];
        let pending_end = self.end_of_first(cited);
        if pending_end <= placed {
            return HookFit {
                extra: Measure::ZERO,
                demerits: 0.0,
                state: placed,
            };
        }

        let room = candidate.target - candidate.natural.width - self.separator.width;
        let mut stop = pending_end;
        if pending_end - placed > room {
            let cited_earlier = self.cited_before[candidate.previous_break];
            // Footnotes already pending at the previous breakpoint may only be
            // deferred again right after a page break or at the very end,
            // where trailing pages take the rest.
            let free = candidate.first_after_from || candidate.kind == BreakKind::End;
            if cited > cited_earlier || free {
                let must_reach = if free {
                    placed
                } else {
                    self.end_of_first(cited_earlier)
                };
                if let Some(split) = self.furthest_stop(placed, placed + room, cited) {
                    if split >= must_reach {
                        stop = split;
                    }
                }
            }
        }

        let mut demerits = 0.0;
        let split = (0..cited).any(|k| self.start(k) < stop && stop < self.ends[k]);
        if split {
            demerits += self.split_demerits;
        }
        let deferred = (0..cited).filter(|k| self.start(*k) >= stop).count();
        demerits += deferred as f64 * self.deferred_demerits;

        HookFit {
            extra: Measure::new(stop - placed + self.separator.width, self.separator.stretch, self.separator.shrink),
            demerits,
            state: stop,
        }
    }
}
