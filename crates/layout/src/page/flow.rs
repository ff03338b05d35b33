use folio_traits::{ElementSource, SourceError};
use folio_types::{Element, FIL};
use serde::{Deserialize, Serialize};

/// A footnote body and the index of the line box that cites it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Footnote {
    pub citation: usize,
    pub elements: Vec<Element>,
}

/// Output of [`FlowBuilder`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageFlow {
    pub elements: Vec<Element>,
    /// Sorted by citation.
    pub footnotes: Vec<Footnote>,
}

impl ElementSource for PageFlow {
    fn elements(&self) -> Result<Vec<Element>, SourceError> {
        Ok(self.elements.clone())
    }

    fn label(&self) -> String {
        format!("flow of {} elements", self.elements.len())
    }
}

/// A block of lines: a laid out paragraph, a table row group, an image.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Block {
    /// Height of each line.
    pub lines: Vec<i32>,
    pub space_before: i32,
    pub space_after: i32,
    pub keep_together: bool,
    pub keep_with_next: bool,
    pub keep_with_previous: bool,
    /// Minimum lines left at the bottom of a page. 0 and 1 mean no constraint.
    pub orphans: u32,
    /// Minimum lines carried to the top of a page.
    pub widows: u32,
    /// Footnote bodies keyed by the index of the citing line.
    pub footnotes: Vec<(usize, Vec<Element>)>,
}

impl Block {
    pub fn new(lines: Vec<i32>) -> Self {
        Self {
            lines,
            ..Default::default()
        }
    }

    /// `count` lines of equal height.
    pub fn lines(count: usize, height: i32) -> Self {
        Self::new(vec![height; count])
    }

    pub fn space_before(mut self, space: i32) -> Self {
        self.space_before = space;
        self
    }

    pub fn space_after(mut self, space: i32) -> Self {
        self.space_after = space;
        self
    }

    pub fn keep_together(mut self) -> Self {
        self.keep_together = true;
        self
    }

    pub fn keep_with_next(mut self) -> Self {
        self.keep_with_next = true;
        self
    }

    pub fn keep_with_previous(mut self) -> Self {
        self.keep_with_previous = true;
        self
    }

    pub fn orphans(mut self, orphans: u32) -> Self {
        self.orphans = orphans;
        self
    }

    pub fn widows(mut self, widows: u32) -> Self {
        self.widows = widows;
        self
    }

    pub fn footnote(mut self, line: usize, body: Vec<Element>) -> Self {
        self.footnotes.push((line, body));
        self
    }

    /// A page may break after the first `before` lines.
    fn breakable_after(&self, before: usize) -> bool {
        let after = self.lines.len() - before;
        !self.keep_together
            && before >= self.orphans.max(1) as usize
            && after >= self.widows.max(1) as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Item {
    Block(Block),
    PageBreak,
}

/// Builds a page flow from blocks.
///
/// Space between blocks collapses to the larger of the two. With a ragged
/// bottom every legal break carries that much stretch, so pages need not be
/// filled exactly.
#[derive(Debug, Clone, Default)]
pub struct FlowBuilder {
    items: Vec<Item>,
    ragged_bottom: Option<i32>,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ragged_bottom(mut self, stretch: i32) -> Self {
        self.ragged_bottom = Some(stretch);
        self
    }

    pub fn block(mut self, block: Block) -> Self {
        self.items.push(Item::Block(block));
        self
    }

    pub fn push(&mut self, block: Block) {
        self.items.push(Item::Block(block));
    }

    /// Forces the next block onto a new page.
    pub fn page_break(mut self) -> Self {
        self.items.push(Item::PageBreak);
        self
    }

    pub fn build(&self) -> Result<PageFlow, SourceError> {
        let mut flow = PageFlow::default();
        let mut previous: Option<&Block> = None;
        let mut break_pending = false;

        for item in &self.items {
            let block = match item {
                Item::PageBreak => {
                    break_pending = true;
                    continue;
                }
                Item::Block(block) if block.lines.is_empty() => continue,
                Item::Block(block) => block,
            };

            if let Some(prev) = previous {
                let space = prev.space_after.max(block.space_before);
                if break_pending {
                    flow.elements.push(Element::forced_break());
                    flow.elements.push(Element::glue(space, 0, 0));
                } else if prev.keep_with_next || block.keep_with_previous {
                    flow.elements.push(Element::forbidden_break());
                    flow.elements.push(Element::glue(space, 0, 0));
                } else {
                    self.legal_break(&mut flow.elements, space);
                }
            }
            break_pending = false;

            for (k, height) in block.lines.iter().enumerate() {
                if k > 0 && block.breakable_after(k) {
                    self.legal_break(&mut flow.elements, 0);
                }
                let citation = flow.elements.len();
                flow.elements.push(Element::boxed(*height));
                for (_, body) in block.footnotes.iter().filter(|(line, _)| *line == k) {
                    flow.footnotes.push(Footnote {
                        citation,
                        elements: body.clone(),
                    });
                }
            }
            if let Some((line, _)) = block.footnotes.iter().find(|(line, _)| *line >= block.lines.len()) {
                return Err(SourceError::Malformed(format!(
                    "footnote cites line {} of a {}-line block",
                    line,
                    block.lines.len()
                )));
            }
            previous = Some(block);
        }

        if flow.elements.is_empty() {
            return Err(SourceError::Empty("page flow".to_string()));
        }
        // The last page may stay short.
        flow.elements.push(Element::forbidden_break());
        flow.elements.push(Element::glue(0, FIL, 0));
        Ok(flow)
    }

    fn legal_break(&self, elements: &mut Vec<Element>, space: i32) {
        match self.ragged_bottom {
            Some(stretch) => {
                elements.push(Element::glue(0, stretch, 0));
                elements.push(Element::penalty(0, 0, false));
                elements.push(Element::glue(space, -stretch, 0));
            }
            None => elements.push(Element::glue(space, 0, 0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_types::is_legal_breakpoint;

    fn legal_breaks(flow: &PageFlow) -> Vec<usize> {
        (1..flow.elements.len())
            .filter(|i| is_legal_breakpoint(&flow.elements, *i))
            .collect()
    }

    #[test]
    fn test_lines_are_separated_by_breaks() {
        let flow = FlowBuilder::new().block(Block::lines(3, 12)).build().unwrap();
        assert_eq!(flow.elements.len(), 7);
        assert_eq!(legal_breaks(&flow), vec![1, 3]);
        assert_eq!(flow.elements[6], Element::glue(0, FIL, 0));
    }

    #[test]
    fn test_keep_together_leaves_no_inner_break() {
        let flow = FlowBuilder::new()
            .block(Block::lines(3, 12).keep_together())
            .build()
            .unwrap();
        assert_eq!(flow.elements.len(), 5);
        assert!(legal_breaks(&flow).is_empty());
    }

    #[test]
    fn test_widows_and_orphans_remove_edge_breaks() {
        let flow = FlowBuilder::new()
            .block(Block::lines(5, 12).orphans(2).widows(2))
            .build()
            .unwrap();
        // Boxes at 0, 1, 3, 5, 6: breaks only after the second and third line.
        assert_eq!(legal_breaks(&flow), vec![2, 4]);
    }

    #[test]
    fn test_space_between_blocks_collapses() {
        let flow = FlowBuilder::new()
            .block(Block::lines(1, 12).space_after(6))
            .block(Block::lines(1, 12).space_before(9))
            .build()
            .unwrap();
        assert_eq!(flow.elements[1], Element::glue(9, 0, 0));
    }

    #[test]
    fn test_keep_with_next_forbids_break_between_blocks() {
        let flow = FlowBuilder::new()
            .ragged_bottom(50)
            .block(Block::lines(1, 12).keep_with_next())
            .block(Block::lines(1, 12))
            .build()
            .unwrap();
        assert!(flow.elements[1].is_forbidden_break());
        assert!(legal_breaks(&flow).is_empty());
    }

    #[test]
    fn test_page_break_is_forced() {
        let flow = FlowBuilder::new()
            .block(Block::lines(1, 12))
            .page_break()
            .block(Block::lines(1, 12))
            .build()
            .unwrap();
        assert!(flow.elements[1].is_forced_break());
    }

    #[test]
    fn test_footnote_citation_points_at_line_box() {
        let body = vec![Element::boxed(8)];
        let flow = FlowBuilder::new()
            .ragged_bottom(50)
            .block(Block::lines(3, 12).footnote(2, body.clone()))
            .build()
            .unwrap();
        assert_eq!(flow.footnotes.len(), 1);
        let citation = flow.footnotes[0].citation;
        assert_eq!(flow.elements[citation], Element::boxed(12));
        assert_eq!(citation, 8);
    }

    #[test]
    fn test_footnote_on_missing_line_is_malformed() {
        let err = FlowBuilder::new()
            .block(Block::lines(1, 12).footnote(4, vec![Element::boxed(1)]))
            .build()
            .unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
