mod common;

use folio::{Block, Element, ExecutorImpl, FlowBuilder, PageBreaker, PageBreakingConfig, PageFlow, Space, Typesetter};

fn footnote(lines: usize) -> Vec<Element> {
    let mut body = Vec::new();
    for k in 0..lines {
        if k > 0 {
            body.push(Element::glue(0, 0, 0));
        }
        body.push(Element::boxed(12));
    }
    body
}

fn chapter() -> PageFlow {
    FlowBuilder::new()
        .ragged_bottom(120)
        .block(Block::lines(1, 24).space_after(12).keep_with_next())
        .block(Block::lines(9, 12).orphans(2).widows(2).footnote(3, footnote(2)))
        .block(Block::lines(5, 12).keep_together().space_before(12))
        .block(Block::lines(7, 12).orphans(2).widows(2).footnote(6, footnote(4)))
        .page_break()
        .block(Block::lines(1, 24).space_after(12).keep_with_next())
        .block(Block::lines(12, 12).widows(3).footnote(0, footnote(1)).footnote(11, footnote(3)))
        .build()
        .unwrap()
}

/// Element ranges of each block's lines, in flow order.
fn line_boxes(flow: &PageFlow) -> Vec<usize> {
    flow.elements
        .iter()
        .enumerate()
        .filter(|(_, e)| e.is_box())
        .map(|(i, _)| i)
        .collect()
}

#[test]
fn test_chapter_paginates_without_degrading() {
    let flow = chapter();
    let pagination = PageBreaker::default().paginate(&flow, &120).unwrap();

    assert!(!pagination.degraded());
    assert!(pagination.pages.iter().all(|p| !p.overflow));
    for page in &pagination.pages {
        if let Some(body) = &page.body {
            assert!(body.natural.width <= body.target || body.natural.shrink > 0);
        }
    }
}

#[test]
fn test_keeps_hold_across_page_boundaries() {
    let flow = chapter();
    let pagination = PageBreaker::default().paginate(&flow, &120).unwrap();
    let boxes = line_boxes(&flow);

    // Heading (box 0) stays with the first line of its block (box 1).
    // The kept block holds boxes 10..15.
    for boundary in &pagination.result.boundaries[1..pagination.result.boundaries.len() - 1] {
        assert!(!(boxes[0] < *boundary && *boundary < boxes[1]), "heading split at {boundary}");
        assert!(!(boxes[10] < *boundary && *boundary < boxes[14]), "kept block split at {boundary}");
    }
}

#[test]
fn test_page_break_starts_a_new_page() {
    let flow = chapter();
    let pagination = PageBreaker::default().paginate(&flow, &120).unwrap();
    let forced = flow.elements.iter().position(Element::is_forced_break).unwrap();

    assert!(pagination.result.boundaries.contains(&forced));
}

#[test]
fn test_every_footnote_is_placed_once_in_order() {
    let flow = chapter();
    let pagination = PageBreaker::default().paginate(&flow, &120).unwrap();

    let mut seen = Vec::new();
    for page in &pagination.pages {
        for piece in &page.footnotes {
            seen.push(piece.footnote);
        }
    }
    seen.dedup();
    assert_eq!(seen, (0..flow.footnotes.len()).collect::<Vec<_>>());

    for (k, note) in flow.footnotes.iter().enumerate() {
        let covered: usize = pagination.pieces_of(k).map(|p| p.elements.len()).sum();
        assert_eq!(covered, note.elements.len());
    }
}

#[test]
fn test_footnote_is_not_placed_before_its_citation() {
    let flow = chapter();
    let pagination = PageBreaker::default().paginate(&flow, &120).unwrap();

    for page in &pagination.pages {
        let Some(body) = &page.body else { continue };
        for piece in &page.footnotes {
            assert!(flow.footnotes[piece.footnote].citation < body.end);
        }
    }
}

#[test]
fn test_separator_is_counted_in_footnote_height() {
    let config = PageBreakingConfig {
        footnote_separator: Space::fixed(6),
        ..PageBreakingConfig::default()
    };
    let flow = chapter();
    let pagination = PageBreaker::new(config).paginate(&flow, &120).unwrap();

    for page in pagination.pages.iter().filter(|p| !p.footnotes.is_empty()) {
        assert!(page.footnote_height >= 6 + 12);
    }
}

#[test]
fn test_varying_page_heights() {
    let flow = chapter();
    let heights = vec![60, 120];
    let pagination = PageBreaker::default().paginate(&flow, &heights).unwrap();

    let first = pagination.pages[0].body.as_ref().unwrap();
    assert_eq!(first.target, 60);
    assert!(pagination.pages[1..].iter().filter_map(|p| p.body.as_ref()).all(|b| b.target == 120));
}

#[test]
fn test_batch_pagination_keeps_order() {
    let flows = vec![chapter(), FlowBuilder::new().ragged_bottom(60).block(Block::lines(3, 12)).build().unwrap()];
    let results = Typesetter::default()
        .with_executor(ExecutorImpl::sequential())
        .paginate_all(flows, 120);

    assert_eq!(results.len(), 2);
    assert!(results[0].as_ref().unwrap().len() > 1);
    assert_eq!(results[1].as_ref().unwrap().len(), 1);
}
