#![allow(dead_code)]

use folio::{BreakResult, Element, FIL, INFINITE};
use folio_types::break_kind_at;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const SPACE: (i32, i32, i32) = (10, 5, 3);

/// Width of `text` set in a font where every character is 10 units wide.
pub fn mono(text: &str) -> i32 {
    text.chars().count() as i32 * 10
}

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Words of the given widths separated by interword glue, without a
/// paragraph ending.
pub fn words(widths: &[i32]) -> Vec<Element> {
    let (width, stretch, shrink) = SPACE;
    let mut seq = Vec::new();
    for (k, w) in widths.iter().enumerate() {
        if k > 0 {
            seq.push(Element::glue(width, stretch, shrink));
        }
        seq.push(Element::boxed(*w));
    }
    seq
}

/// [`words`] closed the way paragraphs end: the last line may stay short.
pub fn paragraph(widths: &[i32]) -> Vec<Element> {
    let mut seq = words(widths);
    seq.push(Element::forbidden_break());
    seq.push(Element::glue(0, FIL, 0));
    seq
}

/// A random paragraph of `count` words. With `hyphens`, some words get a
/// flagged penalty in the middle; an occasional forced break starts a new line.
pub fn random_paragraph(rng: &mut StdRng, count: usize, hyphens: bool) -> Vec<Element> {
    let (width, stretch, shrink) = SPACE;
    let mut seq = Vec::new();
    for k in 0..count {
        if k > 0 {
            if rng.random_ratio(1, 40) {
                seq.push(Element::forbidden_break());
                seq.push(Element::glue(0, FIL, 0));
                seq.push(Element::forced_break());
            } else {
                seq.push(Element::glue(width, stretch, shrink));
            }
        }
        if hyphens && rng.random_ratio(1, 5) {
            seq.push(Element::boxed(rng.random_range(10..40)));
            seq.push(Element::penalty(5, 50, true));
            seq.push(Element::boxed(rng.random_range(10..40)));
        } else {
            seq.push(Element::boxed(rng.random_range(20..80)));
        }
    }
    seq.push(Element::forbidden_break());
    seq.push(Element::glue(0, FIL, 0));
    seq
}

/// Boundaries run from 0 to the sequence length, strictly increasing, and every
/// interior one is a breakpoint of the pass that produced them.
pub fn assert_covers(seq: &[Element], result: &BreakResult) {
    let boundaries = &result.boundaries;
    assert_eq!(boundaries.first(), Some(&0));
    assert_eq!(boundaries.last(), Some(&seq.len()));
    assert!(boundaries.windows(2).all(|w| w[0] < w[1]), "{boundaries:?}");
    for b in &boundaries[1..boundaries.len() - 1] {
        let legal = break_kind_at(seq, *b).is_some();
        let box_boundary = result.degraded() && seq[*b].is_box();
        assert!(legal || box_boundary, "boundary {b} is not a breakpoint");
    }
}

/// Indices of penalties that forbid a break.
pub fn forbidden(seq: &[Element]) -> Vec<usize> {
    seq.iter()
        .enumerate()
        .filter(|(_, e)| e.cost().is_some_and(|c| c >= INFINITE))
        .map(|(i, _)| i)
        .collect()
}
