//! Paragraph producer.
//!
//! Turns text into boxes, glue and penalties using the classic patterns for
//! justified, ragged and centered setting. Words are measured by a caller
//! supplied function; shaping and hyphenation happen elsewhere. Soft hyphens
//! already present in the text become flagged penalties.

use crate::config::Space;
use folio_traits::{ElementSource, SourceError};
use folio_types::{Element, FIL, INFINITE};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

const SOFT_HYPHEN: char = '\u{AD}';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Justify,
    Left,
    Right,
    Center,
}

pub type MeasureFn = Arc<dyn Fn(&str) -> i32 + Send + Sync>;

#[derive(Clone)]
pub struct ParagraphBuilder {
    text: String,
    measure: MeasureFn,
    align: TextAlign,
    indent: i32,
    space: Option<Space>,
    ragged_stretch: Option<i32>,
    hyphen_penalty: i32,
}

impl ParagraphBuilder {
    pub fn new(text: impl Into<String>, measure: impl Fn(&str) -> i32 + Send + Sync + 'static) -> Self {
        Self {
            text: text.into(),
            measure: Arc::new(measure),
            align: TextAlign::Justify,
            indent: 0,
            space: None,
            ragged_stretch: None,
            hyphen_penalty: 50,
        }
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Width of the box opening the first line. Ignored for right-aligned and
    /// centered text.
    pub fn indent(mut self, indent: i32) -> Self {
        self.indent = indent;
        self
    }

    /// Interword space. Defaults to the measured width of a space with half of
    /// it as stretch and a third as shrink.
    pub fn space(mut self, space: Space) -> Self {
        self.space = Some(space);
        self
    }

    /// Stretch available at ragged line ends. Defaults to three spaces.
    pub fn ragged_stretch(mut self, stretch: i32) -> Self {
        self.ragged_stretch = Some(stretch);
        self
    }

    pub fn hyphen_penalty(mut self, penalty: i32) -> Self {
        self.hyphen_penalty = penalty;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn build(&self) -> Result<Vec<Element>, SourceError> {
        if self.text.trim().is_empty() {
            return Err(SourceError::Empty(self.label()));
        }

        let space = self.space.unwrap_or_else(|| {
            let w = (self.measure)(" ");
            Space {
                width: w,
                stretch: w / 2,
                shrink: w / 3,
            }
        });
        let mut out = Sequence {
            elements: Vec::new(),
            align: self.align,
            space,
            ragged: self.ragged_stretch.unwrap_or(3 * space.width),
        };

        out.open_line();
        if self.indent > 0 && matches!(self.align, TextAlign::Justify | TextAlign::Left) {
            out.elements.push(Element::boxed(self.indent));
        }

        for (l, line) in self.text.split('\n').enumerate() {
            if l > 0 {
                out.line_break();
                out.open_line();
            }
            for (w, word) in line.split_whitespace().enumerate() {
                if w > 0 {
                    out.word_space();
                }
                self.push_word(&mut out.elements, word)?;
            }
        }
        out.close();
        Ok(out.elements)
    }

    fn push_word(&self, elements: &mut Vec<Element>, word: &str) -> Result<(), SourceError> {
        let hyphen = (self.measure)("-");
        let mut first = true;
        for fragment in word.split(SOFT_HYPHEN).filter(|f| !f.is_empty()) {
            let width = (self.measure)(fragment);
            if width < 0 {
                return Err(SourceError::Measure {
                    text: fragment.to_string(),
                    message: format!("negative width {width}"),
                });
            }
            if !first {
                elements.push(Element::penalty(hyphen, self.hyphen_penalty, true));
            }
            elements.push(Element::boxed(width));
            first = false;
        }
        Ok(())
    }
}

/// Element sequence under construction for one alignment.
struct Sequence {
    elements: Vec<Element>,
    align: TextAlign,
    space: Space,
    ragged: i32,
}

impl Sequence {
    /// Pushes glue, merging it into a directly preceding glue.
    fn glue(&mut self, width: i32, stretch: i32, shrink: i32) {
        if let Some(Element::Glue {
            width: w,
            stretch: st,
            shrink: sh,
            ..
        }) = self.elements.last_mut()
        {
            *w += width;
            *st += stretch;
            *sh += shrink;
        } else {
            self.elements.push(Element::glue(width, stretch, shrink));
        }
    }

    /// Leading stretch of right-aligned and centered lines. The zero box keeps
    /// it from being discarded after a break.
    fn open_line(&mut self) {
        if matches!(self.align, TextAlign::Right | TextAlign::Center) {
            self.elements.push(Element::boxed(0));
            self.elements.push(Element::forbidden_break());
            self.glue(0, self.ragged, 0);
        }
    }

    fn word_space(&mut self) {
        let (s, r) = (self.space, self.ragged);
        match self.align {
            TextAlign::Justify => self.glue(s.width, s.stretch, s.shrink),
            TextAlign::Left => {
                self.glue(0, r, 0);
                self.elements.push(Element::penalty(0, 0, false));
                self.glue(s.width, -r, 0);
            }
            TextAlign::Right => {
                self.elements.push(Element::penalty(0, 0, false));
                self.glue(s.width, -r, 0);
                self.open_line();
            }
            TextAlign::Center => {
                self.glue(0, r, 0);
                self.elements.push(Element::penalty(0, 0, false));
                self.glue(s.width, -2 * r, 0);
                self.open_line();
            }
        }
    }

    /// Trailing material of a line that ends the paragraph or a forced break.
    fn finish_line(&mut self) {
        match self.align {
            TextAlign::Justify | TextAlign::Left => {
                self.elements.push(Element::forbidden_break());
                self.glue(0, FIL, 0);
            }
            TextAlign::Center => self.glue(0, self.ragged, 0),
            TextAlign::Right => {}
        }
    }

    fn line_break(&mut self) {
        self.finish_line();
        self.elements.push(Element::penalty(0, -INFINITE, false));
    }

    fn close(&mut self) {
        self.finish_line();
    }
}

impl fmt::Debug for ParagraphBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParagraphBuilder")
            .field("text", &self.label())
            .field("align", &self.align)
            .field("indent", &self.indent)
            .finish_non_exhaustive()
    }
}

impl ElementSource for ParagraphBuilder {
    fn elements(&self) -> Result<Vec<Element>, SourceError> {
        self.build()
    }

    fn label(&self) -> String {
        let mut label: String = self.text.chars().take(24).collect();
        if self.text.chars().count() > 24 {
            label.push('…');
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relax::Breaker;
    use crate::validate::validate;

    fn mono(text: &str) -> i32 {
        text.chars().count() as i32 * 10
    }

    const TEXT: &str = "the quick brown fox jumps over the lazy dog and keeps running";

    #[test]
    fn test_justified_pattern() {
        let seq = ParagraphBuilder::new("ab cd", mono).build().unwrap();
        assert_eq!(
            seq,
            vec![
                Element::boxed(20),
                Element::glue(10, 5, 3),
                Element::boxed(20),
                Element::forbidden_break(),
                Element::glue(0, FIL, 0),
            ]
        );
    }

    #[test]
    fn test_ragged_right_pattern() {
        let seq = ParagraphBuilder::new("ab cd", mono)
            .align(TextAlign::Left)
            .ragged_stretch(30)
            .build()
            .unwrap();
        assert_eq!(&seq[1..4], &[
            Element::glue(0, 30, 0),
            Element::penalty(0, 0, false),
            Element::glue(10, -30, 0),
        ]);
    }

    #[test]
    fn test_right_and_center_open_every_line_with_stretch() {
        for align in [TextAlign::Right, TextAlign::Center] {
            let seq = ParagraphBuilder::new("ab cd", mono).align(align).build().unwrap();
            assert_eq!(seq[0], Element::boxed(0));
            assert!(seq[1].is_forbidden_break());
            assert_eq!(seq[2].stretch(), 30);
            assert!(validate(&seq).is_ok());
        }
    }

    #[test]
    fn test_soft_hyphen_becomes_flagged_penalty() {
        let seq = ParagraphBuilder::new("hy\u{AD}phen", mono).build().unwrap();
        assert_eq!(seq[0], Element::boxed(20));
        assert_eq!(seq[1], Element::penalty(10, 50, true));
        assert_eq!(seq[2], Element::boxed(40));
    }

    #[test]
    fn test_newline_forces_break() {
        let seq = ParagraphBuilder::new("ab\ncd", mono).build().unwrap();
        let forced: Vec<usize> = seq
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_forced_break())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(forced.len(), 1);

        let result = Breaker::default().break_lines(&seq, &200).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.segments[0].is_forced());
    }

    #[test]
    fn test_empty_lines_do_not_stack_glue() {
        for align in [TextAlign::Justify, TextAlign::Left, TextAlign::Right, TextAlign::Center] {
            let seq = ParagraphBuilder::new("ab\n\ncd", mono).align(align).build().unwrap();
            assert!(validate(&seq).is_ok(), "{align:?}");
        }
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let err = ParagraphBuilder::new("  \n ", mono).build().unwrap_err();
        assert!(matches!(err, SourceError::Empty(_)));
    }

    #[test]
    fn test_every_alignment_breaks_without_degrading() {
        for align in [TextAlign::Justify, TextAlign::Left, TextAlign::Right, TextAlign::Center] {
            let seq = ParagraphBuilder::new(TEXT, mono).align(align).build().unwrap();
            let result = Breaker::default().break_lines(&seq, &200).unwrap();
            assert!(result.len() >= 3, "{align:?}");
            assert!(!result.degraded(), "{align:?}");
        }
    }

    #[test]
    fn test_indent_opens_first_line_only() {
        let seq = ParagraphBuilder::new("ab\ncd", mono).indent(15).build().unwrap();
        assert_eq!(seq[0], Element::boxed(15));
        assert_eq!(seq.iter().filter(|e| **e == Element::boxed(15)).count(), 1);
    }
}
