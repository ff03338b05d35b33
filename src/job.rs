//! JSON job files for the `folio` binary.
//!
//! ```json
//! {
//!   "config": { "tolerance": 2.0 },
//!   "width": 300,
//!   "advance": 6,
//!   "units": [
//!     { "text": "Some words to set", "align": "left" },
//!     { "elements": [{ "type": "box", "width": 20 }] },
//!     { "blocks": [{ "lines": [12, 12, 12] }], "ragged_bottom": 24 }
//!   ]
//! }
//! ```
//!
//! Text is measured with a fixed advance per character. Flow units are
//! paginated with `height`/`heights`; every other unit is broken into lines of
//! `width`/`widths`.

use crate::error::FolioError;
use crate::{Executor, Typesetter};
use folio_layout::{
    Block, BreakPass, BreakResult, FitnessClass, FlowBuilder, PageBreakingConfig, PageFlow, Pagination,
    ParagraphBuilder, TextAlign,
};
use folio_traits::{ElementSource, SourceError};
use folio_types::Element;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_advance() -> i32 {
    600
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Breaking settings, footnote settings included.
    #[serde(default)]
    pub config: PageBreakingConfig,
    pub width: Option<i32>,
    pub widths: Option<Vec<i32>>,
    pub height: Option<i32>,
    pub heights: Option<Vec<i32>>,
    /// Width of every character of text units.
    #[serde(default = "default_advance")]
    pub advance: i32,
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Unit {
    Text {
        text: String,
        #[serde(default)]
        align: TextAlign,
        #[serde(default)]
        indent: i32,
    },
    Elements {
        elements: Vec<Element>,
    },
    Flow {
        blocks: Vec<Block>,
        ragged_bottom: Option<i32>,
    },
}

/// A unit broken into lines.
#[derive(Debug)]
pub enum LineUnit {
    Paragraph(ParagraphBuilder),
    Elements(Vec<Element>),
}

impl ElementSource for LineUnit {
    fn elements(&self) -> Result<Vec<Element>, SourceError> {
        match self {
            LineUnit::Paragraph(paragraph) => paragraph.elements(),
            LineUnit::Elements(elements) => elements.elements(),
        }
    }

    fn label(&self) -> String {
        match self {
            LineUnit::Paragraph(paragraph) => paragraph.label(),
            LineUnit::Elements(elements) => elements.label(),
        }
    }
}

impl Job {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FolioError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self, FolioError> {
        let job: Job = serde_json::from_str(json)?;
        if job.advance < 0 {
            return Err(FolioError::Job(format!("negative advance {}", job.advance)));
        }
        Ok(job)
    }

    pub fn line_sizes(&self) -> Result<Vec<i32>, FolioError> {
        sizes(self.width, self.widths.as_ref(), "width")
    }

    pub fn page_sizes(&self) -> Result<Vec<i32>, FolioError> {
        sizes(self.height, self.heights.as_ref(), "height")
    }

    /// Breaks every unit and reports them in job order.
    pub fn run(&self, typesetter: &Typesetter) -> Result<Report, FolioError> {
        let mut lines = Vec::new();
        let mut flows = Vec::new();
        let mut order = Vec::with_capacity(self.units.len());

        for unit in &self.units {
            match unit {
                Unit::Text { text, align, indent } => {
                    let advance = self.advance;
                    let paragraph = ParagraphBuilder::new(text.clone(), move |s| s.chars().count() as i32 * advance)
                        .align(*align)
                        .indent(*indent);
                    order.push(Slot::Line(lines.len()));
                    lines.push(LineUnit::Paragraph(paragraph));
                }
                Unit::Elements { elements } => {
                    order.push(Slot::Line(lines.len()));
                    lines.push(LineUnit::Elements(elements.clone()));
                }
                Unit::Flow { blocks, ragged_bottom } => {
                    let mut builder = FlowBuilder::new();
                    if let Some(stretch) = ragged_bottom {
                        builder = builder.ragged_bottom(*stretch);
                    }
                    for block in blocks {
                        builder.push(block.clone());
                    }
                    order.push(Slot::Flow(flows.len()));
                    flows.push(builder.build());
                }
            }
        }

        let line_results = if lines.is_empty() {
            Vec::new()
        } else {
            typesetter.break_all(lines, self.line_sizes()?)
        };
        let mut line_results: Vec<_> = line_results.into_iter().map(Some).collect();

        let built: Vec<PageFlow> = flows.iter().filter_map(|f| f.as_ref().ok().cloned()).collect();
        let paginated = if built.is_empty() {
            Vec::new()
        } else {
            typesetter.paginate_all(built, self.page_sizes()?)
        };
        let mut paginated = paginated.into_iter();
        let mut flow_results: Vec<Option<Result<Pagination, FolioError>>> = flows
            .into_iter()
            .map(|flow| match flow {
                Ok(_) => paginated.next(),
                Err(err) => Some(Err(err.into())),
            })
            .collect();

        let units = order
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                let outcome = match slot {
                    Slot::Line(k) => line_results[k].take().map(|r| r.map(UnitOutcome::lines)),
                    Slot::Flow(k) => flow_results[k].take().map(|r| r.map(UnitOutcome::pages)),
                };
                match outcome {
                    Some(Ok(outcome)) => UnitReport { index, outcome: Some(outcome), error: None },
                    Some(Err(err)) => UnitReport { index, outcome: None, error: Some(err.to_string()) },
                    None => UnitReport { index, outcome: None, error: Some("unit was not run".to_string()) },
                }
            })
            .collect();

        Ok(Report {
            executor: typesetter.executor().name().to_string(),
            units,
        })
    }
}

fn sizes(single: Option<i32>, many: Option<&Vec<i32>>, name: &str) -> Result<Vec<i32>, FolioError> {
    match (single, many) {
        (_, Some(many)) if !many.is_empty() => Ok(many.clone()),
        (Some(single), _) => Ok(vec![single]),
        _ => Err(FolioError::Job(format!("no {name} given"))),
    }
}

enum Slot {
    Line(usize),
    Flow(usize),
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub executor: String,
    pub units: Vec<UnitReport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitReport {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: Option<UnitOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UnitOutcome {
    pub boundaries: Vec<usize>,
    pub ratios: Vec<f64>,
    pub fitness: Vec<FitnessClass>,
    pub pass: BreakPass,
    pub degraded: bool,
    pub total_demerits: f64,
    pub nodes_created: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageReport>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PageReport {
    pub body: Option<(usize, usize)>,
    /// (footnote, first element, end element) of each piece.
    pub footnotes: Vec<(usize, usize, usize)>,
    pub overflow: bool,
}

impl UnitOutcome {
    fn lines(result: BreakResult) -> Self {
        Self {
            ratios: result.ratios().collect(),
            fitness: result.segments.iter().map(|s| s.fitness).collect(),
            pass: result.pass,
            degraded: result.degraded(),
            total_demerits: result.total_demerits,
            nodes_created: result.stats.nodes_created,
            boundaries: result.boundaries,
            pages: None,
        }
    }

    fn pages(pagination: Pagination) -> Self {
        let pages = pagination
            .pages
            .iter()
            .map(|page| PageReport {
                body: page.body.as_ref().map(|b| (b.start, b.end)),
                footnotes: page
                    .footnotes
                    .iter()
                    .map(|p| (p.footnote, p.elements.start, p.elements.end))
                    .collect(),
                overflow: page.overflow,
            })
            .collect();
        Self {
            pages: Some(pages),
            ..Self::lines(pagination.result)
        }
    }
}
