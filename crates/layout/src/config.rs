use serde::{Deserialize, Serialize};

/// Weights of the demerit surcharges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemeritWeights {
    /// Added to the badness of every segment before squaring. Favors fewer
    /// segments.
    ///
    /// Defaults to `1.0`.
    pub line_penalty: f64,
    /// Added when a flagged break follows another flagged break (two hyphenated
    /// lines in a row).
    ///
    /// Defaults to `10000.0`.
    pub flagged_demerits: f64,
    /// Added when adjacent segments differ by more than one fitness class.
    ///
    /// Defaults to `3000.0`.
    pub fitness_demerits: f64,
}

impl Default for DemeritWeights {
    fn default() -> Self {
        Self {
            line_penalty: 1.0,
            flagged_demerits: 10_000.0,
            fitness_demerits: 3_000.0,
        }
    }
}

/// Tuning of the breakpoint search and its relaxation passes.
///
/// Every field has a default, so a partial JSON object deserializes into a
/// complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakingConfig {
    /// Largest adjustment ratio accepted by the strict pass.
    ///
    /// Defaults to `1.0`.
    pub tolerance: f64,
    /// Largest adjustment ratio accepted by the loosened pass and by the
    /// force-everywhere pass before it resorts to restarts.
    ///
    /// Defaults to `20.0`.
    pub loose_tolerance: f64,
    /// If set, a strict or loosened result whose worst natural-break ratio
    /// exceeds this bound is rejected and the next pass runs.
    pub acceptable_ratio: Option<f64>,
    /// Maximum number of segments the caller accepts.
    pub max_segments: Option<u32>,
    /// Preferred deviation from the optimal number of segments. Negative values
    /// ask for tighter, positive values for looser results.
    pub looseness: i32,
    /// When false, flagged penalties are not breakpoints in the strict pass.
    ///
    /// Defaults to `true`.
    pub allow_flagged_breaks: bool,
    /// Saturation value of the cubic badness.
    ///
    /// Defaults to `10000.0`.
    pub badness_cap: f64,
    pub weights: DemeritWeights,
}

impl Default for BreakingConfig {
    fn default() -> Self {
        Self {
            tolerance: 1.0,
            loose_tolerance: 20.0,
            acceptable_ratio: None,
            max_segments: None,
            looseness: 0,
            allow_flagged_breaks: true,
            badness_cap: 10_000.0,
            weights: DemeritWeights::default(),
        }
    }
}

/// An elastic vertical or horizontal space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Space {
    pub width: i32,
    pub stretch: i32,
    pub shrink: i32,
}

impl Space {
    pub fn fixed(width: i32) -> Self {
        Self {
            width,
            stretch: 0,
            shrink: 0,
        }
    }
}

/// Configuration of footnote-aware page breaking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageBreakingConfig {
    #[serde(flatten)]
    pub breaking: BreakingConfig,
    /// Space inserted between the body and the first footnote on a page.
    pub footnote_separator: Space,
    /// Added when a footnote is split across pages.
    ///
    /// Defaults to `5000.0`.
    pub split_footnote_demerits: f64,
    /// Added for each cited footnote left entirely for a later page.
    ///
    /// Defaults to `10000.0`.
    pub deferred_footnote_demerits: f64,
}

impl Default for PageBreakingConfig {
    fn default() -> Self {
        Self {
            breaking: BreakingConfig::default(),
            footnote_separator: Space::default(),
            split_footnote_demerits: 5_000.0,
            deferred_footnote_demerits: 10_000.0,
        }
    }
}
