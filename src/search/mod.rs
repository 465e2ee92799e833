//! Two-stage recognition of a query region against a template index.
//!
//! Keypoint matching runs first. When its evidence is weak the correlation
//! fallback is consulted and may replace the keypoint answer; when the query
//! has no keypoints at all the fallback answer is returned unconditionally.

mod correlation;
mod keypoint;

use crate::image::to_gray;
use crate::index::TemplateIndex;
use crate::trace::{trace_event, trace_span};
use crate::util::{ItemRecError, ItemRecResult};
use ::image::{GrayImage, RgbImage};
use std::fmt;

/// Label reported when no template has enough evidence.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Score reported with [`UNKNOWN_LABEL`] when no template could vote.
pub const NO_MATCH_SCORE: f32 = -1.0;

/// Algorithm that produced a recognition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Keypoint descriptor matching; score is a good-match count.
    Orb,
    /// Normalized cross-correlation; score is in `[-1, 1]`.
    Corr,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Orb => "orb",
            Method::Corr => "corr",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one recognition call.
#[derive(Clone, Debug, PartialEq)]
pub struct Recognition {
    /// Template name, or [`UNKNOWN_LABEL`].
    pub label: String,
    /// Method-dependent score.
    pub score: f32,
    pub method: Method,
}

impl Recognition {
    pub(crate) fn unknown(method: Method) -> Self {
        Self {
            label: UNKNOWN_LABEL.to_owned(),
            score: NO_MATCH_SCORE,
            method,
        }
    }

    /// True when no template was selected.
    pub fn is_unknown(&self) -> bool {
        self.label == UNKNOWN_LABEL
    }
}

/// Matching configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Lowe ratio: a match is good when `best < ratio * second`.
    pub ratio: f32,
    /// Good-match count below which the correlation fallback is consulted.
    pub min_good_matches: usize,
    /// Fallback score at or above which the fallback replaces a weak keypoint result.
    pub fallback_min_score: f32,
    /// Score templates in parallel (requires the `rayon` feature).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            ratio: 0.75,
            min_good_matches: 8,
            fallback_min_score: 0.5,
            parallel: false,
        }
    }
}

/// Stateless matcher; the template index is passed to every call.
#[derive(Clone, Debug, Default)]
pub struct Matcher {
    cfg: MatchConfig,
}

impl Matcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the matching configuration.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn config(&self) -> &MatchConfig {
        &self.cfg
    }

    /// Recognizes a color region.
    ///
    /// Fails only with `InvalidInput` for a zero-area region; any other input
    /// yields a result, possibly [`UNKNOWN_LABEL`].
    pub fn recognize(&self, index: &TemplateIndex, region: &RgbImage) -> ItemRecResult<Recognition> {
        let gray = to_gray(region)?;
        self.recognize_gray(index, &gray)
    }

    /// Recognizes an already grayscale region.
    pub fn recognize_gray(
        &self,
        index: &TemplateIndex,
        gray: &GrayImage,
    ) -> ItemRecResult<Recognition> {
        if gray.width() == 0 || gray.height() == 0 {
            return Err(ItemRecError::InvalidInput("region has zero area"));
        }
        let _span =
            trace_span!("recognize", width = gray.width(), height = gray.height()).entered();

        let query = index.detector().detect_and_compute(gray);
        trace_event!("query_features", keypoints = query.len());
        if query.is_empty() {
            return Ok(self.correlate_fallback(index, gray));
        }

        let best = keypoint::best_match(index, query.descriptors(), &self.cfg);
        let best_score = best.map(|(_, score)| score);
        trace_event!("keypoint_best", score = best_score.map_or(-1, |s| s as i64));

        let keypoint_result = match best {
            Some((idx, score)) => Recognition {
                label: index.templates()[idx].name().to_owned(),
                score: score as f32,
                method: Method::Orb,
            },
            None => Recognition::unknown(Method::Orb),
        };

        let weak = best_score.map_or(true, |s| s < self.cfg.min_good_matches);
        if weak {
            let fallback = self.correlate_fallback(index, gray);
            let accepted = fallback.score >= self.cfg.fallback_min_score;
            trace_event!("fallback", score = fallback.score, accepted = accepted);
            if accepted {
                return Ok(fallback);
            }
        }
        Ok(keypoint_result)
    }

    /// Correlation-only recognition of a grayscale region.
    ///
    /// Never fails: templates that cannot be compared are skipped and an
    /// empty outcome is reported as [`UNKNOWN_LABEL`] with [`NO_MATCH_SCORE`].
    pub fn correlate_fallback(&self, index: &TemplateIndex, gray: &GrayImage) -> Recognition {
        let _span = trace_span!("correlation_fallback", templates = index.len()).entered();
        match correlation::best_match(index, gray, self.cfg.parallel) {
            Some((idx, score)) => Recognition {
                label: index.templates()[idx].name().to_owned(),
                score,
                method: Method::Corr,
            },
            None => Recognition::unknown(Method::Corr),
        }
    }
}
