//! Correlation fallback: whole-region NCC against resized templates.

use crate::image::resize::resize_area;
use crate::index::{IndexedTemplate, TemplateIndex};
use crate::kernel::{DefaultKernel, Kernel};
use crate::search::NO_MATCH_SCORE;
use crate::util::ItemRecResult;
use ::image::GrayImage;

/// Resizes the template to the query size and correlates the two.
fn vote(tpl: &IndexedTemplate, query: &GrayImage) -> ItemRecResult<f32> {
    let resized = resize_area(tpl.gray(), query.width(), query.height())?;
    DefaultKernel::ncc(resized.as_raw(), query.as_raw())
}

fn votes(index: &TemplateIndex, query: &GrayImage, parallel: bool) -> Vec<Option<f32>> {
    // A template that fails to resize or correlate simply does not vote.
    let vote_one = |tpl: &IndexedTemplate| vote(tpl, query).ok();

    #[cfg(feature = "rayon")]
    if parallel {
        use rayon::prelude::*;
        return index.templates().par_iter().map(vote_one).collect();
    }
    #[cfg(not(feature = "rayon"))]
    let _ = parallel;

    index.templates().iter().map(vote_one).collect()
}

/// Returns `(template position, score)` of the highest-correlating template.
///
/// A template must beat [`NO_MATCH_SCORE`] strictly to be selected, and the
/// first template in index order wins ties.
pub(crate) fn best_match(
    index: &TemplateIndex,
    query: &GrayImage,
    parallel: bool,
) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    let mut best_score = NO_MATCH_SCORE;
    for (idx, score) in votes(index, query, parallel).into_iter().enumerate() {
        let Some(score) = score else {
            continue;
        };
        if score > best_score {
            best_score = score;
            best = Some((idx, score));
        }
    }
    best
}
