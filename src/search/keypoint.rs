//! Keypoint stage: ratio-test match counts per template.

use crate::features::hamming::count_ratio_matches;
use crate::features::Descriptor;
use crate::index::TemplateIndex;
use crate::search::MatchConfig;
use crate::trace::trace_span;

/// Scores every template with descriptors; `None` marks a template that cannot vote.
fn scores(index: &TemplateIndex, query: &[Descriptor], cfg: &MatchConfig) -> Vec<Option<usize>> {
    let score_one = |tpl: &crate::index::IndexedTemplate| {
        let desc = tpl.features().descriptors();
        if desc.is_empty() {
            None
        } else {
            Some(count_ratio_matches(desc, query, cfg.ratio))
        }
    };

    #[cfg(feature = "rayon")]
    if cfg.parallel {
        use rayon::prelude::*;
        return index.templates().par_iter().map(score_one).collect();
    }

    index.templates().iter().map(score_one).collect()
}

/// Returns `(template position, good-match count)` of the best template.
///
/// The first template in index order wins ties; `None` when no template
/// has descriptors.
pub(crate) fn best_match(
    index: &TemplateIndex,
    query: &[Descriptor],
    cfg: &MatchConfig,
) -> Option<(usize, usize)> {
    let _span = trace_span!("keypoint_stage", query = query.len()).entered();
    let mut best: Option<(usize, usize)> = None;
    for (idx, score) in scores(index, query, cfg).into_iter().enumerate() {
        let Some(score) = score else {
            continue;
        };
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((idx, score));
        }
    }
    best
}
