//! FAST-9 corner detection with score-ordered suppression.

use imageproc::corners::corners_fast9;
use std::cmp::Ordering;

use ::image::GrayImage;

/// Corner candidate on one pyramid level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Corner {
    pub x: u32,
    pub y: u32,
    pub score: f32,
    pub level: usize,
}

/// Descending score, then pyramid level, then row-major position.
pub(crate) fn corner_cmp_desc(a: &Corner, b: &Corner) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.level.cmp(&b.level))
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Detects FAST-9 corners at least `margin` pixels away from every border.
///
/// Corners are suppressed when a stronger corner lies within `nms_radius`
/// (Chebyshev distance). At most `cap` corners are returned, strongest first.
pub(crate) fn detect_corners(
    image: &GrayImage,
    level: usize,
    threshold: u8,
    margin: u32,
    nms_radius: u32,
    cap: usize,
) -> Vec<Corner> {
    if cap == 0 || image.width() <= 2 * margin || image.height() <= 2 * margin {
        return Vec::new();
    }
    let max_x = image.width() - margin;
    let max_y = image.height() - margin;

    let mut corners: Vec<Corner> = corners_fast9(image, threshold)
        .into_iter()
        .filter(|c| c.x >= margin && c.y >= margin && c.x < max_x && c.y < max_y)
        .map(|c| Corner {
            x: c.x,
            y: c.y,
            score: c.score,
            level,
        })
        .collect();
    corners.sort_by(corner_cmp_desc);

    let mut kept: Vec<Corner> = Vec::new();
    'outer: for corner in corners {
        for other in kept.iter() {
            let dx = corner.x.abs_diff(other.x);
            let dy = corner.y.abs_diff(other.y);
            if dx.max(dy) <= nms_radius {
                continue 'outer;
            }
        }
        kept.push(corner);
        if kept.len() == cap {
            break;
        }
    }
    kept
}
