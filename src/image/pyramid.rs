//! Scale pyramid for grayscale `u8` images.
//!
//! Downsampling uses a 2x2 box filter with integer rounding:
//! `dst = ((a + b + c + d) + 2) / 4`. Level `i` has scale `2^i` relative to
//! the base, which keypoint detection uses to map corners back to base
//! coordinates.

use ::image::GrayImage;

/// Owned image pyramid built from a base level.
pub struct GrayPyramid {
    levels: Vec<GrayImage>,
}

impl GrayPyramid {
    /// Builds a pyramid from a base grayscale image.
    ///
    /// `max_levels` is clamped to at least 1 so the base level is always present.
    /// Building stops early once a level would drop below 2x2.
    pub fn build(base: &GrayImage, max_levels: usize) -> Self {
        let max_levels = max_levels.max(1);
        let mut levels = Vec::with_capacity(max_levels);
        levels.push(base.clone());

        while levels.len() < max_levels {
            let Some(next) = levels.last().and_then(downsample_2x) else {
                break;
            };
            levels.push(next);
        }

        Self { levels }
    }

    /// Returns all pyramid levels (level 0 is the base resolution).
    pub fn levels(&self) -> &[GrayImage] {
        &self.levels
    }

    /// Returns a specific pyramid level.
    pub fn level(&self, index: usize) -> Option<&GrayImage> {
        self.levels.get(index)
    }

    /// Returns the factor mapping level coordinates back to the base level.
    pub fn scale(level: usize) -> f32 {
        (1u32 << level.min(31)) as f32
    }
}

/// Halves both dimensions with a 2x2 box filter; `None` below 2x2.
pub fn downsample_2x(src: &GrayImage) -> Option<GrayImage> {
    if src.width() < 2 || src.height() < 2 {
        return None;
    }
    let dst_width = src.width() / 2;
    let dst_height = src.height() / 2;
    let src_width = src.width() as usize;
    let data = src.as_raw();

    let mut dst = Vec::with_capacity(dst_width as usize * dst_height as usize);
    for y in 0..dst_height as usize {
        let row0 = &data[(2 * y) * src_width..(2 * y + 1) * src_width];
        let row1 = &data[(2 * y + 1) * src_width..(2 * y + 2) * src_width];
        for x in 0..dst_width as usize {
            let sum = u16::from(row0[2 * x])
                + u16::from(row0[2 * x + 1])
                + u16::from(row1[2 * x])
                + u16::from(row1[2 * x + 1]);
            dst.push(((sum + 2) / 4) as u8);
        }
    }

    GrayImage::from_raw(dst_width, dst_height, dst)
}
