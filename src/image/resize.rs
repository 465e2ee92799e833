//! Area-averaging resize for grayscale `u8` images.
//!
//! Each destination pixel covers a rectangular footprint of the source grid
//! and takes the overlap-weighted mean of the source pixels under it. The
//! filter is separable, so per-axis weights are computed once. Resizing to the
//! source's own dimensions reproduces the source exactly.

use crate::image::checked_dims;
use crate::util::{ItemRecError, ItemRecResult};
use ::image::GrayImage;

/// One source sample contributing to a destination coordinate.
#[derive(Clone, Copy, Debug)]
struct Tap {
    index: usize,
    weight: f64,
}

/// Builds normalized per-axis taps for an area resize from `src` to `dst` samples.
fn axis_taps(src: usize, dst: usize) -> Vec<Vec<Tap>> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(src);
            let mut taps = Vec::with_capacity(last.saturating_sub(first).max(1));
            for s in first..last {
                let overlap = end.min(s as f64 + 1.0) - start.max(s as f64);
                if overlap > 1e-12 {
                    taps.push(Tap {
                        index: s,
                        weight: overlap,
                    });
                }
            }
            if taps.is_empty() {
                taps.push(Tap {
                    index: first.min(src - 1),
                    weight: 1.0,
                });
            }
            let total: f64 = taps.iter().map(|t| t.weight).sum();
            for tap in &mut taps {
                tap.weight /= total;
            }
            taps
        })
        .collect()
}

/// Resizes `src` to `width` x `height` using area interpolation.
///
/// Fails with `InvalidDimensions` when either the source or the target has a
/// zero dimension.
pub fn resize_area(src: &GrayImage, width: u32, height: u32) -> ItemRecResult<GrayImage> {
    let (src_w, src_h) = checked_dims(src.width(), src.height())?;
    let (dst_w, dst_h) = checked_dims(width, height)?;

    if src_w == dst_w && src_h == dst_h {
        return Ok(src.clone());
    }

    let x_taps = axis_taps(src_w, dst_w);
    let y_taps = axis_taps(src_h, dst_h);
    let data = src.as_raw();

    // Horizontal pass into f64 rows, then vertical pass per output row.
    let mut horiz = vec![0.0f64; src_h * dst_w];
    for y in 0..src_h {
        let row = &data[y * src_w..(y + 1) * src_w];
        let out = &mut horiz[y * dst_w..(y + 1) * dst_w];
        for (dx, taps) in x_taps.iter().enumerate() {
            out[dx] = taps
                .iter()
                .map(|t| f64::from(row[t.index]) * t.weight)
                .sum();
        }
    }

    let mut dst = Vec::with_capacity(dst_w * dst_h);
    for taps in &y_taps {
        for dx in 0..dst_w {
            let value: f64 = taps
                .iter()
                .map(|t| horiz[t.index * dst_w + dx] * t.weight)
                .sum();
            dst.push(value.round().clamp(0.0, 255.0) as u8);
        }
    }

    let got = dst.len();
    GrayImage::from_raw(width, height, dst).ok_or(ItemRecError::LengthMismatch {
        expected: dst_w * dst_h,
        got,
    })
}

#[cfg(test)]
mod tests {
    use super::resize_area;
    use ::image::{GrayImage, Luma};

    #[test]
    fn same_size_is_identity() {
        let src = GrayImage::from_fn(7, 5, |x, y| Luma([(x * 30 + y * 7) as u8]));
        let out = resize_area(&src, 7, 5).unwrap();
        assert_eq!(out.as_raw(), src.as_raw());
    }

    #[test]
    fn halving_averages_blocks() {
        let src = GrayImage::from_raw(4, 2, vec![0, 10, 20, 40, 10, 20, 40, 60]).unwrap();
        let out = resize_area(&src, 2, 1).unwrap();
        assert_eq!(out.as_raw(), &vec![10u8, 40u8]);
    }

    #[test]
    fn fractional_footprints_weight_by_overlap() {
        // 3 -> 2: footprints are [0, 1.5) and [1.5, 3).
        let src = GrayImage::from_raw(3, 1, vec![0, 100, 200]).unwrap();
        let out = resize_area(&src, 2, 1).unwrap();
        // (0 * 1 + 100 * 0.5) / 1.5 = 33.3, (100 * 0.5 + 200) / 1.5 = 166.7
        assert_eq!(out.as_raw(), &vec![33u8, 167u8]);
    }

    #[test]
    fn upscaling_replicates_constant_images() {
        let src = GrayImage::from_pixel(2, 2, Luma([77]));
        let out = resize_area(&src, 9, 5).unwrap();
        assert!(out.as_raw().iter().all(|&v| v == 77));
    }

    #[test]
    fn zero_target_is_rejected() {
        let src = GrayImage::from_pixel(2, 2, Luma([1]));
        assert!(resize_area(&src, 0, 3).is_err());
        assert!(resize_area(&src, 3, 0).is_err());
    }
}
