//! Raster helpers shared by the template index and the matcher.
//!
//! Color rasters are 8-bit, 3-channel interleaved `RgbImage`s and grayscale
//! rasters are `GrayImage`s from the `image` crate. Every raster that enters
//! the recognition core must have a non-zero area; the helpers here are the
//! single place where that is checked.

use crate::util::{ItemRecError, ItemRecResult};
use ::image::{GrayImage, Luma, RgbImage};

#[cfg(feature = "image-io")]
pub mod io;
pub mod pyramid;
pub mod resize;

/// BT.601 luma weights in 14-bit fixed point (sum = 1 << 14).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Converts a color region to grayscale with BT.601 weights, rejecting
/// zero-area input.
pub fn to_gray(region: &RgbImage) -> ItemRecResult<GrayImage> {
    if region.width() == 0 || region.height() == 0 {
        return Err(ItemRecError::InvalidInput("region has zero area"));
    }
    Ok(GrayImage::from_fn(region.width(), region.height(), |x, y| {
        let [r, g, b] = region.get_pixel(x, y).0;
        let luma = u32::from(r) * LUMA_R + u32::from(g) * LUMA_G + u32::from(b) * LUMA_B;
        Luma([((luma + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8])
    }))
}

/// Returns `(width, height)` as `usize`, failing for zero-area rasters.
pub(crate) fn checked_dims(width: u32, height: u32) -> ItemRecResult<(usize, usize)> {
    let (w, h) = (width as usize, height as usize);
    if w == 0 || h == 0 {
        return Err(ItemRecError::InvalidDimensions {
            width: w,
            height: h,
        });
    }
    Ok((w, h))
}
