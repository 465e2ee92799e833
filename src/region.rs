//! Region geometry: absolute rectangles, normalized zones and zone layouts.
//!
//! Captures are cropped to regions before recognition. Zones are stored in
//! normalized `[0, 1]` coordinates so one layout fits any capture size.

use crate::util::{ItemRecError, ItemRecResult};
use ::image::RgbImage;

/// Absolute pixel rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whole-frame rectangle.
    pub fn full(frame: &RgbImage) -> Self {
        Self::new(0, 0, frame.width(), frame.height())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Copies `rect` out of `frame`, clamped to the frame bounds.
///
/// Fails with `InvalidInput` when nothing of the rectangle lies inside the frame.
pub fn crop_region(frame: &RgbImage, rect: Rect) -> ItemRecResult<RgbImage> {
    let x0 = rect.x.min(frame.width());
    let y0 = rect.y.min(frame.height());
    let x1 = rect.x.saturating_add(rect.width).min(frame.width());
    let y1 = rect.y.saturating_add(rect.height).min(frame.height());
    if x1 <= x0 || y1 <= y0 {
        return Err(ItemRecError::InvalidInput("region lies outside the frame"));
    }
    Ok(::image::imageops::crop_imm(frame, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Splits a zone into `slots` equal side-by-side cells with a 4% inner padding.
pub fn zone_slots(zone: Rect, slots: u32) -> Vec<Rect> {
    if slots == 0 {
        return Vec::new();
    }
    let pad = (0.04 * zone.width.min(zone.height) as f32) as u32;
    let slot_w = (zone.width.saturating_sub(2 * pad) / slots).max(1);
    let slot_h = zone.height.saturating_sub(2 * pad).max(1);
    (0..slots)
        .map(|s| Rect::new(zone.x + pad + s * slot_w, zone.y + pad, slot_w, slot_h))
        .collect()
}

/// Rectangle in coordinates normalized to the frame size.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

fn scale_round(v: f32, extent: u32) -> u32 {
    (f64::from(v) * f64::from(extent)).round().max(0.0) as u32
}

impl NRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Maps to absolute pixels for a `width` x `height` frame, rounding to nearest.
    pub fn to_abs(&self, width: u32, height: u32) -> Rect {
        Rect::new(
            scale_round(self.x, width),
            scale_round(self.y, height),
            scale_round(self.width, width),
            scale_round(self.height, height),
        )
    }

    /// Normalizes an absolute rectangle; a zero frame extent maps to 0.
    pub fn from_abs(rect: Rect, width: u32, height: u32) -> Self {
        let norm = |v: u32, extent: u32| {
            if extent == 0 {
                0.0
            } else {
                v as f32 / extent as f32
            }
        };
        Self::new(
            norm(rect.x, width),
            norm(rect.y, height),
            norm(rect.width, width),
            norm(rect.height, height),
        )
    }
}

/// Built-in zone layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZonePreset {
    /// Ten equal squares in a centred row near the bottom of the frame.
    Row10,
    /// Ten item strips of a two-team scoreboard, five rows per side.
    Scoreboard10,
}

impl ZonePreset {
    /// Number of item slots each zone is split into for recognition.
    pub const SLOTS_PER_ZONE: u32 = 6;

    pub fn zones(self) -> Vec<NRect> {
        match self {
            ZonePreset::Row10 => row_10(),
            ZonePreset::Scoreboard10 => scoreboard_10(),
        }
    }
}

fn row_10() -> Vec<NRect> {
    let margin_x = 0.02f32;
    let center_y = 0.75f32;
    let total_w = 1.0 - 2.0 * margin_x;
    let zone_w = total_w / 10.0 * 0.95;
    let gap = (total_w - zone_w * 10.0) / 9.0;
    let y = center_y - zone_w / 2.0;
    (0..10)
        .map(|i| NRect::new(margin_x + i as f32 * (zone_w + gap), y, zone_w, zone_w))
        .collect()
}

fn scoreboard_10() -> Vec<NRect> {
    let top = 0.17f32;
    let row_h = 0.13f32;
    let zone_h = 0.09f32;
    let zone_w = 0.20f32;
    let mut zones = Vec::with_capacity(10);
    for x in [0.30f32, 0.52] {
        for row in 0..5 {
            let cy = top + row as f32 * row_h;
            zones.push(NRect::new(x, cy - zone_h / 2.0, zone_w, zone_h));
        }
    }
    zones
}
