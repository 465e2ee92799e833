//! Steered BRIEF descriptors with intensity-centroid orientation.
//!
//! The sampling pattern is 256 point pairs inside a disc of radius
//! [`PATCH_RADIUS`], generated once from a fixed seed so descriptors are
//! identical across runs and platforms. Each pair is rotated by the keypoint
//! orientation before sampling; because every point lies inside the disc, a
//! rotated point never leaves the `PATCH_RADIUS` neighbourhood.

use super::Descriptor;
use ::image::GrayImage;

/// Radius of the descriptor patch and of the orientation disc.
pub const PATCH_RADIUS: i32 = 15;

/// Number of bits in a descriptor.
pub const DESCRIPTOR_BITS: usize = 256;

const PATTERN_SEED: u64 = 0x6974_656d_7265_6331;

/// A single intensity comparison `I(a) < I(b)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TestPair {
    a: (i32, i32),
    b: (i32, i32),
}

/// Fixed comparison pattern shared by all descriptors.
#[derive(Clone, Debug)]
pub struct BriefPattern {
    pairs: Vec<TestPair>,
}

impl Default for BriefPattern {
    fn default() -> Self {
        Self::generate(PATTERN_SEED)
    }
}

/// splitmix64 step; the pattern must never change with a dependency upgrade.
fn splitmix64(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9e37_79b9_7f4a_7c15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

fn disc_point(state: &mut u64) -> (i32, i32) {
    let span = (2 * PATCH_RADIUS + 1) as u64;
    loop {
        let x = (splitmix64(state) % span) as i32 - PATCH_RADIUS;
        let y = (splitmix64(state) % span) as i32 - PATCH_RADIUS;
        if x * x + y * y <= PATCH_RADIUS * PATCH_RADIUS {
            return (x, y);
        }
    }
}

impl BriefPattern {
    fn generate(seed: u64) -> Self {
        let mut state = seed;
        let mut pairs = Vec::with_capacity(DESCRIPTOR_BITS);
        while pairs.len() < DESCRIPTOR_BITS {
            let a = disc_point(&mut state);
            let b = disc_point(&mut state);
            if a != b {
                pairs.push(TestPair { a, b });
            }
        }
        Self { pairs }
    }

    /// Computes the descriptor of the patch centred at `(x, y)` in `smoothed`.
    ///
    /// The caller guarantees `(x, y)` is at least `PATCH_RADIUS` pixels from
    /// every border.
    pub fn describe(&self, smoothed: &GrayImage, x: u32, y: u32, angle: f32) -> Descriptor {
        let (sin, cos) = angle.sin_cos();
        let sample = |(px, py): (i32, i32)| -> u8 {
            let fx = px as f32;
            let fy = py as f32;
            let rx = (cos * fx - sin * fy).round() as i32;
            let ry = (sin * fx + cos * fy).round() as i32;
            let sx = (x as i32 + rx).clamp(0, smoothed.width() as i32 - 1) as u32;
            let sy = (y as i32 + ry).clamp(0, smoothed.height() as i32 - 1) as u32;
            smoothed.get_pixel(sx, sy)[0]
        };

        let mut desc = [0u8; DESCRIPTOR_BITS / 8];
        for (bit, pair) in self.pairs.iter().enumerate() {
            if sample(pair.a) < sample(pair.b) {
                desc[bit / 8] |= 1 << (bit % 8);
            }
        }
        desc
    }
}

/// Orientation of the patch at `(x, y)` from its intensity centroid, in radians.
pub fn orientation(image: &GrayImage, x: u32, y: u32) -> f32 {
    let r2 = PATCH_RADIUS * PATCH_RADIUS;
    let mut m01 = 0i64;
    let mut m10 = 0i64;
    for dy in -PATCH_RADIUS..=PATCH_RADIUS {
        let sy = y as i32 + dy;
        if sy < 0 || sy >= image.height() as i32 {
            continue;
        }
        for dx in -PATCH_RADIUS..=PATCH_RADIUS {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let sx = x as i32 + dx;
            if sx < 0 || sx >= image.width() as i32 {
                continue;
            }
            let value = i64::from(image.get_pixel(sx as u32, sy as u32)[0]);
            m10 += i64::from(dx) * value;
            m01 += i64::from(dy) * value;
        }
    }
    (m01 as f32).atan2(m10 as f32)
}

#[cfg(test)]
mod tests {
    use super::{orientation, BriefPattern, PATCH_RADIUS};
    use ::image::{GrayImage, Luma};

    #[test]
    fn pattern_is_deterministic_and_in_disc() {
        let a = BriefPattern::default();
        let b = BriefPattern::default();
        assert_eq!(a.pairs, b.pairs);
        assert_eq!(a.pairs.len(), 256);
        for pair in &a.pairs {
            for (x, y) in [pair.a, pair.b] {
                assert!(x * x + y * y <= PATCH_RADIUS * PATCH_RADIUS);
            }
        }
    }

    #[test]
    fn flat_patch_has_empty_descriptor() {
        let img = GrayImage::from_pixel(40, 40, Luma([90]));
        let desc = BriefPattern::default().describe(&img, 20, 20, 0.3);
        assert!(desc.iter().all(|&b| b == 0));
    }

    #[test]
    fn orientation_points_toward_bright_side() {
        // Bright to the right of the centre: angle near 0.
        let img = GrayImage::from_fn(40, 40, |x, _| if x > 20 { Luma([200]) } else { Luma([0]) });
        let angle = orientation(&img, 20, 20);
        assert!(angle.abs() < 1e-3, "angle {angle}");

        // Bright below the centre: angle near +pi/2 (image y grows downward).
        let img = GrayImage::from_fn(40, 40, |_, y| if y > 20 { Luma([200]) } else { Luma([0]) });
        let angle = orientation(&img, 20, 20);
        assert!((angle - std::f32::consts::FRAC_PI_2).abs() < 1e-3, "angle {angle}");
    }
}
