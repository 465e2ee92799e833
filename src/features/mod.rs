//! Keypoint detection and binary description.
//!
//! `OrbDetector` finds FAST-9 corners on a small scale pyramid, keeps the
//! strongest ones up to a fixed feature budget, assigns each an
//! intensity-centroid orientation and describes it with a steered 256-bit
//! BRIEF descriptor computed on a Gaussian-smoothed copy of its level.

pub mod brief;
mod fast;
pub mod hamming;

use crate::image::pyramid::GrayPyramid;
use ::image::GrayImage;
use brief::{BriefPattern, PATCH_RADIUS};
use fast::{corner_cmp_desc, detect_corners};
use imageproc::filter::gaussian_blur_f32;

/// 256-bit binary descriptor.
pub type Descriptor = [u8; 32];

/// Sigma of the smoothing applied before descriptor sampling.
const SMOOTHING_SIGMA: f32 = 2.0;

/// Configuration for keypoint detection.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Maximum number of keypoints kept per image.
    pub max_features: usize,
    /// FAST intensity threshold.
    pub fast_threshold: u8,
    /// Number of pyramid levels searched (scale factor 2 between levels).
    pub levels: usize,
    /// Chebyshev radius for corner non-maximum suppression, per level.
    pub nms_radius: u32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_features: 500,
            fast_threshold: 20,
            levels: 3,
            nms_radius: 3,
        }
    }
}

/// Detected keypoint in base-image coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    /// Orientation in radians.
    pub angle: f32,
    /// FAST corner score.
    pub response: f32,
    /// Pyramid level the keypoint was found on.
    pub level: usize,
}

/// Keypoints paired 1:1 with their descriptors.
#[derive(Clone, Debug, Default)]
pub struct FeatureSet {
    keypoints: Vec<Keypoint>,
    descriptors: Vec<Descriptor>,
}

impl FeatureSet {
    /// Returns an empty feature set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn keypoints(&self) -> &[Keypoint] {
        &self.keypoints
    }

    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }
}

/// ORB-style detector with a fixed configuration and sampling pattern.
#[derive(Clone, Debug)]
pub struct OrbDetector {
    cfg: DetectorConfig,
    pattern: BriefPattern,
}

impl Default for OrbDetector {
    fn default() -> Self {
        Self::new(DetectorConfig::default())
    }
}

impl OrbDetector {
    pub fn new(cfg: DetectorConfig) -> Self {
        Self {
            cfg,
            pattern: BriefPattern::default(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    /// Detects keypoints and computes their descriptors.
    ///
    /// Images too small to hold a full descriptor patch, and images without
    /// corners, yield an empty set.
    pub fn detect_and_compute(&self, gray: &GrayImage) -> FeatureSet {
        let budget = self.cfg.max_features;
        if budget == 0 {
            return FeatureSet::empty();
        }
        let margin = PATCH_RADIUS as u32 + 1;
        let pyramid = GrayPyramid::build(gray, self.cfg.levels);

        let mut corners = Vec::new();
        for (level, img) in pyramid.levels().iter().enumerate() {
            corners.extend(detect_corners(
                img,
                level,
                self.cfg.fast_threshold,
                margin,
                self.cfg.nms_radius,
                budget,
            ));
        }
        if corners.is_empty() {
            return FeatureSet::empty();
        }
        corners.sort_by(corner_cmp_desc);
        corners.truncate(budget);

        let mut smoothed: Vec<Option<GrayImage>> = vec![None; pyramid.levels().len()];
        let mut keypoints = Vec::with_capacity(corners.len());
        let mut descriptors = Vec::with_capacity(corners.len());
        for corner in corners {
            let Some(level_img) = pyramid.level(corner.level) else {
                continue;
            };
            let blurred = smoothed[corner.level]
                .get_or_insert_with(|| gaussian_blur_f32(level_img, SMOOTHING_SIGMA));
            let angle = brief::orientation(level_img, corner.x, corner.y);
            descriptors.push(self.pattern.describe(blurred, corner.x, corner.y, angle));

            let scale = GrayPyramid::scale(corner.level);
            keypoints.push(Keypoint {
                x: corner.x as f32 * scale,
                y: corner.y as f32 * scale,
                angle,
                response: corner.score,
                level: corner.level,
            });
        }

        FeatureSet {
            keypoints,
            descriptors,
        }
    }
}
