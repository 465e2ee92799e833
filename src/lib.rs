//! itemrec identifies game-UI item icons in captured screen regions.
//!
//! A [`TemplateIndex`] is built once from named reference images. The
//! [`Matcher`] then recognizes each query region in two stages: ORB-style
//! keypoint matching with Lowe's ratio test, and a normalized
//! cross-correlation fallback for regions with weak or no keypoint evidence.
//! Results carry the method that produced them so callers can apply
//! per-method acceptance [`Thresholds`].
//!
//! Template scoring can run in parallel via the `rayon` feature, and the
//! correlation kernel can use SIMD via the `simd` feature.

pub mod features;
pub mod image;
pub mod index;
pub mod kernel;
pub mod policy;
pub mod region;
pub mod search;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use crate::image::resize::resize_area;
pub use crate::image::to_gray;
pub use features::{DetectorConfig, Descriptor, FeatureSet, Keypoint, OrbDetector};
pub use index::{IndexedTemplate, SharedIndex, TemplateIndex};
pub use policy::Thresholds;
pub use region::{crop_region, zone_slots, NRect, Rect, ZonePreset};
pub use search::{MatchConfig, Matcher, Method, Recognition, NO_MATCH_SCORE, UNKNOWN_LABEL};
pub use util::{ItemRecError, ItemRecResult};
