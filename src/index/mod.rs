//! Precomputed template assets for recognition.
//!
//! Building the index once amortizes grayscale conversion and keypoint
//! extraction across every recognition call. The index is immutable after
//! construction; a template-set change builds a fresh index and swaps it in
//! whole (see [`SharedIndex`]).
//!
//! Templates are exposed sorted by name (byte-wise). Best-score selection in
//! the matcher keeps the first template on ties, so this order is part of the
//! result contract.

mod shared;

pub use shared::SharedIndex;

use crate::features::{DetectorConfig, FeatureSet, OrbDetector};
use crate::image::{checked_dims, to_gray};
use crate::trace::{trace_event, trace_span};
use crate::util::{ItemRecError, ItemRecResult};
use ::image::{GrayImage, RgbImage};
use std::collections::BTreeMap;

/// One reference image with its derived matching assets.
#[derive(Clone, Debug)]
pub struct IndexedTemplate {
    name: String,
    image: RgbImage,
    gray: GrayImage,
    features: FeatureSet,
}

impl IndexedTemplate {
    /// Unique, non-empty template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Original color image.
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Grayscale raster used by correlation matching.
    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    /// Keypoints and descriptors; may be empty.
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }
}

/// Immutable, name-ordered collection of indexed templates.
#[derive(Clone, Debug)]
pub struct TemplateIndex {
    templates: Vec<IndexedTemplate>,
    detector: OrbDetector,
}

impl TemplateIndex {
    /// Builds an index from `(name, image)` pairs.
    ///
    /// Later pairs overwrite earlier pairs with the same name. Empty names
    /// are rejected with `InvalidInput` and zero-area images with
    /// `InvalidDimensions`. Templates without detectable keypoints are kept
    /// with an empty descriptor set.
    pub fn build<I, S>(templates: I, cfg: DetectorConfig) -> ItemRecResult<Self>
    where
        I: IntoIterator<Item = (S, RgbImage)>,
        S: Into<String>,
    {
        let mut by_name: BTreeMap<String, RgbImage> = BTreeMap::new();
        for (name, image) in templates {
            let name = name.into();
            if name.is_empty() {
                return Err(ItemRecError::InvalidInput("template name is empty"));
            }
            checked_dims(image.width(), image.height())?;
            by_name.insert(name, image);
        }

        let _span = trace_span!("build_index", templates = by_name.len()).entered();
        let detector = OrbDetector::new(cfg);
        let mut out = Vec::with_capacity(by_name.len());
        for (name, image) in by_name {
            let gray = to_gray(&image)?;
            let features = detector.detect_and_compute(&gray);
            trace_event!("template_indexed", keypoints = features.len());
            out.push(IndexedTemplate {
                name,
                image,
                gray,
                features,
            });
        }

        Ok(Self {
            templates: out,
            detector,
        })
    }

    /// Returns an index with no templates.
    pub fn empty(cfg: DetectorConfig) -> Self {
        Self {
            templates: Vec::new(),
            detector: OrbDetector::new(cfg),
        }
    }

    /// Number of templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Templates in name order.
    pub fn templates(&self) -> &[IndexedTemplate] {
        &self.templates
    }

    /// Iterates template names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name())
    }

    /// Looks up a template by name.
    pub fn get(&self, name: &str) -> Option<&IndexedTemplate> {
        self.templates
            .binary_search_by(|t| t.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.templates[idx])
    }

    /// Returns the template at `index`.
    pub fn template_at(&self, index: usize) -> ItemRecResult<&IndexedTemplate> {
        self.templates
            .get(index)
            .ok_or(ItemRecError::IndexOutOfBounds {
                index,
                len: self.templates.len(),
                context: "template",
            })
    }

    /// Detector used for templates; queries must use the same one.
    pub fn detector(&self) -> &OrbDetector {
        &self.detector
    }
}
