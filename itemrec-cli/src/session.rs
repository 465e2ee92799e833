//! One recognition session: the live template index, the regions to read,
//! and the polling loop that ties capture, matching and output together.

use crate::output::OutputWriter;
use crate::profile::{PollJson, Profile};
use image::RgbImage;
use itemrec::io::{list_template_files, load_rgb_image, load_templates};
use itemrec::{
    crop_region, zone_slots, DetectorConfig, ItemRecResult, MatchConfig, Matcher, NRect, Rect,
    Recognition, SharedIndex, TemplateIndex, Thresholds, ZonePreset, UNKNOWN_LABEL,
};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::SystemTime;
use tracing::{info, warn};

/// Template directory listing with modification times and sizes.
type Fingerprint = Vec<(PathBuf, Option<SystemTime>, u64)>;

fn fingerprint(dir: &Path) -> ItemRecResult<Fingerprint> {
    Ok(list_template_files(dir)?
        .into_iter()
        .map(|path| {
            let meta = fs::metadata(&path).ok();
            let modified = meta.as_ref().and_then(|m| m.modified().ok());
            let len = meta.map_or(0, |m| m.len());
            (path, modified, len)
        })
        .collect())
}

fn build_index(dir: &Path, cfg: DetectorConfig) -> Result<TemplateIndex, Box<dyn Error>> {
    let templates = load_templates(dir)?;
    if templates.is_empty() {
        return Err(format!("no template images in {}", dir.display()).into());
    }
    Ok(TemplateIndex::build(templates, cfg)?)
}

/// Preview line for one region: `<region>: <accepted> (method=.., score=..)`.
fn describe(region: &str, rec: &Recognition, accepted: &str) -> String {
    format!(
        "{region}: {accepted} (method={}, score={:.2})",
        rec.method, rec.score
    )
}

/// Result of reading one region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionReading {
    /// Accepted label, or `Unknown`.
    pub label: String,
    /// Preview line, `None` when the region could not be read.
    pub line: Option<String>,
}

pub struct Session {
    templates_dir: PathBuf,
    capture_path: PathBuf,
    detector: DetectorConfig,
    matcher: Matcher,
    thresholds: Thresholds,
    rois: Vec<(String, Rect)>,
    zones: Option<Vec<NRect>>,
    index: SharedIndex,
    fingerprint: Fingerprint,
    output: Option<OutputWriter>,
}

impl Session {
    pub fn open(profile: &Profile) -> Result<Self, Box<dyn Error>> {
        let templates_dir = PathBuf::from(&profile.templates_dir);
        let detector = DetectorConfig::from(&profile.detector);
        let fingerprint = fingerprint(&templates_dir)?;
        let index = build_index(&templates_dir, detector.clone())?;
        info!(templates = index.len(), "template index built");

        let output = match &profile.output_dir {
            Some(dir) => Some(OutputWriter::new(dir)?),
            None => None,
        };
        let rois = profile
            .rois
            .iter()
            .enumerate()
            .map(|(i, roi)| {
                let name = roi.label.clone().unwrap_or_else(|| format!("roi {}", i + 1));
                (name, Rect::from(roi))
            })
            .collect();

        Ok(Self {
            templates_dir,
            capture_path: PathBuf::from(&profile.capture_path),
            detector,
            matcher: Matcher::new().with_config(MatchConfig::from(&profile.match_cfg)),
            thresholds: Thresholds::from(&profile.thresholds),
            rois,
            zones: profile.zones.as_ref().map(|z| z.resolve()),
            index: SharedIndex::new(index),
            fingerprint,
            output,
        })
    }

    /// Index currently in service.
    pub fn index(&self) -> Arc<TemplateIndex> {
        self.index.snapshot()
    }

    /// Rebuilds the index when the template directory changed.
    ///
    /// Returns true when a new index was swapped in. A failed rebuild keeps
    /// the previous index in service.
    pub fn refresh_templates(&mut self) -> bool {
        let current = match fingerprint(&self.templates_dir) {
            Ok(current) => current,
            Err(err) => {
                warn!(error = %err, "cannot list template directory");
                return false;
            }
        };
        if current == self.fingerprint {
            return false;
        }
        match build_index(&self.templates_dir, self.detector.clone()) {
            Ok(index) => {
                info!(templates = index.len(), "template index reloaded");
                self.index.replace(index);
                self.fingerprint = current;
                true
            }
            Err(err) => {
                warn!(error = %err, "template reload failed; keeping previous index");
                false
            }
        }
    }

    /// Recognizes one region of the frame and applies the thresholds.
    fn read_region(
        &self,
        index: &TemplateIndex,
        frame: &RgbImage,
        name: &str,
        rect: Rect,
    ) -> RegionReading {
        let rec =
            crop_region(frame, rect).and_then(|region| self.matcher.recognize(index, &region));
        match rec {
            Ok(rec) => {
                let label = self.thresholds.accept(&rec).to_owned();
                let line = describe(name, &rec, &label);
                RegionReading {
                    label,
                    line: Some(line),
                }
            }
            Err(err) => {
                warn!(region = name, ?rect, error = %err, "region skipped");
                RegionReading {
                    label: UNKNOWN_LABEL.to_owned(),
                    line: None,
                }
            }
        }
    }

    /// Reads the capture once, recognizes every region and writes the
    /// results. Returns the preview lines.
    pub fn tick(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let frame = load_rgb_image(&self.capture_path)?;
        let index = self.index();
        let (width, height) = frame.dimensions();
        let mut lines = Vec::new();

        if let Some(zones) = &self.zones {
            for (z, zone) in zones.iter().enumerate() {
                let slots = zone_slots(zone.to_abs(width, height), ZonePreset::SLOTS_PER_ZONE);
                let mut items = Vec::with_capacity(slots.len());
                for (s, slot) in slots.into_iter().enumerate() {
                    let name = format!("zone {} slot {}", z + 1, s + 1);
                    let reading = self.read_region(&index, &frame, &name, slot);
                    lines.extend(reading.line);
                    items.push(reading.label);
                }
                if let Some(out) = &self.output {
                    out.write_for_zone(z + 1, &items)?;
                }
            }
            return Ok(lines);
        }

        let rois = if self.rois.is_empty() {
            vec![("frame".to_owned(), Rect::full(&frame))]
        } else {
            self.rois.clone()
        };
        let mut items = Vec::with_capacity(rois.len());
        for (name, rect) in &rois {
            let reading = self.read_region(&index, &frame, name, *rect);
            lines.extend(reading.line);
            items.push(reading.label);
        }
        if let Some(out) = &self.output {
            out.write(&items)?;
        }
        Ok(lines)
    }

    /// Runs `poll.ticks` ticks, checking for template changes between them.
    ///
    /// A failing tick is logged and the loop continues. Returns the number of
    /// failed ticks.
    pub fn run(&mut self, poll: &PollJson) -> u32 {
        let mut failures = 0;
        for tick in 0..poll.ticks {
            if tick > 0 {
                thread::sleep(poll.interval());
                self.refresh_templates();
            }
            match self.tick() {
                Ok(lines) => {
                    for line in lines {
                        println!("{line}");
                    }
                }
                Err(err) => {
                    warn!(tick, error = %err, "tick failed");
                    failures += 1;
                }
            }
        }
        failures
    }
}
