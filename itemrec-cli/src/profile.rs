//! JSON profile: where templates and captures live, which regions to read,
//! and the recognition knobs.

use itemrec::{DetectorConfig, MatchConfig, NRect, Rect, Thresholds, ZonePreset};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Absolute region of interest, optionally named for the preview output.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RectJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl From<&RectJson> for Rect {
    fn from(value: &RectJson) -> Self {
        Rect::new(value.x, value.y, value.width, value.height)
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct NRectJson {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<NRectJson> for NRect {
    fn from(value: NRectJson) -> Self {
        NRect::new(value.x, value.y, value.width, value.height)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PresetJson {
    Row10,
    Scoreboard10,
}

impl From<PresetJson> for ZonePreset {
    fn from(value: PresetJson) -> Self {
        match value {
            PresetJson::Row10 => ZonePreset::Row10,
            PresetJson::Scoreboard10 => ZonePreset::Scoreboard10,
        }
    }
}

/// Zones are either a built-in layout or explicit normalized rectangles.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum ZonesJson {
    Preset { preset: PresetJson },
    Rects { rects: Vec<NRectJson> },
}

impl ZonesJson {
    pub fn resolve(&self) -> Vec<NRect> {
        match self {
            ZonesJson::Preset { preset } => ZonePreset::from(*preset).zones(),
            ZonesJson::Rects { rects } => rects.iter().copied().map(NRect::from).collect(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ThresholdsJson {
    pub orb_min_matches: u32,
    pub corr_min_score: f32,
}

impl Default for ThresholdsJson {
    fn default() -> Self {
        let cfg = Thresholds::default();
        Self {
            orb_min_matches: cfg.orb_min_matches,
            corr_min_score: cfg.corr_min_score,
        }
    }
}

impl From<&ThresholdsJson> for Thresholds {
    fn from(value: &ThresholdsJson) -> Self {
        Thresholds {
            orb_min_matches: value.orb_min_matches,
            corr_min_score: value.corr_min_score,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DetectorConfigJson {
    pub max_features: usize,
    pub fast_threshold: u8,
    pub levels: usize,
    pub nms_radius: u32,
}

impl Default for DetectorConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            max_features: cfg.max_features,
            fast_threshold: cfg.fast_threshold,
            levels: cfg.levels,
            nms_radius: cfg.nms_radius,
        }
    }
}

impl From<&DetectorConfigJson> for DetectorConfig {
    fn from(value: &DetectorConfigJson) -> Self {
        DetectorConfig {
            max_features: value.max_features,
            fast_threshold: value.fast_threshold,
            levels: value.levels,
            nms_radius: value.nms_radius,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MatchConfigJson {
    pub ratio: f32,
    pub min_good_matches: usize,
    pub fallback_min_score: f32,
    pub parallel: bool,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        let cfg = MatchConfig::default();
        Self {
            ratio: cfg.ratio,
            min_good_matches: cfg.min_good_matches,
            fallback_min_score: cfg.fallback_min_score,
            parallel: cfg.parallel,
        }
    }
}

impl From<&MatchConfigJson> for MatchConfig {
    fn from(value: &MatchConfigJson) -> Self {
        MatchConfig {
            ratio: value.ratio,
            min_good_matches: value.min_good_matches,
            fallback_min_score: value.fallback_min_score,
            parallel: value.parallel,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PollJson {
    pub interval_ms: u64,
    pub ticks: u32,
}

impl Default for PollJson {
    fn default() -> Self {
        Self {
            interval_ms: 250,
            ticks: 1,
        }
    }
}

impl PollJson {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Profile {
    pub templates_dir: String,
    pub capture_path: String,
    pub output_dir: Option<String>,
    pub rois: Vec<RectJson>,
    pub zones: Option<ZonesJson>,
    pub thresholds: ThresholdsJson,
    pub detector: DetectorConfigJson,
    #[serde(rename = "match")]
    pub match_cfg: MatchConfigJson,
    pub poll: PollJson,
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)?;
        let profile: Profile = serde_json::from_str(&text)?;
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.templates_dir.is_empty() || self.capture_path.is_empty() {
            return Err("templates_dir and capture_path must be set in the profile".into());
        }
        if self.poll.ticks == 0 {
            return Err("poll.ticks must be at least 1".into());
        }
        Ok(())
    }

    /// Writes the profile as pretty JSON through a temporary sibling file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_atomic(path, json.as_bytes())
    }
}

/// Writes `contents` to `<path>.tmp` and renames it over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(path).with_file_name(tmp_name);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}
