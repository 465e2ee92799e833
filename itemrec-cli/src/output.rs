//! Recognized-item sink: plain text for overlays, JSON for tools.

use crate::profile::write_atomic;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct ItemsRecord<'a> {
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    zone: Option<usize>,
    items: &'a [String],
}

/// Writes recognized labels into an output directory.
///
/// Each write replaces its files atomically, so readers never observe a
/// partially written list.
#[derive(Debug)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    /// Creates the output directory if needed.
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes `items.txt` and `items.json`.
    pub fn write(&self, items: &[String]) -> io::Result<()> {
        self.write_pair("items", None, items)
    }

    /// Writes `items_zone_<zone>.txt` and `items_zone_<zone>.json`.
    pub fn write_for_zone(&self, zone: usize, items: &[String]) -> io::Result<()> {
        self.write_pair(&format!("items_zone_{zone}"), Some(zone), items)
    }

    fn write_pair(&self, stem: &str, zone: Option<usize>, items: &[String]) -> io::Result<()> {
        write_atomic(&self.dir.join(format!("{stem}.txt")), items.join("\n").as_bytes())?;

        let record = ItemsRecord {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            zone,
            items,
        };
        let json = serde_json::to_string_pretty(&record)?;
        write_atomic(&self.dir.join(format!("{stem}.json")), json.as_bytes())
    }
}
