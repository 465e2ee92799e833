//! Template and capture loading via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::trace::{trace_event, trace_warn};
use crate::util::{ItemRecError, ItemRecResult};
use ::image::{ImageReader, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};

/// File extensions recognized as template images (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// Returns true when `path` has one of the supported template extensions.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            SUPPORTED_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Loads an image from disk and converts it to 8-bit RGB.
///
/// The format is guessed from the file contents, falling back to the extension.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> ItemRecResult<RgbImage> {
    let path = path.as_ref();
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|err| ItemRecError::io(path, err))?;
    let img = reader.decode().map_err(|err| ItemRecError::ImageIo {
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}

/// Lists supported image files directly inside `dir`, sorted by path.
pub fn list_template_files<P: AsRef<Path>>(dir: P) -> ItemRecResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|err| ItemRecError::io(dir, err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| ItemRecError::io(dir, err))?;
        let path = entry.path();
        if path.is_file() && is_supported_image(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every decodable template image in `dir` as `(name, image)` pairs.
///
/// Names are file stems. Files that fail to decode, or decode to an empty
/// raster, are skipped. Pairs come back in path order, so a later file with a
/// colliding stem (`a.png` then `a.jpg`) overwrites the earlier one when the
/// index is built.
pub fn load_templates<P: AsRef<Path>>(dir: P) -> ItemRecResult<Vec<(String, RgbImage)>> {
    let files = list_template_files(&dir)?;
    let mut templates = Vec::with_capacity(files.len());
    for path in files {
        let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        match load_rgb_image(&path) {
            Ok(img) if img.width() > 0 && img.height() > 0 => {
                templates.push((name.to_owned(), img));
            }
            Ok(_) => {
                trace_warn!(
                    "template_skipped",
                    path = path.display().to_string().as_str(),
                    reason = "empty image",
                );
            }
            Err(err) => {
                trace_warn!(
                    "template_skipped",
                    path = path.display().to_string().as_str(),
                    reason = err.to_string().as_str(),
                );
            }
        }
    }
    trace_event!("templates_loaded", count = templates.len());
    Ok(templates)
}
