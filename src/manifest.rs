//! The persisted manifest.
//!
//! One `manifest.json` is written directly inside the scanned root and
//! replaces whatever was there before. Shape:
//!
//! ```json
//! {
//!   "generated": "2026-10-19T08:30:00.000Z",
//!   "screenshots": [
//!     {
//!       "file": "settings/dark.png",
//!       "dimensions": { "width": 1280, "height": 800 },
//!       "ocr": "Settings",
//!       "contrast": 14.2,
//!       "primaryColors": ["#1e1e1e", "#f5f5f5", "#3a7bd5"],
//!       "hasAlpha": false
//!     }
//!   ]
//! }
//! ```
//!
//! Files that failed analysis do not appear at all; there are no error
//! entries.

use crate::imaging::Rgb;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the manifest file inside the scanned root.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Analysis result for one screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotRecord {
    /// Root-relative, `/`-separated.
    #[serde(rename = "file")]
    pub path: String,
    pub dimensions: Dimensions,
    /// Trimmed OCR output; may be empty.
    #[serde(rename = "ocr")]
    pub ocr_text: String,
    /// Contrast between the lightest and darkest primary color, one decimal.
    pub contrast: f64,
    /// Quantizer order, at most five.
    pub primary_colors: Vec<Rgb>,
    pub has_alpha: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// RFC 3339 UTC with millisecond precision.
    #[serde(rename = "generated")]
    pub generated_at: String,
    pub screenshots: Vec<ScreenshotRecord>,
}

impl Manifest {
    pub fn new(screenshots: Vec<ScreenshotRecord>, completed_at: DateTime<Utc>) -> Self {
        Self {
            generated_at: completed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            screenshots,
        }
    }
}

/// Resolve the manifest path for a scanned root.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILENAME)
}

/// Write the manifest as pretty-printed JSON into `root`, overwriting any
/// existing one. Returns the written path.
pub fn write_manifest(root: &Path, manifest: &Manifest) -> Result<PathBuf, ManifestError> {
    let path = manifest_path(root);
    let json = serde_json::to_string_pretty(manifest)?;
    fs::write(&path, json).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Load a manifest previously written by [`write_manifest`].
pub fn read_manifest(path: &Path) -> Result<Manifest, ManifestError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
