//! Shared test utilities.
//!
//! Fixture builders for screenshot trees: empty placeholder files for
//! discovery tests and real PNGs (drawn pixel by pixel) for tests that go
//! through the image decoder.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! touch(tmp.path(), "sub/placeholder.png");
//! write_rgb_png(&tmp.path().join("split.png"), 64, 32, |x, _| {
//!     if x < 32 { [0, 0, 0] } else { [255, 255, 255] }
//! });
//! ```

use image::{GrayImage, RgbImage, RgbaImage};
use std::path::Path;

// =========================================================================
// Placeholder files
// =========================================================================

/// Create an empty file at `root/rel`, creating parent directories.
pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, b"").unwrap();
}

// =========================================================================
// Synthetic PNGs
// =========================================================================

/// Write an RGB PNG whose pixels come from `pixel(x, y)`.
pub fn write_rgb_png(path: &Path, width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 3]) {
    ensure_parent(path);
    RgbImage::from_fn(width, height, |x, y| image::Rgb(pixel(x, y)))
        .save(path)
        .unwrap();
}

/// Write an RGBA PNG whose pixels come from `pixel(x, y)`.
pub fn write_rgba_png(path: &Path, width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) {
    ensure_parent(path);
    RgbaImage::from_fn(width, height, |x, y| image::Rgba(pixel(x, y)))
        .save(path)
        .unwrap();
}

/// Write a flat single-channel PNG.
pub fn write_gray_png(path: &Path, width: u32, height: u32, level: u8) {
    ensure_parent(path);
    GrayImage::from_pixel(width, height, image::Luma([level]))
        .save(path)
        .unwrap();
}

fn ensure_parent(path: &Path) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
}
