//! Image backend trait and shared types.
//!
//! The [`ImageBackend`] trait covers the two pixel-level collaborators the
//! pipeline needs: header inspection (width, height, channel count) and
//! dominant-color quantization. The orchestrator only sees this trait, so a
//! different decoder or quantizer can be swapped in without touching it.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::color::Rgb;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Samples per pixel: 1 (gray), 2 (gray + alpha), 3 (RGB), 4 (RGBA).
    pub channels: u8,
}

impl ImageInfo {
    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }
}

/// Trait for image backends.
///
/// `Sync` so one backend can be shared across rayon workers.
pub trait ImageBackend: Sync {
    /// Read dimensions and channel count from the image header.
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Up to `count` dominant colors, most prominent first.
    ///
    /// May return fewer than `count` (or none) for images with few distinct
    /// colors.
    fn dominant_colors(&self, path: &Path, count: usize) -> Result<Vec<Rgb>, BackendError>;
}
