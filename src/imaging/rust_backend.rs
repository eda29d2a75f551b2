//! Pure Rust image backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_decoder` (header only, no pixel decode) |
//! | Decode | `image` crate pure Rust decoders (PNG, JPEG, TIFF, WebP) |
//! | Downsample | `image::DynamicImage::thumbnail` |
//! | Dominant colors | histogram quantizer in this module |
//!
//! ## Quantizer
//!
//! Pixels are bucketed by the top 5 bits of each channel (32³ buckets).
//! Buckets are ranked by population and each reports the mean color of the
//! pixels that fell into it, so a flat fill comes back as its exact color.
//! Fully transparent pixels carry no visible color and are ignored. Ties in
//! population are broken by bucket index, which keeps the palette stable
//! across runs.

use super::backend::{BackendError, ImageBackend, ImageInfo};
use super::color::Rgb;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader, RgbaImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

/// Longest edge the quantizer looks at. Larger images are downsampled first.
const SAMPLE_EDGE: u32 = 256;

/// Bits dropped from each channel when bucketing.
const BUCKET_SHIFT: u8 = 3;

const CANDIDATES: &[(&str, ImageFormat)] = &[
    ("png", ImageFormat::Png),
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Backend built on the `image` crate.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: image::ImageError) -> BackendError {
    BackendError::Decode(format!("{}: {}", path.display(), err))
}

fn open(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    Ok(ImageReader::open(path)?.with_guessed_format()?)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let decoder = open(path)?
            .into_decoder()
            .map_err(|e| decode_error(path, e))?;
        let (width, height) = decoder.dimensions();
        if width == 0 || height == 0 {
            return Err(BackendError::Decode(format!(
                "{}: empty image ({width}x{height})",
                path.display()
            )));
        }
        Ok(ImageInfo {
            width,
            height,
            channels: decoder.color_type().channel_count(),
        })
    }

    fn dominant_colors(&self, path: &Path, count: usize) -> Result<Vec<Rgb>, BackendError> {
        let img = open(path)?.decode().map_err(|e| decode_error(path, e))?;
        Ok(quantize(&sample(&img), count))
    }
}

/// RGBA view of the image, downsampled so the longer edge is at most [`SAMPLE_EDGE`].
fn sample(img: &DynamicImage) -> RgbaImage {
    if img.width() > SAMPLE_EDGE || img.height() > SAMPLE_EDGE {
        img.thumbnail(SAMPLE_EDGE, SAMPLE_EDGE).to_rgba8()
    } else {
        img.to_rgba8()
    }
}

#[derive(Default)]
struct Bucket {
    pixels: u64,
    sum: [u64; 3],
}

impl Bucket {
    fn mean(&self) -> Rgb {
        let avg = |s: u64| ((s as f64 / self.pixels as f64).round()) as u8;
        Rgb::new(avg(self.sum[0]), avg(self.sum[1]), avg(self.sum[2]))
    }
}

/// Up to `count` most populated color buckets, most populated first.
pub(crate) fn quantize(pixels: &RgbaImage, count: usize) -> Vec<Rgb> {
    let mut buckets: HashMap<u32, Bucket> = HashMap::new();
    for px in pixels.pixels() {
        let [r, g, b, a] = px.0;
        if a == 0 {
            continue;
        }
        let key = (u32::from(r >> BUCKET_SHIFT) << 10)
            | (u32::from(g >> BUCKET_SHIFT) << 5)
            | u32::from(b >> BUCKET_SHIFT);
        let bucket = buckets.entry(key).or_default();
        bucket.pixels += 1;
        bucket.sum[0] += u64::from(r);
        bucket.sum[1] += u64::from(g);
        bucket.sum[2] += u64::from(b);
    }

    let mut ranked: Vec<(u32, Bucket)> = buckets.into_iter().collect();
    ranked.sort_by(|(ka, a), (kb, b)| b.pixels.cmp(&a.pixels).then(ka.cmp(kb)));
    ranked
        .iter()
        .take(count)
        .map(|(_, bucket)| bucket.mean())
        .collect()
}
