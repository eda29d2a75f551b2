//! Color values and perceptual color math.
//!
//! All functions here are pure and testable without any I/O or images.
//!
//! Luminance and contrast follow the WCAG 2.x definitions:
//!
//! ```text
//! channel  c = v / 255
//! linear   c ≤ 0.03928 ? c / 12.92 : ((c + 0.055) / 1.055) ^ 2.4
//! L        0.2126·R + 0.7152·G + 0.0722·B
//! ratio    (L_lighter + 0.05) / (L_darker + 0.05)      ∈ [1, 21]
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid hex color '{0}': expected #rrggbb")]
pub struct ParseColorError(pub String);

/// An opaque 8-bit sRGB color.
///
/// Serialized as a lowercase `#rrggbb` string, which is also what
/// [`Display`](fmt::Display) produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Relative luminance in `[0, 1]`.
    pub fn luminance(self) -> f64 {
        0.2126 * to_linear(self.r) + 0.7152 * to_linear(self.g) + 0.0722 * to_linear(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ParseColorError;

    /// Accepts `#rrggbb` in either case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// sRGB gamma expansion of one 8-bit channel.
fn to_linear(value: u8) -> f64 {
    let c = f64::from(value) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Round to one decimal place.
fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Contrast ratio between two colors, rounded to one decimal place.
///
/// Symmetric in its arguments; always within `[1.0, 21.0]`.
///
/// # Examples
/// ```
/// # use screenshot_manifest::imaging::{Rgb, contrast_ratio};
/// assert_eq!(contrast_ratio(Rgb::BLACK, Rgb::WHITE), 21.0);
/// assert_eq!(contrast_ratio(Rgb::WHITE, Rgb::WHITE), 1.0);
/// ```
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.luminance(), b.luminance());
    let (lighter, darker) = (la.max(lb), la.min(lb));
    round_tenth((lighter + 0.05) / (darker + 0.05))
}

/// Contrast between the lightest and darkest colors of a palette.
///
/// Palette order is irrelevant. Fewer than two colors yields `1.0`.
pub fn palette_contrast(palette: &[Rgb]) -> f64 {
    let mut sorted = palette.to_vec();
    sorted.sort_by(|a, b| a.luminance().total_cmp(&b.luminance()));
    match (sorted.first(), sorted.last()) {
        (Some(&darkest), Some(&lightest)) if sorted.len() >= 2 => {
            contrast_ratio(lightest, darkest)
        }
        _ => 1.0,
    }
}
