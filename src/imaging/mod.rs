//! Pixel-level collaborators and color math.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image` decoder header (width, height, channel count) |
//! | **Dominant colors** | histogram quantizer over decoded RGBA pixels |
//! | **Luminance / contrast** | WCAG formulas in [`color`] |
//!
//! The module is split into:
//! - **Color**: [`Rgb`] value type, luminance and contrast math (pure, unit testable)
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]

pub mod backend;
pub mod color;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend, ImageInfo};
pub use color::{ParseColorError, Rgb, contrast_ratio, palette_contrast};
pub use rust_backend::{RustBackend, supported_input_extensions};
