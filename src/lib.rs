//! # Screenshot Manifest
//!
//! Builds a machine-readable inventory of a directory of screenshots. Every
//! image under the root is analyzed for its dimensions, alpha channel,
//! recognized text, dominant colors and the contrast between the lightest
//! and darkest of those colors. The results land in one `manifest.json`
//! inside the scanned root.
//!
//! # Pipeline
//!
//! ```text
//! 1. Discover   root/     →  [rel paths]        (recursive, sorted)
//! 2. Analyze    each file →  FileOutcome        (parallel, isolated failures)
//! 3. Write      records   →  root/manifest.json (pretty JSON, overwritten)
//! ```
//!
//! A file that cannot be decoded or recognized is logged and left out; it
//! never stops the run. Only a bad root, an invalid `config.toml` or a
//! failed manifest write does.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Recursive discovery of candidate files by extension |
//! | [`imaging`] | Image header inspection, dominant-color quantization, WCAG luminance and contrast |
//! | [`ocr`] | The `OcrEngine` seam and the tesseract CLI engine |
//! | [`process`] | Orchestration: per-file analysis, parallel fan-out, outcome partitioning |
//! | [`manifest`] | Manifest records and the JSON writer |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`output`] | Progress line formatting for the CLI |
//!
//! # Design Decisions
//!
//! ## Collaborators Behind Traits
//!
//! Text recognition and color quantization are black boxes. The orchestrator
//! only sees [`imaging::ImageBackend`] and [`ocr::OcrEngine`], so tests drive
//! the whole pipeline with in-memory stubs and no external binaries.
//!
//! ## Deterministic Output
//!
//! Discovery sorts paths, and the parallel stage collects results in input
//! order. Two runs over an unchanged tree produce manifests that differ only
//! in the `generated` timestamp.
//!
//! ## Pure-Rust Decoding
//!
//! Headers and pixels are read with the `image` crate. OCR is the only
//! external process.

pub mod config;
pub mod imaging;
pub mod manifest;
pub mod ocr;
pub mod output;
pub mod process;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
