//! Text recognition.
//!
//! [`OcrEngine`] is the seam between the pipeline and whatever recognizes
//! text. Engines are built once per run and shared by every worker, so the
//! trait requires `Sync`. Construction is the only setup step; dropping the
//! engine releases whatever it holds.
//!
//! The shipped engine is [`TesseractEngine`], which runs the `tesseract`
//! executable once per image:
//!
//! ```text
//! tesseract <image> stdout -l <language>
//! ```
//!
//! Output is taken as-is. There is no confidence filtering and no retry.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OcrError {
    #[error("OCR engine '{0}' not found")]
    EngineUnavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("OCR failed: {0}")]
    Failed(String),
}

pub trait OcrEngine: Sync {
    /// Raw recognized text for one image.
    fn recognize(&self, path: &Path, language: &str) -> Result<String, OcrError>;
}

/// Recognized text with surrounding whitespace removed.
pub fn extract_text(
    engine: &impl OcrEngine,
    path: &Path,
    language: &str,
) -> Result<String, OcrError> {
    let raw = engine.recognize(path, language)?;
    Ok(raw.trim().to_string())
}

/// Tesseract CLI wrapper.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
}

impl TesseractEngine {
    /// `command` is an executable name resolved through `PATH`, or a path.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, path: &Path, language: &str) -> Result<String, OcrError> {
        let output = Command::new(&self.command)
            .arg(path)
            .arg("stdout")
            .arg("-l")
            .arg(language)
            .output()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    OcrError::EngineUnavailable(self.command.display().to_string())
                }
                _ => OcrError::Io(e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let reason = stderr.trim();
            return Err(OcrError::Failed(if reason.is_empty() {
                format!("{} exited with {}", self.command.display(), output.status)
            } else {
                reason.to_string()
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
