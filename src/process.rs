//! Pipeline orchestration.
//!
//! Drives discovery, per-file analysis and manifest writing:
//!
//! ```text
//! discover(root) ──► [a.png, b.png, …]
//!                      │  rayon par_iter, one file per task
//!                      ▼
//!        identify ─► OCR ─► dominant colors ─► contrast
//!                      │
//!                      ▼
//!        FileOutcome::Analyzed(record) | FileOutcome::Failed { path, reason }
//!                      │  indexed collect keeps discovery order
//!                      ▼
//!        partition ─► Manifest (records) + failures ─► manifest.json
//! ```
//!
//! ## Failure isolation
//!
//! A file moves from pending to either analyzed or failed. The first error
//! from any step fails that file; it is logged and left out of the manifest,
//! and the run carries on. Only a bad scan root or a failed manifest write
//! ends the run with an error.
//!
//! ## Parallel processing
//!
//! Files are analyzed on the rayon pool. `par_iter().map().collect()` over a
//! `Vec` is an indexed operation, so results land in discovery order no
//! matter which worker finishes first. Progress events go out as files
//! complete and therefore arrive in completion order.

use crate::config::{MAX_PRIMARY_COLORS, PipelineConfig};
use crate::imaging::{BackendError, ImageBackend, Rgb, palette_contrast};
use crate::manifest::{
    Dimensions, Manifest, ManifestError, ScreenshotRecord, write_manifest,
};
use crate::ocr::{self, OcrEngine, OcrError};
use crate::scan::{self, ScanError};
use chrono::Utc;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Run-level failures. Everything else is per file.
#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Scan(#[from] ScanError),
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

/// Why a single file could not be analyzed.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("{0}")]
    Metadata(BackendError),
    #[error("{0}")]
    Ocr(#[from] OcrError),
    #[error("{0}")]
    Colors(BackendError),
    #[error("no dominant colors found")]
    NoColors,
}

/// Progress notifications, sent while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Discovery finished; analysis is about to start.
    Discovered { count: usize, extension: String },
    FileAnalyzed { path: String },
    FileFailed { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: String,
    pub reason: String,
}

/// Terminal state of one file.
#[derive(Debug)]
pub enum FileOutcome {
    Analyzed(ScreenshotRecord),
    Failed(FileFailure),
}

/// Everything a completed run produced.
#[derive(Debug)]
pub struct RunReport {
    /// Candidate files found by discovery.
    pub discovered: usize,
    pub manifest: Manifest,
    pub manifest_path: PathBuf,
    /// Failed files, in discovery order.
    pub failures: Vec<FileFailure>,
}

impl RunReport {
    pub fn analyzed(&self) -> usize {
        self.manifest.screenshots.len()
    }
}

/// Analyze every matching file under `root` and write `root/manifest.json`.
pub fn process(
    root: &Path,
    config: &PipelineConfig,
    backend: &impl ImageBackend,
    ocr_engine: &impl OcrEngine,
    progress: Option<Sender<ProcessEvent>>,
) -> Result<RunReport, ProcessError> {
    let files = scan::discover(root, &config.scan.extension)?;
    info!(root = %root.display(), count = files.len(), "analyzing screenshots");
    emit(
        &progress,
        ProcessEvent::Discovered {
            count: files.len(),
            extension: config.scan.extension.clone(),
        },
    );

    let outcomes = analyze_all(root, &files, config, backend, ocr_engine, &progress);
    let (records, failures) = partition(outcomes);

    let manifest = Manifest::new(records, Utc::now());
    let manifest_path = write_manifest(root, &manifest)?;
    info!(
        path = %manifest_path.display(),
        analyzed = manifest.screenshots.len(),
        failed = failures.len(),
        "manifest written"
    );

    Ok(RunReport {
        discovered: files.len(),
        manifest,
        manifest_path,
        failures,
    })
}

/// Analyze `files` in parallel; the result is in the same order as `files`.
pub fn analyze_all(
    root: &Path,
    files: &[String],
    config: &PipelineConfig,
    backend: &impl ImageBackend,
    ocr_engine: &impl OcrEngine,
    progress: &Option<Sender<ProcessEvent>>,
) -> Vec<FileOutcome> {
    files
        .par_iter()
        .map(|rel| match analyze_file(root, rel, config, backend, ocr_engine) {
            Ok(record) => {
                emit(progress, ProcessEvent::FileAnalyzed { path: rel.clone() });
                FileOutcome::Analyzed(record)
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(path = %rel, error = %reason, "analysis failed");
                emit(
                    progress,
                    ProcessEvent::FileFailed {
                        path: rel.clone(),
                        reason: reason.clone(),
                    },
                );
                FileOutcome::Failed(FileFailure {
                    path: rel.clone(),
                    reason,
                })
            }
        })
        .collect()
}

/// Run all three analyses on one file and merge them into a record.
pub fn analyze_file(
    root: &Path,
    rel: &str,
    config: &PipelineConfig,
    backend: &impl ImageBackend,
    ocr_engine: &impl OcrEngine,
) -> Result<ScreenshotRecord, AnalysisError> {
    let path = root.join(rel);

    let info = backend.identify(&path).map_err(AnalysisError::Metadata)?;
    debug!(path = %rel, width = info.width, height = info.height, channels = info.channels, "identified");

    let ocr_text = ocr::extract_text(ocr_engine, &path, &config.ocr.language)?;
    debug!(path = %rel, chars = ocr_text.chars().count(), "recognized text");

    let colors = backend
        .dominant_colors(&path, config.colors.count)
        .map_err(AnalysisError::Colors)?;
    if colors.is_empty() {
        return Err(AnalysisError::NoColors);
    }
    let primary_colors: Vec<Rgb> = colors.into_iter().take(MAX_PRIMARY_COLORS).collect();
    let contrast = palette_contrast(&primary_colors);
    debug!(path = %rel, colors = primary_colors.len(), contrast, "analyzed colors");

    Ok(ScreenshotRecord {
        path: rel.to_string(),
        dimensions: Dimensions {
            width: info.width,
            height: info.height,
        },
        ocr_text,
        contrast,
        primary_colors,
        has_alpha: info.has_alpha(),
    })
}

/// Split outcomes into records and failures, each keeping input order.
pub fn partition(outcomes: Vec<FileOutcome>) -> (Vec<ScreenshotRecord>, Vec<FileFailure>) {
    let mut records = Vec::new();
    let mut failures = Vec::new();
    for outcome in outcomes {
        match outcome {
            FileOutcome::Analyzed(record) => records.push(record),
            FileOutcome::Failed(failure) => failures.push(failure),
        }
    }
    (records, failures)
}

fn emit(progress: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = progress {
        // A closed receiver only means nobody is printing progress.
        let _ = tx.send(event);
    }
}
