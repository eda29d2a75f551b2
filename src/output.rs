//! CLI progress output.
//!
//! Human-facing lines go to stdout; diagnostics go through `tracing` to
//! stderr. A run prints:
//!
//! ```text
//! Found 3 png files
//!   settings/dark.png... done
//!   broken.png... error: Decode failed: ...
//!   home.png... done
//! Analyzed 2 of 3 files
//! Manifest written to screens/manifest.json
//! ```
//!
//! Per-file lines arrive in completion order, so they may interleave
//! differently from the manifest.
//!
//! Each `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::process::{ProcessEvent, RunReport};

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::Discovered { count, extension } => {
            vec![format!("Found {} {} files", count, extension)]
        }
        ProcessEvent::FileAnalyzed { path } => vec![format!("  {}... done", path)],
        ProcessEvent::FileFailed { path, reason } => {
            vec![format!("  {}... error: {}", path, first_line(reason))]
        }
    }
}

pub fn format_summary(report: &RunReport) -> Vec<String> {
    vec![
        format!("Analyzed {} of {} files", report.analyzed(), report.discovered),
        format!("Manifest written to {}", report.manifest_path.display()),
    ]
}

pub fn print_process_event(event: &ProcessEvent) {
    for line in format_process_event(event) {
        println!("{}", line);
    }
}

pub fn print_summary(report: &RunReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}

/// Tesseract errors can span many lines; keep progress to one per file.
fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or(text)
}
