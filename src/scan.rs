//! Screenshot discovery.
//!
//! Walks the scanned root recursively (no depth limit, symlinked
//! directories not descended into) and returns every file whose name ends
//! in `.<extension>`, as root-relative paths with `/` separators:
//!
//! ```text
//! screens/                     discover(screens, "png")
//! ├── a.png                    → a.png
//! ├── .png                     → .png
//! ├── linked.png -> ../x.png   → linked.png (symlink to a regular file)
//! ├── shared -> ../other/        (symlinked directory, not entered)
//! ├── sub/
//! │   ├── b.png                → sub/b.png
//! │   └── c.txt                  (wrong extension)
//! └── sub2/
//!     └── d.PNG                  (extension match is case-sensitive)
//! ```
//!
//! Filesystem enumeration order is not stable across platforms, so results
//! are sorted lexicographically. That ordering is what the manifest follows.
//!
//! Only a missing or non-directory root is an error. A subdirectory that
//! cannot be read is logged and skipped, as is any match whose path is not
//! valid UTF-8.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Scan root not found: {0}")]
    NotFound(PathBuf),
    #[error("Scan root is not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// Root-relative paths of all files under `root` with the given extension, sorted.
pub fn discover(root: &Path, extension: &str) -> Result<Vec<String>, ScanError> {
    if !root.exists() {
        return Err(ScanError::NotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if !is_file || !has_extension(entry.path(), extension) {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        match to_slash_path(rel) {
            Some(path) => found.push(path),
            None => warn!(path = %entry.path().display(), "skipping non UTF-8 path"),
        }
    }

    found.sort();
    debug!(root = %root.display(), count = found.len(), "discovery finished");
    Ok(found)
}

/// True when the file name ends in `.<extension>`, including a bare `.<extension>`.
fn has_extension(path: &Path, extension: &str) -> bool {
    if path.extension() == Some(OsStr::new(extension)) {
        return true;
    }
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.strip_prefix('.'))
        .is_some_and(|rest| rest == extension)
}

/// Join path components with `/` regardless of platform. `None` if any
/// component is not valid UTF-8.
fn to_slash_path(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for component in rel.components() {
        if let Component::Normal(part) = component {
            parts.push(part.to_str()?);
        }
    }
    Some(parts.join("/"))
}
