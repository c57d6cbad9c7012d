//! Removal of downloaded PDF files
//!
//! Deletion is best effort: every target is attempted, and failures are
//! collected instead of stopping the sweep.

use std::io;
use std::path::{Path, PathBuf};

/// What to delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Every `*.pdf` file directly inside this directory (case-insensitive)
    Directory(PathBuf),

    /// Exactly these files
    Files(Vec<PathBuf>),
}

/// What a cleanup sweep did
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Files removed
    pub deleted: Vec<PathBuf>,

    /// Files that were already gone
    pub missing: Vec<PathBuf>,

    /// Files that could not be removed
    pub errors: Vec<(PathBuf, io::Error)>,
}

impl CleanupReport {
    /// True when nothing failed
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Deletes downloaded PDFs
///
/// Running it twice on the same target is harmless: the second run only
/// reports files as missing (file list) or finds nothing (directory).
pub fn delete_downloaded_pdfs(target: &DeleteTarget) -> CleanupReport {
    let mut report = CleanupReport::default();

    let files = match target {
        DeleteTarget::Files(files) => files.clone(),
        DeleteTarget::Directory(dir) => match pdfs_in(dir) {
            Ok(files) => files,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                report.missing.push(dir.clone());
                return report;
            }
            Err(e) => {
                report.errors.push((dir.clone(), e));
                return report;
            }
        },
    };

    for file in files {
        match std::fs::remove_file(&file) {
            Ok(()) => {
                tracing::debug!("Deleted {}", file.display());
                report.deleted.push(file);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => report.missing.push(file),
            Err(e) => {
                tracing::warn!("Could not delete {}: {}", file.display(), e);
                report.errors.push((file, e));
            }
        }
    }

    report
}

/// Lists regular files in `dir` whose extension is `pdf` in any case
fn pdfs_in(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
