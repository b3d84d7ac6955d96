//! Input enumeration: find the PDF files a run will convert.
//!
//! Order is filesystem-enumeration order, not sorted — callers needing
//! deterministic ordering must sort explicitly.

use crate::error::ThumbsError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One discovered input file. Immutable; not tracked after the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    /// Path to the PDF on disk.
    pub path: PathBuf,
    /// Name of the source subdirectory, when the file was picked out of one
    /// in subdirectory mode. Feeds into output naming to disambiguate
    /// same-named files from different folders.
    pub parent: Option<String>,
}

impl InputFile {
    /// The file name component, lossily decoded.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

fn read_dir(dir: &Path) -> Result<std::fs::ReadDir, ThumbsError> {
    std::fs::read_dir(dir).map_err(|source| ThumbsError::ScanFailed {
        path: dir.to_path_buf(),
        source,
    })
}

/// Enumerate `.pdf` files (case-insensitive extension) directly under
/// `input_dir`.
///
/// With `subdirectory_mode`, additionally selects the first PDF found in
/// each immediate subdirectory — which one is filesystem-dependent — and
/// tags it with the subdirectory name.
///
/// Fails only when a directory cannot be read; a missing input directory is
/// caught earlier by the scheduler's setup checks.
pub fn enumerate_pdfs(input_dir: &Path, subdirectory_mode: bool) -> Result<Vec<InputFile>, ThumbsError> {
    let mut files = Vec::new();
    let mut subdirs = Vec::new();

    for entry in read_dir(input_dir)? {
        let entry = entry.map_err(|source| ThumbsError::ScanFailed {
            path: input_dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_file() && is_pdf(&path) {
            files.push(InputFile { path, parent: None });
        } else if subdirectory_mode && path.is_dir() {
            subdirs.push(path);
        }
    }

    for subdir in subdirs {
        let first_pdf = read_dir(&subdir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.is_file() && is_pdf(p));

        if let Some(path) = first_pdf {
            let parent = subdir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned());
            files.push(InputFile { path, parent });
        }
    }

    debug!("Found {} PDF files under {}", files.len(), input_dir.display());
    Ok(files)
}
