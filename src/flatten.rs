//! One-shot directory-tree flattening: move nested PDFs up into a single
//! flat directory, then prune the emptied subdirectories.
//!
//! Logically separate from conversion — run it before the scheduler when a
//! PDF collection arrives as a tree. Each moved file is renamed
//! `{immediate-parent-dir}-{file}` so same-named files from different
//! folders cannot collide at the destination. Idempotent: a second run over
//! the already-flat directory moves nothing.

use crate::error::ThumbsError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One file relocated by [`flatten`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Flatten every `.pdf` below `pdf_dir` into `pdf_dir` itself.
///
/// A destination name that already exists is never overwritten — the source
/// file stays where it is and a warning is logged. Emptied directories are
/// removed bottom-up; non-empty ones are left alone.
pub fn flatten(pdf_dir: &Path) -> Result<Vec<MovedFile>, ThumbsError> {
    if !pdf_dir.is_dir() {
        return Err(ThumbsError::InputDirMissing {
            path: pdf_dir.to_path_buf(),
        });
    }

    let mut nested = Vec::new();
    collect_nested_pdfs(pdf_dir, pdf_dir, &mut nested)?;

    let mut moved = Vec::new();
    for source in nested {
        let file_name = match source.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => continue,
        };
        let parent_name = source
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("nested");

        let destination = pdf_dir.join(format!("{parent_name}-{file_name}"));
        if destination.exists() {
            warn!(
                "Not moving {} — destination {} already exists",
                source.display(),
                destination.display()
            );
            continue;
        }

        std::fs::rename(&source, &destination).map_err(|e| ThumbsError::FlattenFailed {
            from: source.clone(),
            to: destination.clone(),
            source: e,
        })?;
        debug!("Moved {} → {}", source.display(), destination.display());
        moved.push(MovedFile {
            from: source,
            to: destination,
        });
    }

    prune_empty_dirs(pdf_dir, pdf_dir)?;

    info!(
        "Flatten complete: {} files moved into {}",
        moved.len(),
        pdf_dir.display()
    );
    Ok(moved)
}

/// Recursively collect PDFs strictly below `root` (the root's own files
/// are already flat).
fn collect_nested_pdfs(dir: &Path, root: &Path, out: &mut Vec<PathBuf>) -> Result<(), ThumbsError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ThumbsError::ScanFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ThumbsError::ScanFailed {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();

        if path.is_dir() {
            collect_nested_pdfs(&path, root, out)?;
        } else if dir != root {
            let is_pdf = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
            if is_pdf {
                out.push(path);
            }
        }
    }
    Ok(())
}

/// Remove empty directories below `root`, depth-first. `remove_dir` only
/// succeeds on empty directories, so non-empty ones survive untouched.
fn prune_empty_dirs(dir: &Path, root: &Path) -> Result<(), ThumbsError> {
    let entries = std::fs::read_dir(dir).map_err(|source| ThumbsError::ScanFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.is_dir() {
            prune_empty_dirs(&path, root)?;
        }
    }

    if dir != root {
        let _ = std::fs::remove_dir(dir);
    }
    Ok(())
}
