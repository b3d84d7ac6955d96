//! PDF rasterisation: render a single page to a `DynamicImage`.
//!
//! Two backends sit behind the [`PageRenderer`] trait so the scheduler and
//! jobs never know which one is in use:
//!
//! * [`PdfiumRenderer`] — in-process via the pdfium library.
//! * [`CommandRenderer`] — shells out to an ImageMagick-style tool, passing
//!   page selection and density as process arguments.
//!
//! Both are blocking calls with no internal timeout; callers run them inside
//! `tokio::task::spawn_blocking`. The `pdfium-render` crate wraps the pdfium
//! C++ library, which uses thread-local state internally and is not safe to
//! call from async contexts directly.

use crate::config::Resolution;
use crate::error::JobError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// A PDF-rendering capability: one page in, one bitmap out.
///
/// Implementations must not write to disk beyond their own private temp
/// space; the conversion job owns the output write.
pub trait PageRenderer: Send + Sync {
    /// Render `page_index` (0-based) of the PDF at `pdf_path`.
    ///
    /// Fails with [`JobError::RenderFailed`] when the file is not a valid
    /// PDF, the page index is out of range, or the backend errors.
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        resolution: Resolution,
    ) -> Result<DynamicImage, JobError>;
}

// ── Pdfium backend ───────────────────────────────────────────────────────

/// In-process rendering via pdfium.
#[derive(Debug, Default)]
pub struct PdfiumRenderer;

impl PageRenderer for PdfiumRenderer {
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        resolution: Resolution,
    ) -> Result<DynamicImage, JobError> {
        let render_failed = |detail: String| JobError::RenderFailed {
            path: pdf_path.to_path_buf(),
            detail,
        };

        let pdfium = Pdfium::default();

        let document = pdfium
            .load_pdf_from_file(pdf_path, None)
            .map_err(|e| render_failed(format!("{e:?}")))?;

        let pages = document.pages();
        let total = pages.len() as usize;
        if page_index >= total {
            return Err(render_failed(format!(
                "page {page_index} out of range (document has {total} pages)"
            )));
        }

        let page = pages
            .get(page_index as u16)
            .map_err(|e| render_failed(format!("{e:?}")))?;

        let render_config =
            PdfRenderConfig::new().scale_page_by_factor(resolution.scale_factor());

        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| render_failed(format!("{e:?}")))?;

        let image = bitmap.as_image();
        debug!(
            "Rendered {} page {} → {}x{} px",
            pdf_path.display(),
            page_index,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

// ── External-process backend ─────────────────────────────────────────────

/// Rendering via an external command-line tool (ImageMagick-style).
///
/// Invokes `program -density <DPI> <input.pdf>[<page>] <tmp>/page.png`,
/// then loads the intermediate PNG. A non-zero exit status or a spawn error
/// maps to [`JobError::RenderFailed`].
#[derive(Debug)]
pub struct CommandRenderer {
    program: PathBuf,
}

impl CommandRenderer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl PageRenderer for CommandRenderer {
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        resolution: Resolution,
    ) -> Result<DynamicImage, JobError> {
        let render_failed = |detail: String| JobError::RenderFailed {
            path: pdf_path.to_path_buf(),
            detail,
        };

        let tmp = tempfile::TempDir::new().map_err(|e| render_failed(format!("tempdir: {e}")))?;
        let tmp_out = tmp.path().join("page.png");

        // ImageMagick page selection: `input.pdf[0]` is the first page.
        let page_arg = format!("{}[{}]", pdf_path.display(), page_index);

        let output = Command::new(&self.program)
            .arg("-density")
            .arg(resolution.dpi().to_string())
            .arg(&page_arg)
            .arg(&tmp_out)
            .output()
            .map_err(|e| render_failed(format!("failed to run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(render_failed(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        debug!(
            "External tool rendered {} page {} via {}",
            pdf_path.display(),
            page_index,
            self.program.display()
        );

        image::open(&tmp_out).map_err(|e| render_failed(format!("reading tool output: {e}")))
    }
}
