//! The per-file conversion job: existence check, render, resize, encode,
//! write.
//!
//! `convert_one` is the error boundary of the pipeline — every render,
//! encode, or write failure is caught here and folded into a
//! [`JobResult::Failed`] so sibling jobs are never aborted. Each call
//! creates at most one file on disk and never deletes or overwrites an
//! existing one.

use crate::config::{OutputFormat, OutputMode, RunConfig};
use crate::error::JobError;
use crate::naming;
use crate::pipeline::render::PageRenderer;
use crate::pipeline::scan::InputFile;
use crate::summary::{JobOutcome, JobResult};
use image::codecs::jpeg::JpegEncoder;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Convert one input file, returning its outcome.
///
/// Algorithm:
/// 1. Derive the output path from the sanitised input name.
/// 2. If the output already exists, return `SkippedExists` — no re-render,
///    no overwrite. This is what makes re-running the pipeline cheap.
/// 3. Render the first page at the configured resolution.
/// 4. In thumbnail mode, downscale to fit the bounding box (aspect ratio
///    preserved, Lanczos3).
/// 5. Encode as PNG or JPEG and write.
pub fn convert_one(input: &InputFile, renderer: &dyn PageRenderer, config: &RunConfig) -> JobOutcome {
    let output_name = naming::derive_name(
        &input.file_name(),
        input.parent.as_deref(),
        &config.output_suffix(),
    );
    let output_path = config.output_dir.join(&output_name);

    if output_path.exists() {
        debug!("Skipping {} — output exists", input.path.display());
        return JobOutcome {
            input: input.path.clone(),
            result: JobResult::SkippedExists {
                output: output_path,
            },
        };
    }

    let result = match run_conversion(input, renderer, config, &output_path) {
        Ok(()) => JobResult::Converted {
            output: output_path,
        },
        Err(error) => {
            warn!("{}", error);
            JobResult::Failed { error }
        }
    };

    JobOutcome {
        input: input.path.clone(),
        result,
    }
}

/// Render → resize → encode → write, with typed errors at each step.
fn run_conversion(
    input: &InputFile,
    renderer: &dyn PageRenderer,
    config: &RunConfig,
    output_path: &Path,
) -> Result<(), JobError> {
    let mut image = renderer.render_page(&input.path, 0, config.resolution)?;

    if let OutputMode::Thumbnail {
        max_width,
        max_height,
    } = config.mode
    {
        if image.width() > max_width || image.height() > max_height {
            image = image.resize(max_width, max_height, FilterType::Lanczos3);
        }
    }

    let bytes = encode_image(&image, config.format, output_path)?;

    std::fs::write(output_path, &bytes).map_err(|e| JobError::WriteFailed {
        path: output_path.to_path_buf(),
        detail: e.to_string(),
    })?;

    debug!(
        "Wrote {} ({}x{}, {} bytes)",
        output_path.display(),
        image.width(),
        image.height(),
        bytes.len()
    );
    Ok(())
}

/// Encode the bitmap in the requested format.
///
/// JPEG has no alpha channel, so the image is flattened to RGB first.
fn encode_image(
    image: &DynamicImage,
    format: OutputFormat,
    output_path: &Path,
) -> Result<Vec<u8>, JobError> {
    let encode_failed = |detail: String| JobError::EncodeFailed {
        path: output_path.to_path_buf(),
        detail,
    };

    let mut buf = Vec::new();
    match format {
        OutputFormat::Png => {
            image
                .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
                .map_err(|e| encode_failed(e.to_string()))?;
        }
        OutputFormat::Jpeg { quality } => {
            let rgb = image.to_rgb8();
            let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality);
            rgb.write_with_encoder(encoder)
                .map_err(|e| encode_failed(e.to_string()))?;
        }
    }
    Ok(buf)
}
