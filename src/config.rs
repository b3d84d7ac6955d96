//! Configuration types for a conversion run.
//!
//! All behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share the config across worker tasks and to diff two runs to
//! understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! Only the input and output directories are required; everything else has
//! a sensible default. The builder lets callers set exactly what they care
//! about and validates the combination once, in `build()`.

use crate::error::ThumbsError;
use crate::progress::Reporter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Target resolution for page rendering.
///
/// Both spellings appear in the wild: library backends usually take a zoom
/// multiplier relative to the page's natural size, command-line tools take
/// dots-per-inch. Either converts to the other (PDF points are 1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Resolution {
    /// Dots per inch. 150 is plenty for thumbnails; 300 for print-quality.
    Dpi(u32),
    /// Linear zoom multiplier over the page's natural size.
    Zoom(f32),
}

impl Resolution {
    /// Linear scale factor relative to the page's natural (72 DPI) size.
    pub fn scale_factor(&self) -> f32 {
        match self {
            Resolution::Dpi(dpi) => *dpi as f32 / 72.0,
            Resolution::Zoom(zoom) => *zoom,
        }
    }

    /// Equivalent DPI, for backends that take a density argument.
    pub fn dpi(&self) -> u32 {
        match self {
            Resolution::Dpi(dpi) => *dpi,
            Resolution::Zoom(zoom) => (zoom * 72.0).round() as u32,
        }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Dpi(150)
    }
}

/// Whether outputs are full-resolution renders or bounded thumbnails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputMode {
    /// Write the rendered page at its rendered size.
    FullPage,
    /// Downscale to fit within the bounding box, preserving aspect ratio.
    Thumbnail { max_width: u32, max_height: u32 },
}

impl Default for OutputMode {
    fn default() -> Self {
        OutputMode::Thumbnail {
            max_width: 800,
            max_height: 600,
        }
    }
}

/// Output image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Png,
    /// JPEG with a 0–100 quality level.
    Jpeg { quality: u8 },
}

impl OutputFormat {
    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Jpeg { .. } => ".jpg",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: 85 }
    }
}

/// Which rendering backend to use.
///
/// Both backends sit behind the same [`crate::pipeline::render::PageRenderer`]
/// trait, so the scheduler and jobs are agnostic to the choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderBackend {
    /// In-process rendering via the pdfium library (default).
    Pdfium,
    /// Shell out to an external ImageMagick-style tool; page selection and
    /// density are passed as process arguments.
    External { program: PathBuf },
}

impl Default for RenderBackend {
    fn default() -> Self {
        RenderBackend::Pdfium
    }
}

/// Configuration for one batch-conversion run.
///
/// Built via [`RunConfig::builder()`].
///
/// # Example
/// ```rust
/// use pdfthumbs::{OutputFormat, OutputMode, Resolution, RunConfig};
///
/// let config = RunConfig::builder("public/pdfs", "public/images/projects")
///     .concurrency(4)
///     .resolution(Resolution::Dpi(150))
///     .mode(OutputMode::Thumbnail { max_width: 800, max_height: 600 })
///     .format(OutputFormat::Jpeg { quality: 80 })
///     .build()
///     .unwrap();
/// assert_eq!(config.output_suffix(), "-thumb.jpg");
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Directory scanned for `.pdf` files.
    pub input_dir: PathBuf,

    /// Directory that receives the image outputs. Created (recursively) if
    /// absent; this is the only filesystem mutation outside each job's own
    /// output write.
    pub output_dir: PathBuf,

    /// Number of parallel conversion workers. Default: 4.
    ///
    /// Jobs are independent, so this is purely a throughput knob bounded by
    /// I/O and CPU contention, not a correctness concern.
    pub concurrency: usize,

    /// Rendering resolution. Default: 150 DPI.
    pub resolution: Resolution,

    /// Full-page or bounded-thumbnail output. Default: 800×600 thumbnail.
    pub mode: OutputMode,

    /// PNG or JPEG (with quality). Default: JPEG quality 85.
    pub format: OutputFormat,

    /// Also pick the first PDF out of each immediate subdirectory, naming
    /// its output after the subdirectory. Default: false.
    pub subdirectory_mode: bool,

    /// Rendering backend. Default: in-process pdfium.
    pub backend: RenderBackend,

    /// Optional per-file progress reporter. Purely observational.
    pub reporter: Option<Reporter>,
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("input_dir", &self.input_dir)
            .field("output_dir", &self.output_dir)
            .field("concurrency", &self.concurrency)
            .field("resolution", &self.resolution)
            .field("mode", &self.mode)
            .field("format", &self.format)
            .field("subdirectory_mode", &self.subdirectory_mode)
            .field("backend", &self.backend)
            .field("reporter", &self.reporter.as_ref().map(|_| "<dyn ConversionReporter>"))
            .finish()
    }
}

impl RunConfig {
    /// Create a builder with the two required paths.
    pub fn builder(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> RunConfigBuilder {
        RunConfigBuilder {
            config: RunConfig {
                input_dir: input_dir.into(),
                output_dir: output_dir.into(),
                concurrency: 4,
                resolution: Resolution::default(),
                mode: OutputMode::default(),
                format: OutputFormat::default(),
                subdirectory_mode: false,
                backend: RenderBackend::default(),
                reporter: None,
            },
        }
    }

    /// Suffix appended to every sanitised stem: `-thumb.jpg` in thumbnail
    /// mode, the bare extension (`.png`, `.jpg`) in full-page mode.
    pub fn output_suffix(&self) -> String {
        match self.mode {
            OutputMode::Thumbnail { .. } => format!("-thumb{}", self.format.extension()),
            OutputMode::FullPage => self.format.extension().to_string(),
        }
    }
}

/// Builder for [`RunConfig`].
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n;
        self
    }

    pub fn resolution(mut self, r: Resolution) -> Self {
        self.config.resolution = r;
        self
    }

    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn format(mut self, format: OutputFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn subdirectory_mode(mut self, v: bool) -> Self {
        self.config.subdirectory_mode = v;
        self
    }

    pub fn backend(mut self, backend: RenderBackend) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn reporter(mut self, reporter: Reporter) -> Self {
        self.config.reporter = Some(reporter);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, ThumbsError> {
        let c = &self.config;

        if c.concurrency == 0 {
            return Err(ThumbsError::InvalidConfig("Concurrency must be ≥ 1".into()));
        }

        match c.resolution {
            Resolution::Dpi(dpi) if !(36..=1200).contains(&dpi) => {
                return Err(ThumbsError::InvalidConfig(format!(
                    "DPI must be 36–1200, got {dpi}"
                )));
            }
            Resolution::Zoom(zoom) if !(zoom > 0.0) => {
                return Err(ThumbsError::InvalidConfig(format!(
                    "Zoom must be positive, got {zoom}"
                )));
            }
            _ => {}
        }

        if let OutputFormat::Jpeg { quality } = c.format {
            if quality > 100 {
                return Err(ThumbsError::InvalidConfig(format!(
                    "JPEG quality must be 0–100, got {quality}"
                )));
            }
        }

        if let OutputMode::Thumbnail {
            max_width,
            max_height,
        } = c.mode
        {
            if max_width == 0 || max_height == 0 {
                return Err(ThumbsError::InvalidConfig(
                    "Thumbnail bounding box must be non-zero".into(),
                ));
            }
        }

        Ok(self.config)
    }
}
