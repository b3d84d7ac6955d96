//! CLI binary for pdfthumbs.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`
//! and prints per-file status lines plus a final summary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use pdfthumbs::{
    flatten, run, ConversionReporter, OutputFormat, OutputMode, RenderBackend, Reporter,
    Resolution, RunConfig, RunSummary,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress reporter using indicatif ────────────────────────────────────

/// Terminal reporter: a progress bar anchored at the bottom plus one log
/// line per file. Files complete out-of-order under concurrency, so every
/// method may be called from any worker thread.
struct CliReporter {
    bar: ProgressBar,
}

impl CliReporter {
    /// Create a reporter whose bar length is set by `on_run_start` once the
    /// scan knows the file count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionReporter for CliReporter {
    fn on_run_start(&self, total_files: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_files as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Found {total_files} PDF files to process"))
        ));
    }

    fn on_file_converted(&self, input_name: &str, output_name: &str) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            input_name,
            dim(&format!("→ {output_name}"))
        ));
        self.bar.inc(1);
    }

    fn on_file_skipped(&self, input_name: &str) {
        self.bar
            .println(format!("  {} {}  {}", dim("•"), input_name, dim("skipped — exists")));
        self.bar.inc(1);
    }

    fn on_file_failed(&self, input_name: &str, error: &str) {
        let msg = truncate_message(error, 100);
        self.bar
            .println(format!("  {} {}  {}", red("✗"), input_name, red(&msg)));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _summary: &RunSummary) {
        self.bar.finish_and_clear();
    }
}

/// Truncate long error messages to keep per-file log lines tidy. Cuts on a
/// character boundary so multi-byte text never splits mid-character.
fn truncate_message(error: &str, max_chars: usize) -> String {
    match error.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}\u{2026}", &error[..idx]),
        None => error.to_string(),
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # JPEG thumbnails for every PDF in a folder (skips existing outputs)
  pdfthumbs convert public/pdfs -o public/images/projects

  # Full-resolution PNGs at 2x zoom
  pdfthumbs convert public/pdfs -o public/images/projects --mode full --format png --zoom 2

  # One thumbnail per project subdirectory, named after the subdirectory
  pdfthumbs convert public/pdfs -o public/images/thumbnails --subdirs

  # Use ImageMagick instead of the built-in pdfium backend
  pdfthumbs convert public/pdfs -o out --tool magick --dpi 300

  # Flatten a nested PDF tree into one directory first
  pdfthumbs flatten public/pdfs

ENVIRONMENT VARIABLES:
  PDFTHUMBS_CONCURRENCY   Number of parallel conversion workers
  PDFTHUMBS_DPI           Rendering DPI
  PDFIUM_LIB_PATH         Path to an existing libpdfium
"#;

/// Batch-convert the first page of PDF files to PNG/JPEG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdfthumbs",
    version,
    about = "Batch-convert the first page of PDF files to PNG/JPEG images",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "PDFTHUMBS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "PDFTHUMBS_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert every PDF in a directory to an image, skipping existing outputs.
    Convert(ConvertArgs),
    /// Move nested PDFs up into one flat directory, prefixing names with the
    /// parent directory, then prune emptied subdirectories.
    Flatten(FlattenArgs),
}

#[derive(clap::Args, Debug)]
struct ConvertArgs {
    /// Directory containing .pdf files.
    input_dir: PathBuf,

    /// Directory that receives the images (created if absent).
    #[arg(short, long)]
    output: PathBuf,

    /// Number of parallel conversion workers.
    #[arg(short, long, env = "PDFTHUMBS_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Rendering DPI (36–1200).
    #[arg(long, env = "PDFTHUMBS_DPI", default_value_t = 150, conflicts_with = "zoom")]
    dpi: u32,

    /// Rendering zoom factor over the page's natural size (alternative to --dpi).
    #[arg(long)]
    zoom: Option<f32>,

    /// Output mode: bounded thumbnail or full-resolution page.
    #[arg(long, value_enum, default_value = "thumbnail")]
    mode: ModeArg,

    /// Output image format.
    #[arg(long, value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// JPEG quality (0–100); ignored for PNG.
    #[arg(long, default_value_t = 85)]
    quality: u8,

    /// Thumbnail bounding-box width in pixels.
    #[arg(long, default_value_t = 800)]
    max_width: u32,

    /// Thumbnail bounding-box height in pixels.
    #[arg(long, default_value_t = 600)]
    max_height: u32,

    /// Also pick the first PDF from each immediate subdirectory, naming its
    /// output after the subdirectory.
    #[arg(long)]
    subdirs: bool,

    /// Render via this external ImageMagick-style command instead of the
    /// built-in pdfium backend.
    #[arg(long, value_name = "PROGRAM")]
    tool: Option<PathBuf>,

    /// Print the run summary as JSON instead of a text line.
    #[arg(long)]
    json: bool,

    /// Disable the progress bar and per-file log lines.
    #[arg(long)]
    no_progress: bool,
}

#[derive(clap::Args, Debug)]
struct FlattenArgs {
    /// Directory whose nested PDFs should be pulled up to the top level.
    pdf_dir: PathBuf,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum ModeArg {
    Thumbnail,
    Full,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpeg,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        // Library INFO lines would interleave badly with the progress bar;
        // the bar carries the per-file feedback instead.
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .with_writer(io::stderr)
        .init();

    match cli.command {
        Commands::Convert(args) => run_convert(args, cli.quiet).await,
        Commands::Flatten(args) => run_flatten(args, cli.quiet),
    }
}

async fn run_convert(args: ConvertArgs, quiet: bool) -> Result<()> {
    let show_progress = !quiet && !args.no_progress && !args.json;

    let resolution = match args.zoom {
        Some(zoom) => Resolution::Zoom(zoom),
        None => Resolution::Dpi(args.dpi),
    };

    let mode = match args.mode {
        ModeArg::Thumbnail => OutputMode::Thumbnail {
            max_width: args.max_width,
            max_height: args.max_height,
        },
        ModeArg::Full => OutputMode::FullPage,
    };

    let format = match args.format {
        FormatArg::Png => OutputFormat::Png,
        FormatArg::Jpeg => OutputFormat::Jpeg {
            quality: args.quality,
        },
    };

    let backend = match args.tool {
        Some(program) => RenderBackend::External { program },
        None => RenderBackend::Pdfium,
    };

    let mut builder = RunConfig::builder(&args.input_dir, &args.output)
        .concurrency(args.concurrency)
        .resolution(resolution)
        .mode(mode)
        .format(format)
        .subdirectory_mode(args.subdirs)
        .backend(backend);

    if show_progress {
        builder = builder.reporter(CliReporter::new_dynamic() as Reporter);
    }

    let config = builder.build().context("Invalid configuration")?;
    let summary = run(&config).await.context("Conversion run failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !quiet {
        let tick = if summary.failed == 0 {
            green("✔")
        } else {
            cyan("⚠")
        };
        println!(
            "{} {} out of {} files processed successfully  {}",
            tick,
            bold(&summary.successful().to_string()),
            summary.total,
            dim(&format!(
                "({} converted, {} skipped, {} failed, {}ms)",
                summary.converted, summary.skipped, summary.failed, summary.duration_ms
            )),
        );
    }

    Ok(())
}

fn run_flatten(args: FlattenArgs, quiet: bool) -> Result<()> {
    let moved = flatten(&args.pdf_dir).context("Flatten failed")?;

    if !quiet {
        for m in &moved {
            println!("Moved: {} -> {}", m.from.display(), m.to.display());
        }
        println!(
            "{} {} files moved into {}",
            green("✔"),
            bold(&moved.len().to_string()),
            args.pdf_dir.display()
        );
    }

    Ok(())
}
