//! End-to-end tests for the pdfthumbs pipeline.
//!
//! These run the real scheduler, scanner, namer, job, and reporter against
//! temp directories, with a stub `PageRenderer` standing in for pdfium so no
//! PDF engine or sample files are needed.
//!
//! Run with:
//!   cargo test --test e2e -- --nocapture

use image::{DynamicImage, Rgba, RgbaImage};
use pdfthumbs::{
    run_sync, run_with_renderer, ConversionReporter, JobError, OutputFormat, OutputMode,
    PageRenderer, Resolution, RunConfig, RunSummary,
};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Renders a solid-colour bitmap for any input; never opens the file.
struct StubRenderer;

impl PageRenderer for StubRenderer {
    fn render_page(
        &self,
        _pdf_path: &Path,
        _page_index: usize,
        _resolution: Resolution,
    ) -> Result<DynamicImage, JobError> {
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            320,
            240,
            Rgba([10, 120, 200, 255]),
        )))
    }
}

/// Fails for any input whose file name contains "corrupt"; renders the rest.
struct SelectiveRenderer;

impl PageRenderer for SelectiveRenderer {
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        resolution: Resolution,
    ) -> Result<DynamicImage, JobError> {
        let name = pdf_path.file_name().unwrap_or_default().to_string_lossy();
        if name.contains("corrupt") {
            return Err(JobError::RenderFailed {
                path: pdf_path.to_path_buf(),
                detail: "invalid xref table".into(),
            });
        }
        StubRenderer.render_page(pdf_path, page_index, resolution)
    }
}

/// Panics (instead of erroring) for any input whose file name contains
/// "landmine"; renders the rest.
struct PanickingRenderer;

impl PageRenderer for PanickingRenderer {
    fn render_page(
        &self,
        pdf_path: &Path,
        page_index: usize,
        resolution: Resolution,
    ) -> Result<DynamicImage, JobError> {
        let name = pdf_path.file_name().unwrap_or_default().to_string_lossy();
        if name.contains("landmine") {
            panic!("backend assertion tripped");
        }
        StubRenderer.render_page(pdf_path, page_index, resolution)
    }
}

fn touch_pdf(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"%PDF-1.4 stub").unwrap();
}

fn thumbnail_config(input: &Path, output: &Path, concurrency: usize) -> RunConfig {
    RunConfig::builder(input, output)
        .concurrency(concurrency)
        .mode(OutputMode::Thumbnail {
            max_width: 120,
            max_height: 90,
        })
        .format(OutputFormat::Jpeg { quality: 80 })
        .build()
        .expect("valid config")
}

fn output_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Scheduler behaviour ──────────────────────────────────────────────────────

#[tokio::test]
async fn converts_a_directory_of_pdfs() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch_pdf(&input.path().join("Annual Report.pdf"));
    touch_pdf(&input.path().join("bridge_design.pdf"));

    let config = thumbnail_config(input.path(), output.path(), 4);
    let summary = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("run should succeed");

    assert_eq!(summary.converted, 2);
    assert_eq!(summary.skipped, 0);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.total, 2);
    assert_eq!(
        output_files(output.path()),
        vec!["annual-report-thumb.jpg", "bridge-design-thumb.jpg"]
    );
}

#[tokio::test]
async fn second_run_is_idempotent() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    for i in 0..5 {
        touch_pdf(&input.path().join(format!("doc {i}.pdf")));
    }

    let config = thumbnail_config(input.path(), output.path(), 4);

    let first = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("first run");
    assert_eq!(first.converted, 5);
    assert_eq!(first.total, 5);

    let before = output_files(output.path());

    let second = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("second run");
    assert_eq!(second.converted, 0, "no new writes on the second run");
    assert_eq!(second.skipped, 5, "every file skipped as existing");
    assert_eq!(second.total, first.total, "identical totals both times");

    assert_eq!(output_files(output.path()), before, "outputs unchanged");
}

#[tokio::test]
async fn corrupt_file_fails_alone() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch_pdf(&input.path().join("good-one.pdf"));
    touch_pdf(&input.path().join("corrupt-scan.pdf"));
    touch_pdf(&input.path().join("good-two.pdf"));

    let config = thumbnail_config(input.path(), output.path(), 4);
    let summary = run_with_renderer(&config, Arc::new(SelectiveRenderer))
        .await
        .expect("run should still succeed overall");

    assert_eq!(summary.failed, 1, "exactly one failure");
    assert_eq!(summary.converted, 2, "siblings unaffected");
    assert_eq!(summary.total, 3);
    assert_eq!(
        output_files(output.path()),
        vec!["good-one-thumb.jpg", "good-two-thumb.jpg"]
    );
}

#[tokio::test]
async fn worker_panic_is_contained_and_named() {
    struct FailureCollector {
        messages: Mutex<Vec<String>>,
    }

    impl ConversionReporter for FailureCollector {
        fn on_file_failed(&self, _input: &str, error: &str) {
            self.messages.lock().unwrap().push(error.to_string());
        }
    }

    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch_pdf(&input.path().join("fine.pdf"));
    touch_pdf(&input.path().join("landmine.pdf"));

    let collector = Arc::new(FailureCollector {
        messages: Mutex::new(Vec::new()),
    });
    let config = RunConfig::builder(input.path(), output.path())
        .reporter(Arc::clone(&collector) as Arc<dyn ConversionReporter>)
        .build()
        .unwrap();

    let summary = run_with_renderer(&config, Arc::new(PanickingRenderer))
        .await
        .expect("a panicking worker must not abort the run");

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.converted, 1, "sibling unaffected");

    let messages = collector.messages.lock().unwrap();
    assert_eq!(messages.len(), 1);
    // The failure line names the input that died, with its full path, and
    // is not dressed up as a rendering error.
    assert!(
        messages[0].contains("Conversion task failed"),
        "got: {}",
        messages[0]
    );
    assert!(
        messages[0].contains(&input.path().join("landmine.pdf").display().to_string()),
        "got: {}",
        messages[0]
    );
}

#[tokio::test]
async fn empty_input_dir_yields_zero_summary() {
    let input = TempDir::new().unwrap();
    let output_parent = TempDir::new().unwrap();
    let output = output_parent.path().join("does/not/exist/yet");

    let config = thumbnail_config(input.path(), &output, 4);
    let summary = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("empty run succeeds");

    assert_eq!(summary, RunSummary {
        duration_ms: summary.duration_ms,
        ..Default::default()
    });
    assert_eq!(summary.successful(), 0);
    assert!(output.is_dir(), "output directory still created");
}

#[tokio::test]
async fn missing_input_dir_is_fatal() {
    let output = TempDir::new().unwrap();
    let config = thumbnail_config(Path::new("/no/such/input"), output.path(), 4);

    let err = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Input directory not found"));
}

#[tokio::test]
async fn concurrency_does_not_change_results() {
    let input = TempDir::new().unwrap();
    for i in 0..20 {
        let name = if i % 5 == 0 {
            format!("corrupt-{i}.pdf")
        } else {
            format!("file-{i}.pdf")
        };
        touch_pdf(&input.path().join(name));
    }

    let out_serial = TempDir::new().unwrap();
    let serial = run_with_renderer(
        &thumbnail_config(input.path(), out_serial.path(), 1),
        Arc::new(SelectiveRenderer),
    )
    .await
    .expect("serial run");

    let out_parallel = TempDir::new().unwrap();
    let parallel = run_with_renderer(
        &thumbnail_config(input.path(), out_parallel.path(), 8),
        Arc::new(SelectiveRenderer),
    )
    .await
    .expect("parallel run");

    // Jobs are independent: pool size only changes wall-clock time.
    assert_eq!(serial.converted, parallel.converted);
    assert_eq!(serial.skipped, parallel.skipped);
    assert_eq!(serial.failed, parallel.failed);
    assert_eq!(serial.total, parallel.total);
    assert_eq!(serial.total, 20);
    assert_eq!(serial.failed, 4);
    assert_eq!(output_files(out_serial.path()), output_files(out_parallel.path()));
}

// ── Naming collision (documented, unresolved) ────────────────────────────────

#[tokio::test]
async fn name_collision_produces_exactly_one_output() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    // Case/punctuation variants that sanitise to the same stem.
    touch_pdf(&input.path().join("My Report (final).pdf"));
    touch_pdf(&input.path().join("my-report-final.pdf"));

    let config = thumbnail_config(input.path(), output.path(), 1);
    let summary = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("run");

    // Which input "wins" is implementation-defined (enumeration order);
    // the invariant is one output file and no failures.
    assert_eq!(output_files(output.path()), vec!["my-report-final-thumb.jpg"]);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.converted + summary.skipped, 2);
}

// ── Subdirectory mode ────────────────────────────────────────────────────────

#[tokio::test]
async fn subdirectory_mode_names_outputs_after_the_subdir() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch_pdf(&input.path().join("top.pdf"));
    touch_pdf(&input.path().join("Conveyor Project/spec.pdf"));
    touch_pdf(&input.path().join("Bridge/plan.pdf"));

    let config = RunConfig::builder(input.path(), output.path())
        .subdirectory_mode(true)
        .mode(OutputMode::Thumbnail {
            max_width: 120,
            max_height: 90,
        })
        .format(OutputFormat::Jpeg { quality: 80 })
        .build()
        .unwrap();

    let summary = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("run");

    assert_eq!(summary.converted, 3);
    assert_eq!(
        output_files(output.path()),
        vec![
            "bridge-plan-thumb.jpg",
            "conveyor-project-spec-thumb.jpg",
            "top-thumb.jpg"
        ]
    );
}

// ── Output naming across modes ───────────────────────────────────────────────

#[tokio::test]
async fn full_page_mode_uses_bare_png_names() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch_pdf(&input.path().join("Site Layout.pdf"));

    let config = RunConfig::builder(input.path(), output.path())
        .mode(OutputMode::FullPage)
        .format(OutputFormat::Png)
        .resolution(Resolution::Zoom(2.0))
        .build()
        .unwrap();

    let summary = run_with_renderer(&config, Arc::new(StubRenderer))
        .await
        .expect("run");

    assert_eq!(summary.converted, 1);
    assert_eq!(output_files(output.path()), vec!["site-layout.png"]);
}

// ── Reporter wiring ──────────────────────────────────────────────────────────

#[tokio::test]
async fn reporter_events_match_the_summary() {
    struct CountingReporter {
        started_with: AtomicUsize,
        converted: AtomicUsize,
        skipped: AtomicUsize,
        failed: AtomicUsize,
        completed: AtomicUsize,
    }

    impl ConversionReporter for CountingReporter {
        fn on_run_start(&self, total_files: usize) {
            self.started_with.store(total_files, Ordering::SeqCst);
        }
        fn on_file_converted(&self, _input: &str, _output: &str) {
            self.converted.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_skipped(&self, _input: &str) {
            self.skipped.fetch_add(1, Ordering::SeqCst);
        }
        fn on_file_failed(&self, _input: &str, _error: &str) {
            self.failed.fetch_add(1, Ordering::SeqCst);
        }
        fn on_run_complete(&self, summary: &RunSummary) {
            self.completed.store(summary.total, Ordering::SeqCst);
        }
    }

    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    touch_pdf(&input.path().join("a.pdf"));
    touch_pdf(&input.path().join("corrupt-b.pdf"));
    touch_pdf(&input.path().join("c.pdf"));

    let reporter = Arc::new(CountingReporter {
        started_with: AtomicUsize::new(0),
        converted: AtomicUsize::new(0),
        skipped: AtomicUsize::new(0),
        failed: AtomicUsize::new(0),
        completed: AtomicUsize::new(0),
    });

    let config = RunConfig::builder(input.path(), output.path())
        .reporter(Arc::clone(&reporter) as Arc<dyn ConversionReporter>)
        .build()
        .unwrap();

    let summary = run_with_renderer(&config, Arc::new(SelectiveRenderer))
        .await
        .expect("run");

    assert_eq!(reporter.started_with.load(Ordering::SeqCst), 3);
    assert_eq!(reporter.converted.load(Ordering::SeqCst), summary.converted);
    assert_eq!(reporter.skipped.load(Ordering::SeqCst), summary.skipped);
    assert_eq!(reporter.failed.load(Ordering::SeqCst), summary.failed);
    assert_eq!(reporter.completed.load(Ordering::SeqCst), summary.total);
}

// ── Sync wrapper ─────────────────────────────────────────────────────────────

#[test]
fn run_sync_works_outside_a_runtime() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();

    // No files; exercises the full path without needing a real PDF engine.
    let config = thumbnail_config(input.path(), output.path(), 2);
    let summary = run_sync(&config).expect("sync run");
    assert_eq!(summary.total, 0);
    assert!(output.path().is_dir());
}
