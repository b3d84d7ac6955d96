//! Pipeline stages for batch PDF-to-image conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. switch rendering backend) without touching the
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input_dir ──▶ scan ──▶ job (per file) ──▶ output_dir
//!              (enumerate)  │
//!                           ├─ skip if output exists
//!                           ├─ render page 0 (pdfium or external tool)
//!                           ├─ resize (thumbnail mode)
//!                           └─ encode + write (PNG/JPEG)
//! ```
//!
//! 1. [`scan`]   — enumerate `.pdf` files, flat or one level of
//!    subdirectories
//! 2. [`render`] — rasterise a single page behind the [`render::PageRenderer`]
//!    trait; runs in `spawn_blocking` because both backends block
//! 3. [`job`]    — the per-file conversion: existence check, render, resize,
//!    encode, write, with every failure folded into a `JobResult`

pub mod job;
pub mod render;
pub mod scan;
