//! # md2pdf
//!
//! Convert Markdown documents to styled PDFs by rendering them to HTML and
//! handing the result to the external [wkhtmltopdf](https://wkhtmltopdf.org/)
//! binary.
//!
//! ## Why this crate?
//!
//! Markdown-to-PDF sounds like a library call, but the reliable path in
//! practice is a small pipeline with several failure points: an external
//! binary that may not be installed, an input file in an unknown encoding,
//! a temporary HTML file that must never be left behind, and an external
//! process whose exit code alone cannot be trusted. This crate packages
//! that pipeline with typed errors, progress reporting and cooperative
//! cancellation, so a shell (CLI, GUI, test harness) only has to drive a
//! narrow interface.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Markdown
//!  │
//!  ├─ 1. Check    wkhtmltopdf located? (env override, known paths, PATH)
//!  ├─ 2. Read     load input; UTF-8, falling back to Windows-1252
//!  ├─ 3. Render   pulldown-cmark → HTML fragment → styled document
//!  ├─ 4. Stage    write a uniquely named temp .html (removed on all paths)
//!  ├─ 5. Invoke   wkhtmltopdf --quiet --page-size … --margin-* … in out
//!  └─ 6. Verify   output exists and is non-empty
//! ```
//!
//! Cancellation is cooperative: the shell sets a [`CancelFlag`] and the
//! pipeline honours it at the next stage boundary. A running wkhtmltopdf
//! process is never killed; the wait simply completes first.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2pdf::{CancelFlag, ConversionConfig, ConversionRequest, Converter};
//!
//! fn main() -> Result<(), md2pdf::Md2PdfError> {
//!     let converter = Converter::new(ConversionConfig::default());
//!     let request = ConversionRequest::with_default_output("notes.md");
//!     let receipt = converter.convert(&request, &CancelFlag::new())?;
//!     println!("wrote {} ({} bytes)", receipt.output_path.display(), receipt.output_bytes);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2pdf` binary (clap + indicatif + ctrlc) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! md2pdf = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cancel;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cancel::CancelFlag;
pub use config::{ConversionConfig, ConversionConfigBuilder, PageSize};
pub use convert::{convert_file, Converter};
pub use error::Md2PdfError;
pub use output::{ConversionReceipt, SourceEncoding};
pub use progress::{
    ConversionProgressCallback, ConversionState, NoopProgressCallback, ProgressCallback, StateCell,
};
pub use request::{default_output_path, ConversionRequest};
pub use wkhtml_locate::{Discovery, RendererBinary};
