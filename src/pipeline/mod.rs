//! Pipeline stages for Markdown-to-PDF conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets the
//! orchestrator in [`crate::convert`] own the sequencing, progress
//! reporting and cancellation checks.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ stage ──▶ invoke
//! (read +   (markdown  (temp     (wkhtmltopdf
//!  decode)   → HTML)    .html)    → verified .pdf)
//! ```
//!
//! 1. [`input`]  — load the Markdown file, UTF-8 with a permissive
//!    single-byte fallback
//! 2. [`render`] — produce the complete styled HTML document
//! 3. [`stage`]  — write it to a uniquely named temp file whose removal is
//!    guaranteed on every exit path
//! 4. [`invoke`] — run the external renderer and verify the PDF it claims
//!    to have produced

pub mod input;
pub mod invoke;
pub mod render;
pub mod stage;
