//! Conversion orchestration: sequencing, progress, cancellation, cleanup.
//!
//! [`Converter`] owns the outcome of renderer discovery and walks one
//! request through the fixed stage order:
//!
//! ```text
//! check renderer ─▶ read ─▶ render HTML ─▶ stage ─▶ invoke ─▶ verify
//!      10%           20%        40%          60%       80%      100%
//! ```
//!
//! The cancellation flag is polled before the read, render and stage steps
//! and once more after staging; once the external process is running the
//! pipeline waits for it regardless. The staged HTML's removal is tied to
//! a guard dropped on every path out of this function, so neither success,
//! error, cancellation nor panic leaves it behind.

use std::time::Instant;

use tracing::{debug, info};
use wkhtml_locate::RendererBinary;

use crate::cancel::CancelFlag;
use crate::config::ConversionConfig;
use crate::error::Md2PdfError;
use crate::output::ConversionReceipt;
use crate::pipeline::{input, invoke, render, stage};
use crate::progress::{ConversionState, StateCell};
use crate::request::ConversionRequest;

/// Runs conversions against a once-discovered renderer binary.
///
/// Create one `Converter` at startup and reuse it; discovery (a handful of
/// filesystem probes plus possibly a `which` subprocess) happens only in
/// [`Converter::new`]. Shells are expected to run at most one conversion
/// at a time — the observable [`StateCell`] describes "the" current
/// conversion and makes no attempt to multiplex.
pub struct Converter {
    config: ConversionConfig,
    renderer: Option<RendererBinary>,
    state: StateCell,
}

impl Converter {
    /// Discover the renderer and build a converter around the result.
    ///
    /// A missing renderer is not an error here: construction always
    /// succeeds, [`renderer`](Self::renderer) reports what was found, and a
    /// later [`convert`](Self::convert) fails fast with
    /// [`Md2PdfError::MissingDependency`]. That split lets a shell start
    /// up, warn the user, and keep running in degraded mode.
    pub fn new(config: ConversionConfig) -> Self {
        let renderer = wkhtml_locate::locate();
        match &renderer {
            Some(r) => info!("using wkhtmltopdf at {}", r.path().display()),
            None => info!("wkhtmltopdf not found; conversions will fail fast"),
        }
        Self::with_renderer(config, renderer)
    }

    /// Build a converter with an explicit discovery outcome.
    ///
    /// For shells that run discovery themselves, and for tests injecting a
    /// fake renderer (or its absence).
    pub fn with_renderer(config: ConversionConfig, renderer: Option<RendererBinary>) -> Self {
        Self {
            config,
            renderer,
            state: StateCell::new(),
        }
    }

    /// The discovered renderer, if any.
    pub fn renderer(&self) -> Option<&RendererBinary> {
        self.renderer.as_ref()
    }

    /// Observable state handle for the current/last conversion.
    pub fn state(&self) -> StateCell {
        self.state.clone()
    }

    /// Convert one Markdown file to PDF.
    ///
    /// Progress callbacks fire synchronously, in strictly increasing
    /// percentage order, on the calling thread. On any outcome the staged
    /// temp file is gone by the time this returns.
    pub fn convert(
        &self,
        request: &ConversionRequest,
        cancel: &CancelFlag,
    ) -> Result<ConversionReceipt, Md2PdfError> {
        let result = self.run_pipeline(request, cancel);
        match &result {
            Ok(_) => {} // Completed was published by the final stage.
            Err(Md2PdfError::Cancelled) => self.state.set(ConversionState::Cancelled),
            Err(_) => self.state.set(ConversionState::Failed),
        }
        result
    }

    fn run_pipeline(
        &self,
        request: &ConversionRequest,
        cancel: &CancelFlag,
    ) -> Result<ConversionReceipt, Md2PdfError> {
        let started = Instant::now();
        info!(
            "converting {} -> {}",
            request.input_path().display(),
            request.output_path().display()
        );

        self.advance(ConversionState::CheckingDependencies);
        let renderer = self.renderer.as_ref().ok_or(Md2PdfError::MissingDependency)?;

        cancel.checkpoint()?;
        self.advance(ConversionState::Reading);
        let source = input::read_markdown(request.input_path())?;

        cancel.checkpoint()?;
        self.advance(ConversionState::Rendering);
        let title = self
            .config
            .title
            .clone()
            .unwrap_or_else(|| request.derived_title());
        let html = render::render_document(&source.text, &title);

        cancel.checkpoint()?;
        self.advance(ConversionState::Staging);
        let staged = stage::stage_html(&html, self.config.staging_dir.as_deref())?;
        // A cancel that raced the staging write still removes the file:
        // `staged` drops on this early return.
        cancel.checkpoint()?;

        self.advance(ConversionState::Invoking);
        invoke::render_pdf(renderer, staged.path(), request.output_path(), &self.config)?;

        let output_bytes = invoke::verify_output(request.output_path())?;
        self.advance(ConversionState::Completed);

        let receipt = ConversionReceipt {
            output_path: request.output_path().to_path_buf(),
            output_bytes,
            duration_ms: started.elapsed().as_millis() as u64,
            source_encoding: source.encoding,
        };
        info!(
            "wrote {} ({} bytes) in {}ms",
            receipt.output_path.display(),
            receipt.output_bytes,
            receipt.duration_ms
        );
        Ok(receipt)
    }

    /// Publish a state and notify the progress callback.
    fn advance(&self, state: ConversionState) {
        debug!(
            "state -> {:?} ({}%)",
            state,
            state.progress_percent()
        );
        self.state.set(state);
        if let Some(cb) = &self.config.progress_callback {
            cb.on_state(state);
        }
    }
}

/// One-shot convenience: default configuration, no cancellation.
///
/// Discovers the renderer, converts `input` to `output`, returns the
/// receipt.
pub fn convert_file(
    input: impl Into<std::path::PathBuf>,
    output: impl Into<std::path::PathBuf>,
) -> Result<ConversionReceipt, Md2PdfError> {
    let converter = Converter::new(ConversionConfig::default());
    converter.convert(
        &ConversionRequest::new(input, output),
        &CancelFlag::new(),
    )
}
