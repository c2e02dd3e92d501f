//! Conversion states, the observable state cell, and the progress callback.
//!
//! The pipeline walks a fixed sequence of states, each with a progress
//! percentage and a user-facing label. Two mechanisms expose them:
//!
//! * A [`ConversionProgressCallback`] configured on
//!   [`crate::config::ConversionConfig`], invoked synchronously at every
//!   state transition. Callers can forward the events to a progress bar, a
//!   channel, or a status label — the library doesn't care how the host
//!   application displays them.
//! * A [`StateCell`], a shared atomic the pipeline writes and any thread
//!   may poll. This is the read-only view a UI keeps while the worker
//!   thread runs.
//!
//! Within one conversion the callback fires in strictly increasing
//! percentage order; only one conversion runs at a time, so events never
//! interleave.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Where a conversion currently stands.
///
/// The pipeline is the only writer; everything else observes. Terminal
/// outcomes ([`Completed`](Self::Completed), [`Cancelled`](Self::Cancelled),
/// [`Failed`](Self::Failed)) are also carried by the `Result` of
/// [`crate::convert::Converter::convert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionState {
    /// No conversion has run yet.
    Idle,
    /// Verifying that a wkhtmltopdf binary was located.
    CheckingDependencies,
    /// Loading and decoding the Markdown input.
    Reading,
    /// Rendering Markdown to the styled HTML document.
    Rendering,
    /// Writing the HTML document to a temporary staging file.
    Staging,
    /// Waiting on the external wkhtmltopdf process.
    Invoking,
    /// The output PDF exists and is non-empty.
    Completed,
    /// The cancellation flag was observed at a stage boundary.
    Cancelled,
    /// The pipeline returned an error.
    Failed,
}

impl ConversionState {
    /// Progress percentage shown for this state.
    ///
    /// Terminal failure states report 0 so a UI naturally resets its bar.
    pub fn progress_percent(&self) -> u8 {
        match self {
            ConversionState::Idle => 0,
            ConversionState::CheckingDependencies => 10,
            ConversionState::Reading => 20,
            ConversionState::Rendering => 40,
            ConversionState::Staging => 60,
            ConversionState::Invoking => 80,
            ConversionState::Completed => 100,
            ConversionState::Cancelled | ConversionState::Failed => 0,
        }
    }

    /// Short status label for this state.
    pub fn label(&self) -> &'static str {
        match self {
            ConversionState::Idle => "Ready",
            ConversionState::CheckingDependencies => "Checking for wkhtmltopdf",
            ConversionState::Reading => "Reading Markdown file",
            ConversionState::Rendering => "Converting Markdown to HTML",
            ConversionState::Staging => "Writing staged HTML",
            ConversionState::Invoking => "Converting HTML to PDF",
            ConversionState::Completed => "Conversion complete",
            ConversionState::Cancelled => "Conversion cancelled",
            ConversionState::Failed => "Conversion failed",
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            ConversionState::Idle => 0,
            ConversionState::CheckingDependencies => 1,
            ConversionState::Reading => 2,
            ConversionState::Rendering => 3,
            ConversionState::Staging => 4,
            ConversionState::Invoking => 5,
            ConversionState::Completed => 6,
            ConversionState::Cancelled => 7,
            ConversionState::Failed => 8,
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ConversionState::CheckingDependencies,
            2 => ConversionState::Reading,
            3 => ConversionState::Rendering,
            4 => ConversionState::Staging,
            5 => ConversionState::Invoking,
            6 => ConversionState::Completed,
            7 => ConversionState::Cancelled,
            8 => ConversionState::Failed,
            _ => ConversionState::Idle,
        }
    }
}

impl std::fmt::Display for ConversionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Shared, lock-free view of the pipeline's current [`ConversionState`].
///
/// Cloning is cheap and every clone observes the same underlying cell. The
/// pipeline is the single writer; observers only call [`get`](Self::get).
#[derive(Debug, Clone, Default)]
pub struct StateCell(Arc<AtomicU8>);

impl StateCell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state as last published by the pipeline.
    pub fn get(&self) -> ConversionState {
        ConversionState::from_u8(self.0.load(Ordering::SeqCst))
    }

    pub(crate) fn set(&self, state: ConversionState) {
        self.0.store(state.as_u8(), Ordering::SeqCst);
    }
}

/// Called by the pipeline at every state transition.
///
/// Implementations must be `Send + Sync`: the shell typically installs the
/// callback on the foreground thread and the pipeline invokes it from the
/// worker thread. The method has a default no-op body so simple callers can
/// implement only what they need.
pub trait ConversionProgressCallback: Send + Sync {
    /// A new state was entered. `state.progress_percent()` and
    /// `state.label()` carry everything a display needs.
    fn on_state(&self, state: ConversionState) {
        let _ = state;
    }
}

/// A no-op implementation for callers that don't track progress.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in
/// [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
