//! Cooperative cancellation for in-flight conversions.
//!
//! A [`CancelFlag`] is a cloneable handle over one shared boolean. The
//! shell sets it (Ctrl-C handler, cancel button); the pipeline polls it at
//! stage boundaries and unwinds with [`crate::error::Md2PdfError::Cancelled`]
//! at the next check. This is cooperative, not preemptive: once the
//! external renderer has been spawned the pipeline waits for it to finish
//! regardless of the flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Md2PdfError;

/// Shared cancellation flag, polled by the pipeline between stages.
///
/// Clones observe and control the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect at the pipeline's next checkpoint.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Checkpoint helper: `Err(Cancelled)` once the flag is set.
    pub(crate) fn checkpoint(&self) -> Result<(), Md2PdfError> {
        if self.is_cancelled() {
            Err(Md2PdfError::Cancelled)
        } else {
            Ok(())
        }
    }
}
