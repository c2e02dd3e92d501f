//! Staging: write the HTML document to a uniquely named temporary file.
//!
//! ## Why a guard type?
//!
//! wkhtmltopdf reads its input from a filesystem path, so the HTML has to
//! touch disk between rendering and invocation. That file must disappear on
//! *every* exit path — success, error, cancellation, panic — which is
//! exactly what RAII gives us: [`StagedHtml`] owns a
//! [`tempfile::NamedTempFile`] and removes it on drop. The one refinement
//! over the plain `NamedTempFile` drop is logging: a failed removal is
//! worth a `warn` line, but never worth failing a conversion that already
//! produced its PDF.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::Md2PdfError;

/// The staged HTML document, alive exactly as long as the renderer needs it.
#[derive(Debug)]
pub struct StagedHtml {
    // Option so Drop can take ownership and close with error reporting.
    file: Option<NamedTempFile>,
}

impl StagedHtml {
    /// Path handed to the external renderer.
    pub fn path(&self) -> &Path {
        self.file
            .as_ref()
            .map(NamedTempFile::path)
            // The Option is only vacated inside Drop.
            .unwrap_or_else(|| Path::new(""))
    }
}

impl Drop for StagedHtml {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            let path = file.path().to_path_buf();
            match file.close() {
                Ok(()) => debug!("removed staged HTML at {}", path.display()),
                Err(e) => warn!(
                    "failed to remove staged HTML at {}: {}",
                    path.display(),
                    e
                ),
            }
        }
    }
}

/// Write `html` to a fresh `md2pdf-*.html` file in `dir` (or the OS temp
/// directory) and return the owning guard.
pub fn stage_html(html: &str, dir: Option<&Path>) -> Result<StagedHtml, Md2PdfError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("md2pdf-").suffix(".html");

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(|e| Md2PdfError::ConversionFailed(format!("could not create staging file: {e}")))?;

    file.write_all(html.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| {
            Md2PdfError::ConversionFailed(format!(
                "could not write staged HTML to {}: {e}",
                file.path().display()
            ))
        })?;

    debug!("staged HTML at {}", file.path().display());
    Ok(StagedHtml { file: Some(file) })
}
