//! Error types for the md2pdf library.
//!
//! One enum covers the whole pipeline. Every variant a caller can
//! meaningfully react to is explicit ([`Md2PdfError::MissingDependency`],
//! [`Md2PdfError::Cancelled`], …); anything unexpected — staging I/O,
//! directory creation — is wrapped in the catch-all
//! [`Md2PdfError::ConversionFailed`] with a human-readable message.
//!
//! Messages are written to be shown to end-users verbatim: the
//! missing-renderer variant carries the download URL, and renderer failures
//! carry the captured stderr.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the md2pdf library.
#[derive(Debug, Error)]
pub enum Md2PdfError {
    /// No wkhtmltopdf executable could be located on this system.
    #[error(
        "wkhtmltopdf was not found on this system.\n\
         Install it from https://wkhtmltopdf.org/downloads.html, or set \
         WKHTMLTOPDF_PATH to an existing binary."
    )]
    MissingDependency,

    /// The input file could not be read at all (missing, permission, …).
    ///
    /// A file with a non-UTF-8 encoding is *not* an error: the read stage
    /// falls back to a permissive single-byte decoding.
    #[error("cannot read input file '{path}': {source}")]
    UnreadableInput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The external renderer failed to launch or exited unsuccessfully.
    #[error("wkhtmltopdf failed: {detail}")]
    RenderFailure { detail: String },

    /// The renderer reported success but the output file is missing or empty.
    #[error("wkhtmltopdf reported success but '{path}' is missing or empty")]
    OutputNotProduced { path: PathBuf },

    /// The conversion was cancelled before the external render step began.
    #[error("conversion cancelled")]
    Cancelled,

    /// Builder validation failed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unexpected failure outside the taxonomy above.
    #[error("conversion failed: {0}")]
    ConversionFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_dependency_points_at_download_page() {
        let msg = Md2PdfError::MissingDependency.to_string();
        assert!(msg.contains(wkhtml_locate::DOWNLOAD_URL), "got: {msg}");
        assert!(msg.contains(wkhtml_locate::ENV_OVERRIDE), "got: {msg}");
    }

    #[test]
    fn unreadable_input_names_the_path() {
        let e = Md2PdfError::UnreadableInput {
            path: PathBuf::from("/tmp/notes.md"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/tmp/notes.md"), "got: {msg}");
    }

    #[test]
    fn render_failure_carries_stderr_detail() {
        let e = Md2PdfError::RenderFailure {
            detail: "exit status 1: ContentNotFoundError".into(),
        };
        assert!(e.to_string().contains("ContentNotFoundError"));
    }

    #[test]
    fn output_not_produced_names_the_path() {
        let e = Md2PdfError::OutputNotProduced {
            path: PathBuf::from("/tmp/out.pdf"),
        };
        assert!(e.to_string().contains("/tmp/out.pdf"));
    }
}
