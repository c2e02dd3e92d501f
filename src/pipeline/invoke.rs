//! External renderer invocation and output verification.
//!
//! The process contract with wkhtmltopdf is narrow: fixed options, staged
//! HTML path, output PDF path, then block until it exits. Exit code 0 plus
//! a non-empty output file is success; everything else is a failure with
//! whatever stderr the renderer produced. The wait is intentionally
//! uninterruptible — cancellation is only observed at stage boundaries, so
//! a cancel request during this stage takes effect after the process ends.

use std::fs;
use std::path::Path;
use std::process::Command;

use tracing::{debug, info};
use wkhtml_locate::RendererBinary;

use crate::config::ConversionConfig;
use crate::error::Md2PdfError;

/// Run wkhtmltopdf over the staged HTML, producing `output`.
///
/// Creates the output's parent directories first so the renderer never
/// fails on a missing destination folder.
pub fn render_pdf(
    renderer: &RendererBinary,
    staged: &Path,
    output: &Path,
    config: &ConversionConfig,
) -> Result<(), Md2PdfError> {
    ensure_output_dir(output)?;

    let mut cmd = Command::new(renderer.program());
    if config.quiet_renderer {
        cmd.arg("--quiet");
    }
    cmd.arg("--page-size").arg(config.page_size.as_arg());

    let margin = format!("{}mm", config.margin_mm);
    for flag in [
        "--margin-top",
        "--margin-right",
        "--margin-bottom",
        "--margin-left",
    ] {
        cmd.arg(flag).arg(&margin);
    }

    cmd.arg("--encoding").arg("UTF-8");
    cmd.arg(staged).arg(output);

    debug!("invoking renderer: {:?}", cmd);

    let result = cmd.output().map_err(|e| Md2PdfError::RenderFailure {
        detail: format!("failed to launch '{}': {e}", renderer.path().display()),
    })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(Md2PdfError::RenderFailure {
            detail: format!("{}: {}", result.status, stderr.trim()),
        });
    }

    info!("renderer finished for {}", output.display());
    Ok(())
}

/// Confirm the renderer actually produced a non-empty file.
///
/// wkhtmltopdf has failure modes where it exits 0 with nothing (or an
/// empty file) written, so exit status alone is not trusted.
pub fn verify_output(output: &Path) -> Result<u64, Md2PdfError> {
    match fs::metadata(output) {
        Ok(meta) if meta.len() > 0 => Ok(meta.len()),
        _ => Err(Md2PdfError::OutputNotProduced {
            path: output.to_path_buf(),
        }),
    }
}

fn ensure_output_dir(output: &Path) -> Result<(), Md2PdfError> {
    match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| {
                Md2PdfError::ConversionFailed(format!(
                    "could not create output directory '{}': {e}",
                    parent.display()
                ))
            })
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn verify_rejects_a_missing_output() {
        let dir = tempfile::tempdir().unwrap();
        let err = verify_output(&dir.path().join("out.pdf")).unwrap_err();
        assert!(matches!(err, Md2PdfError::OutputNotProduced { .. }));
    }

    #[test]
    fn verify_rejects_an_empty_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        fs::File::create(&path).unwrap();

        let err = verify_output(&path).unwrap_err();
        assert!(matches!(err, Md2PdfError::OutputNotProduced { .. }));
    }

    #[test]
    fn verify_reports_the_size_of_a_real_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        let mut f = fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.4 fake").unwrap();

        assert_eq!(verify_output(&path).unwrap(), 13);
    }

    #[test]
    fn output_parents_are_created_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b/c/out.pdf");

        ensure_output_dir(&nested).unwrap();
        assert!(nested.parent().unwrap().is_dir());
    }

    #[test]
    fn bare_relative_outputs_need_no_directory() {
        ensure_output_dir(Path::new("out.pdf")).unwrap();
    }

    #[test]
    fn launch_failure_is_a_render_failure() {
        let renderer = RendererBinary::at("/no/such/renderer-binary");
        let dir = tempfile::tempdir().unwrap();
        let staged = dir.path().join("in.html");
        fs::write(&staged, "<html></html>").unwrap();

        let err = render_pdf(
            &renderer,
            &staged,
            &dir.path().join("out.pdf"),
            &ConversionConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, Md2PdfError::RenderFailure { .. }));
    }
}
