//! The input/output path pair describing one conversion.

use std::path::{Path, PathBuf};

/// One user-initiated conversion: where to read Markdown from and where to
/// write the PDF.
///
/// Construction does no I/O — an unreadable input surfaces as
/// [`crate::error::Md2PdfError::UnreadableInput`] from the read stage, after
/// the dependency check has passed. The output's parent directories are
/// created by the pipeline just before the external renderer runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    input_path: PathBuf,
    output_path: PathBuf,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input.into(),
            output_path: output.into(),
        }
    }

    /// Build a request writing next to the input: `notes.md` → `notes.pdf`.
    pub fn with_default_output(input: impl Into<PathBuf>) -> Self {
        let input = input.into();
        let output = default_output_path(&input);
        Self {
            input_path: input,
            output_path: output,
        }
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Document title used when the config does not override it: the input
    /// file's stem, or `"document"` for pathological paths.
    pub(crate) fn derived_title(&self) -> String {
        self.input_path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".to_string())
    }
}

/// The input path with its extension swapped for `.pdf`.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_swaps_extension() {
        assert_eq!(
            default_output_path(Path::new("/docs/notes.md")),
            PathBuf::from("/docs/notes.pdf")
        );
        assert_eq!(
            default_output_path(Path::new("README")),
            PathBuf::from("README.pdf")
        );
    }

    #[test]
    fn with_default_output_matches_helper() {
        let req = ConversionRequest::with_default_output("guide.markdown");
        assert_eq!(req.input_path(), Path::new("guide.markdown"));
        assert_eq!(req.output_path(), Path::new("guide.pdf"));
    }

    #[test]
    fn title_comes_from_file_stem() {
        let req = ConversionRequest::new("/home/u/trip report.md", "/tmp/out.pdf");
        assert_eq!(req.derived_title(), "trip report");
    }

    #[test]
    fn title_falls_back_for_stemless_paths() {
        let req = ConversionRequest::new("..", "/tmp/out.pdf");
        assert_eq!(req.derived_title(), "document");
    }
}
