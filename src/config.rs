//! Configuration types for Markdown-to-PDF conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`],
//! built via its [`ConversionConfigBuilder`]. Keeping every knob in one
//! struct makes it trivial to share a config across conversions and to see
//! at a glance what the renderer will be asked to do.

use crate::error::Md2PdfError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Paper size passed to wkhtmltopdf via `--page-size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PageSize {
    /// 210 × 297 mm (default).
    #[default]
    A4,
    A5,
    /// US Letter, 8.5 × 11 in.
    Letter,
    /// US Legal, 8.5 × 14 in.
    Legal,
}

impl PageSize {
    /// The value wkhtmltopdf expects on the command line.
    pub fn as_arg(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::A5 => "A5",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
        }
    }
}

/// Configuration for a Markdown-to-PDF conversion.
///
/// Built via [`ConversionConfig::builder()`] or
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use md2pdf::{ConversionConfig, PageSize};
///
/// let config = ConversionConfig::builder()
///     .page_size(PageSize::Letter)
///     .margin_mm(15)
///     .title("Trip report")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Paper size for the rendered PDF. Default: [`PageSize::A4`].
    pub page_size: PageSize,

    /// Margin applied to all four page edges, in millimetres. Default: 20.
    ///
    /// 20 mm matches what most word processors call "normal" margins and
    /// keeps body text clear of printer dead zones.
    pub margin_mm: u32,

    /// Document title placed in the HTML `<title>` element.
    ///
    /// `None` derives the title from the input file's stem.
    pub title: Option<String>,

    /// Pass `--quiet` to wkhtmltopdf. Default: true.
    ///
    /// The renderer's progress chatter goes to stderr and interleaves
    /// badly with any shell's own progress display; failures are still
    /// captured because stderr is collected either way.
    pub quiet_renderer: bool,

    /// Directory for the staged HTML file. `None` uses the OS temp dir.
    ///
    /// Mainly for tests, which point this at a scratch directory and then
    /// assert it is empty once the conversion is over.
    pub staging_dir: Option<PathBuf>,

    /// Observer invoked synchronously at each state transition.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("page_size", &self.page_size)
            .field("margin_mm", &self.margin_mm)
            .field("title", &self.title)
            .field("quiet_renderer", &self.quiet_renderer)
            .field("staging_dir", &self.staging_dir)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            margin_mm: 20,
            title: None,
            quiet_renderer: true,
            staging_dir: None,
            progress_callback: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder seeded with the defaults.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn page_size(mut self, size: PageSize) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn margin_mm(mut self, mm: u32) -> Self {
        self.config.margin_mm = mm;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.config.title = Some(title.into());
        self
    }

    pub fn quiet_renderer(mut self, quiet: bool) -> Self {
        self.config.quiet_renderer = quiet;
        self
    }

    pub fn staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.staging_dir = Some(dir.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Md2PdfError> {
        // An A4 page is 210 mm wide; two 105 mm margins leave no content
        // area at all and wkhtmltopdf fails with an opaque layout error.
        if self.config.margin_mm > 100 {
            return Err(Md2PdfError::InvalidConfig(format!(
                "margin must be 0–100 mm, got {}",
                self.config.margin_mm
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_renderer_contract() {
        let config = ConversionConfig::builder().build().unwrap();
        assert_eq!(config.page_size, PageSize::A4);
        assert_eq!(config.margin_mm, 20);
        assert!(config.quiet_renderer);
        assert!(config.title.is_none());
        assert!(config.staging_dir.is_none());
    }

    #[test]
    fn oversized_margin_is_rejected() {
        let err = ConversionConfig::builder().margin_mm(150).build();
        assert!(matches!(err, Err(Md2PdfError::InvalidConfig(_))));
    }

    #[test]
    fn page_size_args_are_wkhtmltopdf_spellings() {
        assert_eq!(PageSize::A4.as_arg(), "A4");
        assert_eq!(PageSize::Letter.as_arg(), "Letter");
        assert_eq!(PageSize::Legal.as_arg(), "Legal");
        assert_eq!(PageSize::A5.as_arg(), "A5");
    }
}
