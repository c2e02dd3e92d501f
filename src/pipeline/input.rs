//! Input loading: read the Markdown file and decode it to a `String`.
//!
//! ## Why a decoding fallback?
//!
//! Markdown files in the wild are occasionally saved in a legacy single-byte
//! encoding (Notepad on older Windows, exported notes, scraped snippets).
//! Refusing them outright would turn a cosmetic problem into a hard error,
//! so when UTF-8 validation fails we re-decode the same bytes as
//! Windows-1252 via `encoding_rs`. Every byte maps in that encoding, the
//! fallback cannot fail, and the worst case for a genuinely binary input is
//! mojibake in the PDF rather than a crash. The receipt records which
//! decoding was used.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::Md2PdfError;
use crate::output::SourceEncoding;

/// Decoded Markdown input.
#[derive(Debug, Clone)]
pub struct MarkdownSource {
    pub text: String,
    pub encoding: SourceEncoding,
}

/// Read and decode the input file.
///
/// Any I/O failure is [`Md2PdfError::UnreadableInput`]; a decoding problem
/// is never an error (see the module docs).
pub fn read_markdown(path: &Path) -> Result<MarkdownSource, Md2PdfError> {
    let bytes = fs::read(path).map_err(|source| Md2PdfError::UnreadableInput {
        path: path.to_path_buf(),
        source,
    })?;

    match String::from_utf8(bytes) {
        Ok(text) => Ok(MarkdownSource {
            text,
            encoding: SourceEncoding::Utf8,
        }),
        Err(invalid) => {
            debug!(
                "'{}' is not valid UTF-8; decoding as Windows-1252",
                path.display()
            );
            let bytes = invalid.into_bytes();
            let (text, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(MarkdownSource {
                text: text.into_owned(),
                encoding: SourceEncoding::Windows1252,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn utf8_input_reads_verbatim() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all("# Héllo\n".as_bytes()).unwrap();

        let source = read_markdown(file.path()).unwrap();
        assert_eq!(source.text, "# Héllo\n");
        assert_eq!(source.encoding, SourceEncoding::Utf8);
    }

    #[test]
    fn latin1_input_falls_back_without_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "café" with é as the single byte 0xE9, which is invalid UTF-8.
        file.write_all(b"caf\xe9 notes\n").unwrap();

        let source = read_markdown(file.path()).unwrap();
        assert_eq!(source.encoding, SourceEncoding::Windows1252);
        assert_eq!(source.text, "café notes\n");
    }

    #[test]
    fn missing_file_is_unreadable_input() {
        let err = read_markdown(Path::new("/no/such/file.md")).unwrap_err();
        assert!(matches!(err, Md2PdfError::UnreadableInput { .. }));
    }
}
