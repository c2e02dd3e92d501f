//! Result data returned from a successful conversion.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which decoding the read stage ended up using for the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceEncoding {
    /// The input was valid UTF-8.
    Utf8,
    /// UTF-8 validation failed; the permissive single-byte fallback was used.
    Windows1252,
}

/// Summary of a completed conversion.
///
/// Serialisable so shells can log it or emit it as JSON (`md2pdf --json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionReceipt {
    /// Where the PDF was written.
    pub output_path: PathBuf,
    /// Size of the produced PDF in bytes (always non-zero; a zero-byte
    /// output fails verification instead).
    pub output_bytes: u64,
    /// Wall-clock time for the whole pipeline.
    pub duration_ms: u64,
    /// How the Markdown input was decoded.
    pub source_encoding: SourceEncoding,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_round_trips_through_json() {
        let receipt = ConversionReceipt {
            output_path: PathBuf::from("/tmp/out.pdf"),
            output_bytes: 4096,
            duration_ms: 120,
            source_encoding: SourceEncoding::Windows1252,
        };

        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("windows1252") || json.contains("windows-1252"));

        let back: ConversionReceipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back.output_bytes, 4096);
        assert_eq!(back.source_encoding, SourceEncoding::Windows1252);
    }
}
