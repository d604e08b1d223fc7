// ==============================================================================
// parsers/mod.rs - File parser modules
// ==============================================================================
// Description: Read/variant analyzers plus shared input decoding
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

pub mod fastq;
pub mod vcf;

pub use fastq::{ReadAnalysis, ReadAnalyzer, ReadParseError};
pub use vcf::{VariantAnalysis, VariantAnalyzer, VariantParseError, VcfHeaderInfo};

use flate2::read::MultiGzDecoder;
use serde::{Deserialize, Serialize};
use std::io::Read;
use thiserror::Error;
use tracing::debug;

use crate::validator::is_gzipped;

/// Failures turning the caller's buffer into text
#[derive(Error, Debug)]
pub enum InputDecodeError {
    #[error("Gzip decompression failed: {0}")]
    Decompress(#[source] std::io::Error),

    #[error("File is not valid UTF-8 text: {0}")]
    InvalidText(#[from] std::string::FromUtf8Error),
}

/// Decompress (when the name ends in `.gz`) and decode a file buffer
pub fn decode_input(bytes: &[u8], filename: &str) -> Result<String, InputDecodeError> {
    let raw = if is_gzipped(filename) {
        let mut decoder = MultiGzDecoder::new(bytes);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(InputDecodeError::Decompress)?;
        debug!(
            "Decompressed {}: {} -> {} bytes",
            filename,
            bytes.len(),
            decompressed.len()
        );
        decompressed
    } else {
        bytes.to_vec()
    };

    Ok(String::from_utf8(raw)?)
}

/// Serialized form of a quality summary
///
/// A measured summary is written as its own fields with no marker; a file
/// with no quality values at all becomes `{"status": "no_quality_data"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QualityRepr<T> {
    Measured(T),
    Missing { status: MissingQuality },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingQuality {
    NoQualityData,
}

/// Counter for records dropped during a lenient parse
///
/// Every skip is counted; only the first `limit` messages are kept.
#[derive(Debug, Clone, Default)]
pub struct SkipLog {
    skipped: usize,
    diagnostics: Vec<String>,
    limit: usize,
}

impl SkipLog {
    pub fn new(limit: usize) -> Self {
        Self {
            skipped: 0,
            diagnostics: Vec::new(),
            limit,
        }
    }

    /// Record a skipped record at a 1-based line number
    pub fn record(&mut self, line: usize, reason: impl AsRef<str>) {
        self.skipped += 1;
        debug!("Skipping record at line {}: {}", line, reason.as_ref());
        if self.diagnostics.len() < self.limit {
            self.diagnostics
                .push(format!("line {}: {}", line, reason.as_ref()));
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (usize, Vec<String>) {
        (self.skipped, self.diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    #[test]
    fn test_plain_text_passthrough() {
        let text = decode_input(b"@r1\nACGT\n+\nIIII\n", "reads.fastq").unwrap();
        assert!(text.starts_with("@r1"));
    }

    #[test]
    fn test_gzip_by_suffix() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"##fileformat=VCFv4.2\n").unwrap();
        let compressed = encoder.finish().unwrap();

        let text = decode_input(&compressed, "calls.VCF.GZ").unwrap();
        assert_eq!(text, "##fileformat=VCFv4.2\n");
    }

    #[test]
    fn test_high_ratio_gzip() {
        let body = "A".repeat(1 << 20);
        let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
        encoder.write_all(body.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();
        assert!(compressed.len() * 100 < body.len());

        let text = decode_input(&compressed, "reads.fa.gz").unwrap();
        assert_eq!(text.len(), body.len());
    }

    #[test]
    fn test_corrupt_gzip() {
        let err = decode_input(b"not gzip at all", "calls.vcf.gz").unwrap_err();
        assert!(matches!(err, InputDecodeError::Decompress(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode_input(&[0xff, 0xfe, 0x00], "reads.fq").unwrap_err();
        assert!(matches!(err, InputDecodeError::InvalidText(_)));
    }

    #[test]
    fn test_skip_log_bounds_messages() {
        let mut log = SkipLog::new(2);
        log.record(1, "too few columns");
        log.record(5, "bad position");
        log.record(9, "bad position");

        assert_eq!(log.skipped(), 3);
        assert_eq!(log.diagnostics().len(), 2);
        assert_eq!(log.diagnostics()[0], "line 1: too few columns");
    }
}
