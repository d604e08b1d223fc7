// ==============================================================================
// validator.rs - Input Buffer Validation
// ==============================================================================
// Description: Filename-driven format detection and basic buffer checks
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// Security: Allowlist-only formats, gzip magic number verification
// ==============================================================================

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Validation failures detected before any parsing starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("File is empty")]
    EmptyInput,

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: usize, max: usize },

    #[error("Gzip decompression failed: {0} does not start with the gzip magic number")]
    MagicMismatch(String),
}

/// Analyzer family selected from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileFormat {
    /// `.fastq` / `.fq`
    #[serde(rename = "FASTQ")]
    Reads,
    /// `.vcf`
    #[serde(rename = "VCF")]
    Variants,
}

impl FileFormat {
    /// Detect the format from a filename, ignoring a trailing `.gz`
    pub fn detect(filename: &str) -> Result<Self, ValidationError> {
        let ext = file_extension(filename);
        match ext.as_str() {
            "fastq" | "fq" => Ok(FileFormat::Reads),
            "vcf" => Ok(FileFormat::Variants),
            _ => Err(ValidationError::UnsupportedFormat(ext)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileFormat::Reads => "FASTQ",
            FileFormat::Variants => "VCF",
        }
    }
}

/// True when the name carries a `.gz` suffix (case-insensitive)
pub fn is_gzipped(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".gz")
}

/// Lowercased extension with a trailing `.gz` stripped
///
/// `reads.fq.gz` -> `fq`, `calls.VCF` -> `vcf`, a bare `gz` -> `unknown`.
pub fn file_extension(filename: &str) -> String {
    let lower = filename.to_lowercase();
    let parts: Vec<&str> = lower.split('.').collect();

    match parts.as_slice() {
        [.., inner, "gz"] => inner.to_string(),
        ["gz"] => "unknown".to_string(),
        [.., last] => last.to_string(),
        [] => "unknown".to_string(),
    }
}

/// Checks a caller-supplied buffer before it is handed to an analyzer
pub struct FileValidator {
    max_input_bytes: usize,
}

impl FileValidator {
    pub fn new(max_input_bytes: usize) -> Self {
        Self { max_input_bytes }
    }

    /// Validate size, format and compression framing
    pub fn validate(&self, bytes: &[u8], filename: &str) -> Result<FileFormat, ValidationError> {
        if bytes.is_empty() {
            return Err(ValidationError::EmptyInput);
        }

        if bytes.len() > self.max_input_bytes {
            return Err(ValidationError::TooLarge {
                size: bytes.len(),
                max: self.max_input_bytes,
            });
        }
        debug!("Size check passed: {} bytes", bytes.len());

        let format = FileFormat::detect(filename)?;
        debug!("Format check passed: {}", format.as_str());

        if is_gzipped(filename) && !bytes.starts_with(&GZIP_MAGIC) {
            return Err(ValidationError::MagicMismatch(filename.to_string()));
        }

        Ok(format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_formats() {
        assert_eq!(FileFormat::detect("sample.fastq").unwrap(), FileFormat::Reads);
        assert_eq!(FileFormat::detect("sample.FQ.gz").unwrap(), FileFormat::Reads);
        assert_eq!(FileFormat::detect("calls.vcf").unwrap(), FileFormat::Variants);
        assert_eq!(FileFormat::detect("calls.vcf.gz").unwrap(), FileFormat::Variants);
    }

    #[test]
    fn test_unsupported_format() {
        assert_eq!(
            FileFormat::detect("genome.txt"),
            Err(ValidationError::UnsupportedFormat("txt".to_string()))
        );
        assert_eq!(
            FileFormat::detect("archive.gz"),
            Err(ValidationError::UnsupportedFormat("archive".to_string()))
        );
        assert!(FileFormat::detect("noextension").is_err());
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("a.b.vcf.gz"), "vcf");
        assert_eq!(file_extension("READS.FASTQ"), "fastq");
        assert_eq!(file_extension("gz"), "unknown");
    }

    #[test]
    fn test_validator_rejects_empty_and_large() {
        let validator = FileValidator::new(8);
        assert_eq!(validator.validate(b"", "a.vcf"), Err(ValidationError::EmptyInput));
        assert!(matches!(
            validator.validate(b"0123456789", "a.vcf"),
            Err(ValidationError::TooLarge { size: 10, max: 8 })
        ));
    }

    #[test]
    fn test_validator_gzip_magic() {
        let validator = FileValidator::new(1024);
        assert!(matches!(
            validator.validate(b"plain text", "a.vcf.gz"),
            Err(ValidationError::MagicMismatch(_))
        ));
        assert_eq!(
            validator.validate(&[0x1f, 0x8b, 0x08, 0x00], "a.vcf.gz"),
            Ok(FileFormat::Variants)
        );
    }
}
