// ==============================================================================
// processor.rs - Genomic File Processing Orchestrator
// ==============================================================================
// Description: Validates input, dispatches to the read or variant analyzer,
//              attaches the QC verdict and metadata, and runs risk scoring
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::models::{ErrorResult, QualityAssessment, RiskScoreResult};
use crate::parsers::{
    ReadAnalysis, ReadAnalyzer, ReadParseError, VariantAnalysis, VariantAnalyzer, VariantParseError,
};
use crate::quality_control::QualityController;
use crate::risk::RiskScoreCalculator;
use crate::validator::{FileFormat, FileValidator, ValidationError};

/// Version tag stamped on every processed file
pub const PROCESSOR_VERSION: &str = concat!("genomic-analysis-core/", env!("CARGO_PKG_VERSION"));

/// Top-level processing errors
#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Reads(#[from] ReadParseError),

    #[error(transparent)]
    Variants(#[from] VariantParseError),

    #[error("PRS calculation requires VCF file with variant data")]
    NotVariantData,
}

impl From<&ProcessingError> for ErrorResult {
    fn from(err: &ProcessingError) -> Self {
        ErrorResult::new(err.to_string())
    }
}

impl From<ProcessingError> for ErrorResult {
    fn from(err: ProcessingError) -> Self {
        ErrorResult::from(&err)
    }
}

/// Analyzer output, tagged with `file_type` when serialized
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "file_type")]
pub enum AnalysisReport {
    #[serde(rename = "FASTQ")]
    Reads(ReadAnalysis),
    #[serde(rename = "VCF")]
    Variants(VariantAnalysis),
}

impl AnalysisReport {
    pub fn file_format(&self) -> FileFormat {
        match self {
            AnalysisReport::Reads(_) => FileFormat::Reads,
            AnalysisReport::Variants(_) => FileFormat::Variants,
        }
    }
}

/// Complete result for one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedFile {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub quality_assessment: QualityAssessment,
    pub filename: String,
    pub processing_timestamp: DateTime<Utc>,
    pub processor_version: String,
    pub analysis_id: Uuid,
}

impl ProcessedFile {
    /// Variant statistics, if this was a variant file
    pub fn variant_analysis(&self) -> Option<&VariantAnalysis> {
        match &self.report {
            AnalysisReport::Variants(analysis) => Some(analysis),
            AnalysisReport::Reads(_) => None,
        }
    }
}

/// Stateless orchestrator over the analyzers, QC and risk calculator
pub struct GenomicProcessor {
    validator: FileValidator,
    read_analyzer: ReadAnalyzer,
    variant_analyzer: VariantAnalyzer,
    quality: QualityController,
    risk: RiskScoreCalculator,
}

impl Default for GenomicProcessor {
    fn default() -> Self {
        Self::new(&AnalysisConfig::default())
    }
}

impl GenomicProcessor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            validator: FileValidator::new(config.max_input_bytes),
            read_analyzer: ReadAnalyzer::from_config(config),
            variant_analyzer: VariantAnalyzer::from_config(config),
            quality: QualityController::new(),
            risk: RiskScoreCalculator::new(config.population.clone()),
        }
    }

    /// Analyze one file held in memory
    ///
    /// # Arguments
    /// * `bytes` - Raw file contents, gzip-compressed when `filename` ends in `.gz`
    /// * `filename` - Drives compression detection and analyzer dispatch
    ///
    /// # Returns
    /// * `Ok(ProcessedFile)` - Analyzer statistics, QC verdict and metadata
    /// * `Err(ProcessingError)` - Rejected input, undecodable content or no records
    pub fn process_file(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<ProcessedFile, ProcessingError> {
        info!("Processing {} ({} bytes)", filename, bytes.len());

        let format = self.validator.validate(bytes, filename).map_err(|e| {
            warn!("Rejected {}: {}", filename, e);
            e
        })?;

        let (report, quality_assessment) = match format {
            FileFormat::Reads => {
                let analysis = self.read_analyzer.analyze(bytes, filename)?;
                let assessment = self.quality.assess_reads(&analysis);
                (AnalysisReport::Reads(analysis), assessment)
            }
            FileFormat::Variants => {
                let analysis = self.variant_analyzer.analyze(bytes, filename)?;
                let assessment = self.quality.assess_variants(&analysis);
                (AnalysisReport::Variants(analysis), assessment)
            }
        };

        info!(
            "Processed {} as {}: quality {}, pass_filters={}",
            filename,
            format.as_str(),
            quality_assessment.overall_quality.as_str(),
            quality_assessment.pass_filters
        );

        Ok(ProcessedFile {
            report,
            quality_assessment,
            filename: filename.to_string(),
            processing_timestamp: Utc::now(),
            processor_version: PROCESSOR_VERSION.to_string(),
            analysis_id: Uuid::new_v4(),
        })
    }

    /// Score a processed variant file for one disease
    ///
    /// Read files are rejected with `ProcessingError::NotVariantData`.
    pub fn calculate_risk_score(
        &self,
        processed: &ProcessedFile,
        disease_type: &str,
    ) -> Result<RiskScoreResult, ProcessingError> {
        let analysis = processed.variant_analysis().ok_or_else(|| {
            warn!(
                "Risk score requested for non-variant file {}",
                processed.filename
            );
            ProcessingError::NotVariantData
        })?;

        Ok(self.risk.calculate(analysis.scoring_variants(), disease_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QualityVerdict, ScoringMethod};
    use std::io::Write;

    const APOE_VCF: &str = "##fileformat=VCFv4.2\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE1\n\
        19\t45411941\trs429358\tT\tC\t99\tPASS\tAF=0.4\tGT\t1/1\n\
        1\t1000\t.\tA\tAT\t50\tPASS\t.\tGT\t0/1\n";

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_fastq_scenario() {
        let data = "@r1\nACGTACGTAA\n+\nDDDDDDDDDD\n\
                    @r2\nGGGGCCCCAA\n+\nDDDDDDDDDD\n\
                    @r3\nTTTTAAAACC\n+\nDDDDDDDDDD\n";
        let processed = GenomicProcessor::default()
            .process_file(data.as_bytes(), "reads.fastq")
            .unwrap();

        let AnalysisReport::Reads(analysis) = &processed.report else {
            panic!("expected read analysis");
        };
        assert_eq!(analysis.quality_metrics.mean_quality(), Some(35.0));
        assert_eq!(analysis.duplication_metrics.duplication_rate_percent, 0.0);
        assert_eq!(processed.quality_assessment.overall_quality, QualityVerdict::Excellent);
        assert_eq!(processed.filename, "reads.fastq");
        assert_eq!(processed.processor_version, PROCESSOR_VERSION);
        assert!(processed.variant_analysis().is_none());
    }

    #[test]
    fn test_serialized_shape() {
        let processed = GenomicProcessor::default()
            .process_file(APOE_VCF.as_bytes(), "sample.vcf")
            .unwrap();
        let value = serde_json::to_value(&processed).unwrap();

        assert_eq!(value["file_type"], "VCF");
        assert_eq!(value["total_variants"], 2);
        assert_eq!(value["quality_assessment"]["pass_filters"], true);
        assert_eq!(value["filename"], "sample.vcf");
        assert!(value["processing_timestamp"].is_string());
        assert!(value["analysis_id"].is_string());
        assert!(value.get("variants").is_none());
    }

    #[test]
    fn test_gzipped_vcf() {
        let processed = GenomicProcessor::default()
            .process_file(&gzip(APOE_VCF.as_bytes()), "sample.vcf.gz")
            .unwrap();

        assert_eq!(processed.report.file_format(), FileFormat::Variants);
        assert_eq!(processed.variant_analysis().unwrap().parsed_variants, 2);
    }

    #[test]
    fn test_apoe_risk_score() {
        let processor = GenomicProcessor::default();
        let processed = processor.process_file(APOE_VCF.as_bytes(), "apoe.vcf").unwrap();
        let result = processor.calculate_risk_score(&processed, "alzheimer").unwrap();

        assert_eq!(result.method, ScoringMethod::SnpBased);
        assert_eq!(result.variants_used, 1);
        assert!((result.confidence - 0.25).abs() < 1e-12);
        assert!((result.contributing_variants[0].contribution - 2.24).abs() < 1e-12);
    }

    #[test]
    fn test_risk_without_matches_uses_population() {
        let processor = GenomicProcessor::default();
        let processed = processor.process_file(APOE_VCF.as_bytes(), "apoe.vcf").unwrap();
        let result = processor.calculate_risk_score(&processed, "diabetes").unwrap();

        assert_eq!(result.method, ScoringMethod::PopulationBased);
        assert_eq!(result.variant_burden.unwrap().indel_count, 1);
    }

    #[test]
    fn test_risk_rejects_read_files() {
        let processor = GenomicProcessor::default();
        let processed = processor
            .process_file(b"@r1\nACGT\n+\nIIII\n", "reads.fq")
            .unwrap();

        let err = processor.calculate_risk_score(&processed, "alzheimer").unwrap_err();
        assert!(matches!(err, ProcessingError::NotVariantData));
        assert_eq!(
            ErrorResult::from(&err).message,
            "PRS calculation requires VCF file with variant data"
        );
    }

    #[test]
    fn test_unsupported_format() {
        let err = GenomicProcessor::default()
            .process_file(b"hello", "notes.txt")
            .unwrap_err();

        let result = ErrorResult::from(err);
        assert_eq!(result.status, "error");
        assert_eq!(result.message, "Unsupported file format: txt");
    }

    #[test]
    fn test_structural_errors() {
        let processor = GenomicProcessor::default();

        assert!(matches!(
            processor.process_file(b"", "empty.vcf"),
            Err(ProcessingError::Validation(ValidationError::EmptyInput))
        ));
        assert!(matches!(
            processor.process_file(b"##fileformat=VCFv4.2\n", "header_only.vcf"),
            Err(ProcessingError::Variants(VariantParseError::NoVariants))
        ));
        assert!(matches!(
            processor.process_file(b"plain text", "fake.vcf.gz"),
            Err(ProcessingError::Validation(ValidationError::MagicMismatch(_)))
        ));
        assert!(matches!(
            processor.process_file(b"not a read\n", "junk.fastq"),
            Err(ProcessingError::Reads(ReadParseError::NoRecords { .. }))
        ));
    }

    #[test]
    fn test_input_size_limit() {
        let config = AnalysisConfig {
            max_input_bytes: 8,
            ..AnalysisConfig::default()
        };
        let err = GenomicProcessor::new(&config)
            .process_file(APOE_VCF.as_bytes(), "big.vcf")
            .unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::Validation(ValidationError::TooLarge { max: 8, .. })
        ));
    }
}
