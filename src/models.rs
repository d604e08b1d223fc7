// ==============================================================================
// models.rs - Genomic Analysis Data Models
// ==============================================================================
// Description: Typed records for reads, variants, QC verdicts and risk scores
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single sequencing read as parsed from a FASTQ/FASTA record
#[derive(Debug, Clone, PartialEq)]
pub struct SequencingRead {
    /// Read identifier (header text up to the first whitespace)
    pub id: String,

    /// Nucleotide sequence as it appeared in the file
    pub sequence: String,

    /// Phred scores, one per base; None for quality-less records
    pub quality: Option<Vec<u8>>,
}

impl SequencingRead {
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Percentage of G/C bases (case-insensitive), 0.0 for an empty read
    pub fn gc_content(&self) -> f64 {
        if self.sequence.is_empty() {
            return 0.0;
        }
        let gc = self
            .sequence
            .bytes()
            .filter(|b| matches!(b, b'G' | b'C' | b'g' | b'c'))
            .count();
        100.0 * gc as f64 / self.sequence.len() as f64
    }
}

/// Variant class derived from REF/ALT allele lengths
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VariantType {
    #[serde(rename = "SNV")]
    Snv,
    Deletion,
    Insertion,
    Complex,
}

impl VariantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Snv => "SNV",
            VariantType::Deletion => "Deletion",
            VariantType::Insertion => "Insertion",
            VariantType::Complex => "Complex",
        }
    }
}

/// Typed value from a VCF INFO column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InfoValue {
    /// Key present without a value (e.g. `DB`)
    Flag(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

/// One parsed VCF data line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Chromosome with any "chr" prefix removed (e.g. "19", "X")
    pub chromosome: String,

    /// 1-based position
    pub position: u64,

    /// External identifier (e.g. "rs429358"); None when the column is "."
    pub id: Option<String>,

    /// Reference allele
    pub reference: String,

    /// Alternate allele(s); multi-allelic sites keep the composite text
    pub alternative: String,

    /// QUAL column; None when the column is "."
    pub quality: Option<f64>,

    /// FILTER column as written
    pub filter: String,

    /// Derived from the allele lengths
    pub variant_type: VariantType,

    pub info: BTreeMap<String, InfoValue>,

    /// GT value of the first sample (e.g. "0/1", "1|1")
    pub genotype: Option<String>,

    /// GQ value of the first sample
    pub genotype_quality: Option<i32>,
}

/// Coarse chromosome class used for region tallies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GenomicRegion {
    Autosomes,
    #[serde(rename = "Sex_chromosomes")]
    SexChromosomes,
    Other,
}

/// Overall QC verdict, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum QualityVerdict {
    /// No quality data was available to judge
    Unknown,
    Poor,
    Acceptable,
    Good,
    Excellent,
}

impl QualityVerdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityVerdict::Unknown => "Unknown",
            QualityVerdict::Poor => "Poor",
            QualityVerdict::Acceptable => "Acceptable",
            QualityVerdict::Good => "Good",
            QualityVerdict::Excellent => "Excellent",
        }
    }
}

/// QC outcome shared by read and variant files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityAssessment {
    pub overall_quality: QualityVerdict,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    /// Always false when `overall_quality` is Poor
    pub pass_filters: bool,
}

impl Default for QualityAssessment {
    fn default() -> Self {
        Self {
            overall_quality: QualityVerdict::Unknown,
            issues: Vec::new(),
            recommendations: Vec::new(),
            pass_filters: true,
        }
    }
}

/// How a risk score was derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// Weighted sum over matched risk SNPs
    SnpBased,
    /// Variant-burden fallback when no risk SNP matched
    PopulationBased,
}

/// Contribution of one matched risk SNP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantContribution {
    pub variant_id: String,
    pub weight: f64,
    pub genotype: String,
    /// Risk-allele multiplier derived from the genotype (0.0, 0.5, 1.0 or 2.0)
    pub genotype_multiplier: f64,
    pub contribution: f64,
    pub chromosome: String,
    pub position: u64,
}

/// Variant counts behind a population-based score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantBurden {
    pub total_variants: usize,
    pub snv_count: usize,
    pub indel_count: usize,
}

/// Polygenic risk score for one disease
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskScoreResult {
    pub disease_type: String,

    /// Normalized score, always within [0, 1]
    pub score: f64,

    /// Weighted sum before normalization (0.0 on the population path)
    pub raw_score: f64,

    pub variants_used: usize,
    pub total_possible_variants: usize,

    /// variants_used / total_possible_variants, capped at 1.0
    pub confidence: f64,

    pub contributing_variants: Vec<VariantContribution>,
    pub method: ScoringMethod,
    pub interpretation: String,

    /// Only populated by the population-based fallback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_burden: Option<VariantBurden>,
}

/// Error shape handed back to callers: `{"status": "error", "message": ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResult {
    pub status: String,
    pub message: String,
}

impl ErrorResult {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gc_content() {
        let read = SequencingRead {
            id: "r1".to_string(),
            sequence: "GCgcAT".to_string(),
            quality: None,
        };
        assert!((read.gc_content() - 66.666).abs() < 0.01);

        let empty = SequencingRead {
            id: "r2".to_string(),
            sequence: String::new(),
            quality: None,
        };
        assert_eq!(empty.gc_content(), 0.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_verdict_ordering() {
        assert!(QualityVerdict::Excellent > QualityVerdict::Good);
        assert!(QualityVerdict::Good > QualityVerdict::Acceptable);
        assert!(QualityVerdict::Acceptable > QualityVerdict::Poor);
        assert!(QualityVerdict::Poor > QualityVerdict::Unknown);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&VariantType::Snv).unwrap(), "\"SNV\"");
        assert_eq!(
            serde_json::to_string(&GenomicRegion::SexChromosomes).unwrap(),
            "\"Sex_chromosomes\""
        );
        assert_eq!(
            serde_json::to_string(&ScoringMethod::PopulationBased).unwrap(),
            "\"population_based\""
        );
        assert_eq!(
            serde_json::to_string(&QualityVerdict::Excellent).unwrap(),
            "\"Excellent\""
        );
    }

    #[test]
    fn test_info_value_untagged() {
        let json = serde_json::to_string(&InfoValue::Float(0.4)).unwrap();
        assert_eq!(json, "0.4");
        let json = serde_json::to_string(&InfoValue::Flag(true)).unwrap();
        assert_eq!(json, "true");
    }

    #[test]
    fn test_error_result_shape() {
        let err = ErrorResult::new("Unsupported file format: txt");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["message"], "Unsupported file format: txt");
    }
}
