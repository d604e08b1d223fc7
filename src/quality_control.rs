// ==============================================================================
// quality_control.rs - Quality Control Assessment
// ==============================================================================
// Description: Pass/fail verdicts with issues and recommendations for read
//              and variant analyses
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use tracing::debug;

use crate::models::{QualityAssessment, QualityVerdict};
use crate::parsers::{ReadAnalysis, VariantAnalysis};

// Read thresholds (mean Phred)
const READ_EXCELLENT: f64 = 30.0;
const READ_GOOD: f64 = 25.0;
const READ_ACCEPTABLE: f64 = 20.0;
const HIGH_DUPLICATION_PERCENT: f64 = 50.0;
const MODERATE_DUPLICATION_PERCENT: f64 = 20.0;
const MAX_READ_LENGTH_STD: f64 = 10.0;

// Variant thresholds (mean QUAL)
const VARIANT_EXCELLENT: f64 = 100.0;
const VARIANT_GOOD: f64 = 50.0;
const VARIANT_ACCEPTABLE: f64 = 20.0;
const LOW_VARIANT_COUNT: usize = 1_000;
const LARGE_VARIANT_COUNT: usize = 10_000_000;

/// Stateless QC rules over analyzer output
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityController;

impl QualityController {
    pub fn new() -> Self {
        Self
    }

    /// Assess a read analysis
    pub fn assess_reads(&self, analysis: &ReadAnalysis) -> QualityAssessment {
        let mut assessment = QualityAssessment::default();

        if let Some(mean) = analysis.quality_metrics.mean_quality() {
            if mean >= READ_EXCELLENT {
                assessment.overall_quality = QualityVerdict::Excellent;
            } else if mean >= READ_GOOD {
                assessment.overall_quality = QualityVerdict::Good;
            } else if mean >= READ_ACCEPTABLE {
                assessment.overall_quality = QualityVerdict::Acceptable;
                assessment.recommendations.push("Consider quality trimming".to_string());
            } else {
                mark_poor(&mut assessment, "Low overall quality scores");
            }
        }

        let dup_rate = analysis.duplication_metrics.duplication_rate_percent;
        if dup_rate > HIGH_DUPLICATION_PERCENT {
            assessment.issues.push("High duplication rate".to_string());
            assessment
                .recommendations
                .push("Remove duplicates before analysis".to_string());
        } else if dup_rate > MODERATE_DUPLICATION_PERCENT {
            assessment
                .recommendations
                .push("Monitor duplication levels".to_string());
        }

        if analysis.read_length.std > MAX_READ_LENGTH_STD {
            assessment.issues.push("Variable read lengths".to_string());
        }

        debug!(
            "Read QC: {} ({} issues)",
            assessment.overall_quality.as_str(),
            assessment.issues.len()
        );
        assessment
    }

    /// Assess a variant analysis
    pub fn assess_variants(&self, analysis: &VariantAnalysis) -> QualityAssessment {
        let mut assessment = QualityAssessment::default();

        if let Some(mean) = analysis.quality_metrics.mean_quality() {
            if mean >= VARIANT_EXCELLENT {
                assessment.overall_quality = QualityVerdict::Excellent;
            } else if mean >= VARIANT_GOOD {
                assessment.overall_quality = QualityVerdict::Good;
            } else if mean >= VARIANT_ACCEPTABLE {
                assessment.overall_quality = QualityVerdict::Acceptable;
                assessment
                    .recommendations
                    .push("Consider quality filtering".to_string());
            } else {
                mark_poor(&mut assessment, "Low variant quality scores");
            }
        }

        if analysis.total_variants < LOW_VARIANT_COUNT {
            assessment.issues.push("Low variant count".to_string());
        } else if analysis.total_variants > LARGE_VARIANT_COUNT {
            assessment
                .recommendations
                .push("Large variant set - consider filtering".to_string());
        }

        debug!(
            "Variant QC: {} ({} issues)",
            assessment.overall_quality.as_str(),
            assessment.issues.len()
        );
        assessment
    }
}

fn mark_poor(assessment: &mut QualityAssessment, issue: &str) {
    assessment.overall_quality = QualityVerdict::Poor;
    assessment.issues.push(issue.to_string());
    assessment.pass_filters = false;
}
