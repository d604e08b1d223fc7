// ==============================================================================
// genotype.rs - Genotype to Risk Multiplier Conversion
// ==============================================================================
// Description: Converts VCF GT strings to risk-allele multipliers for scoring
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Algorithm:
//   The ALT allele index "1" is taken as the risk allele.
//   - 0/0 → 0.0 (no risk alleles)
//   - 0/1, 1/0, 0|1 → 1.0 (one risk allele)
//   - 1/1, 1|1 → 2.0 (two risk alleles)
//   - any other count (e.g. triploid 1/1/1) → 1.0, logged
//   - no '/' or '|' separator → 0.5 (ambiguous, heterozygous-like)
// ==============================================================================

use thiserror::Error;
use tracing::warn;

const RISK_ALLELE: &str = "1";

/// Multiplier used when the genotype cannot be split into alleles
pub const AMBIGUOUS_MULTIPLIER: f64 = 0.5;

/// Multiplier used for an unexpected number of risk alleles
pub const FALLBACK_MULTIPLIER: f64 = 1.0;

/// Errors that can occur during genotype parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenotypeParseError {
    #[error("Unknown genotype format: '{0}' (expected alleles separated by '/' or '|')")]
    UnknownFormat(String),
}

/// A GT value split into allele indices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenotypeCall {
    pub alleles: Vec<String>,
    /// True for `|`-separated genotypes
    pub phased: bool,
}

impl GenotypeCall {
    /// Split a GT string such as "0/1" or "1|1"
    ///
    /// # Examples
    /// ```
    /// use genomic_analysis::genotype::GenotypeCall;
    ///
    /// let call = GenotypeCall::parse("0|1").unwrap();
    /// assert!(call.phased);
    /// assert_eq!(call.risk_allele_count(), 1);
    ///
    /// assert!(GenotypeCall::parse("AG").is_err());
    /// ```
    pub fn parse(genotype: &str) -> Result<Self, GenotypeParseError> {
        let (separator, phased) = if genotype.contains('/') {
            ('/', false)
        } else if genotype.contains('|') {
            ('|', true)
        } else {
            return Err(GenotypeParseError::UnknownFormat(genotype.to_string()));
        };

        Ok(Self {
            alleles: genotype.split(separator).map(str::to_string).collect(),
            phased,
        })
    }

    /// Number of alleles equal to the risk allele index
    pub fn risk_allele_count(&self) -> usize {
        self.alleles.iter().filter(|a| a.as_str() == RISK_ALLELE).count()
    }
}

/// Risk-allele multiplier for a genotype string
///
/// # Examples
/// ```
/// use genomic_analysis::genotype::genotype_multiplier;
///
/// assert_eq!(genotype_multiplier("0/0"), 0.0);
/// assert_eq!(genotype_multiplier("0/1"), 1.0);
/// assert_eq!(genotype_multiplier("1|1"), 2.0);
/// assert_eq!(genotype_multiplier("het"), 0.5);
/// ```
pub fn genotype_multiplier(genotype: &str) -> f64 {
    let call = match GenotypeCall::parse(genotype) {
        Ok(call) => call,
        Err(e) => {
            warn!("{}; assuming heterozygous effect", e);
            return AMBIGUOUS_MULTIPLIER;
        }
    };

    match call.risk_allele_count() {
        0 => 0.0,
        1 => 1.0,
        2 => 2.0,
        count => {
            warn!("Unexpected risk allele count {} in genotype '{}'", count, genotype);
            FALLBACK_MULTIPLIER
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diploid_genotypes() {
        assert_eq!(genotype_multiplier("0/0"), 0.0);
        assert_eq!(genotype_multiplier("0/1"), 1.0);
        assert_eq!(genotype_multiplier("1/0"), 1.0);
        assert_eq!(genotype_multiplier("1/1"), 2.0);
    }

    #[test]
    fn test_phased_genotypes() {
        assert_eq!(genotype_multiplier("0|0"), 0.0);
        assert_eq!(genotype_multiplier("1|0"), 1.0);
        assert_eq!(genotype_multiplier("1|1"), 2.0);
    }

    #[test]
    fn test_missing_and_multiallelic_calls() {
        // no-call and second ALT allele carry no "1" risk allele
        assert_eq!(genotype_multiplier("./."), 0.0);
        assert_eq!(genotype_multiplier("2/2"), 0.0);
        assert_eq!(genotype_multiplier("1/2"), 1.0);
    }

    #[test]
    fn test_unexpected_allele_count() {
        assert_eq!(genotype_multiplier("1/1/1"), FALLBACK_MULTIPLIER);
    }

    #[test]
    fn test_unparsable_genotype() {
        assert_eq!(genotype_multiplier("1"), AMBIGUOUS_MULTIPLIER);
        assert_eq!(genotype_multiplier(""), AMBIGUOUS_MULTIPLIER);
        assert_eq!(
            GenotypeCall::parse("AG"),
            Err(GenotypeParseError::UnknownFormat("AG".to_string()))
        );
    }

    #[test]
    fn test_call_fields() {
        let call = GenotypeCall::parse("0/1").unwrap();
        assert!(!call.phased);
        assert_eq!(call.alleles, vec!["0", "1"]);
    }
}
