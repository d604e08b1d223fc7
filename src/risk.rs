// ==============================================================================
// risk.rs - Polygenic Risk Score Calculator
// ==============================================================================
// Description: Genotype-weighted risk scores over fixed disease SNP tables,
//              with a variant-burden fallback when no risk SNP is present
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Algorithm:
//   raw = Σ weight(rsid) × multiplier(genotype) over matched risk SNPs
//   score = clamp((raw + offset) / span, 0, 1) with per-disease offset/span
//   confidence = min(1, matched / table size)
// The weight tables are small illustrative lookups, not GWAS summary data.
// ==============================================================================

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::config::PopulationModel;
use crate::genotype::genotype_multiplier;
use crate::models::{
    RiskScoreResult, ScoringMethod, Variant, VariantBurden, VariantContribution, VariantType,
};

/// Genotype assumed when a matched variant carries no GT field
const DEFAULT_GENOTYPE: &str = "0/1";

/// Affine map from a raw weighted sum onto [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub offset: f64,
    pub span: f64,
}

impl Normalization {
    pub fn apply(&self, raw: f64) -> f64 {
        ((raw + self.offset) / self.span).clamp(0.0, 1.0)
    }
}

const DEFAULT_NORMALIZATION: Normalization = Normalization { offset: 2.0, span: 4.0 };

/// Reference data for one disease
#[derive(Debug)]
pub struct DiseaseProfile {
    pub name: &'static str,
    /// rsID -> signed effect size
    pub weights: HashMap<&'static str, f64>,
    pub normalization: Normalization,
    /// Shift applied by the population-based fallback
    pub population_offset: f64,
}

static PROFILES: OnceLock<HashMap<&'static str, DiseaseProfile>> = OnceLock::new();

fn profiles() -> &'static HashMap<&'static str, DiseaseProfile> {
    PROFILES.get_or_init(|| {
        let table = [
            DiseaseProfile {
                name: "diabetes",
                weights: HashMap::from([
                    ("rs7903146", 0.34),  // TCF7L2
                    ("rs12255372", 0.29), // TCF7L2
                    ("rs1801282", -0.14), // PPARG
                    ("rs5219", 0.08),     // KCNJ11
                    ("rs13266634", 0.11), // SLC30A8
                ]),
                normalization: Normalization { offset: 1.0, span: 3.0 },
                population_offset: 0.08,
            },
            DiseaseProfile {
                name: "alzheimer",
                weights: HashMap::from([
                    ("rs429358", 1.12),   // APOE e4
                    ("rs7412", -0.68),    // APOE e2, protective
                    ("rs11136000", 0.15), // CLU
                    ("rs3851179", 0.09),  // PICALM
                ]),
                normalization: Normalization { offset: 1.0, span: 4.0 },
                population_offset: 0.05,
            },
            DiseaseProfile {
                name: "heart_disease",
                weights: HashMap::from([
                    ("rs599839", 0.29),   // SORT1/CELSR2/PSRC1
                    ("rs17465637", 0.29), // MIA3
                    ("rs6922269", 0.25),  // MTHFD1L
                    ("rs1333049", 0.21),  // CDKN2A/CDKN2B
                ]),
                normalization: DEFAULT_NORMALIZATION,
                population_offset: 0.06,
            },
        ];

        table.into_iter().map(|p| (p.name, p)).collect()
    })
}

/// Look up a disease profile (case-insensitive)
pub fn disease_profile(disease: &str) -> Option<&'static DiseaseProfile> {
    profiles().get(disease.trim().to_lowercase().as_str())
}

/// Disease keys with a weight table, sorted
pub fn supported_diseases() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = profiles().keys().copied().collect();
    names.sort_unstable();
    names
}

/// Risk category for a normalized score
pub fn interpret_score(score: f64) -> &'static str {
    if score >= 0.8 {
        "Very High Risk"
    } else if score >= 0.6 {
        "High Risk"
    } else if score >= 0.4 {
        "Moderate Risk"
    } else if score >= 0.2 {
        "Low Risk"
    } else {
        "Very Low Risk"
    }
}

/// Polygenic risk score calculator
///
/// Holds only the population-model constants; the weight tables are shared
/// process-wide and never mutated.
#[derive(Debug, Clone, Default)]
pub struct RiskScoreCalculator {
    population: PopulationModel,
}

impl RiskScoreCalculator {
    pub fn new(population: PopulationModel) -> Self {
        Self { population }
    }

    /// Score a variant list for one disease
    ///
    /// Never fails: an unknown disease has an empty weight table and, like
    /// any list without matching rsIDs, is scored by the population fallback.
    pub fn calculate(&self, variants: &[Variant], disease_type: &str) -> RiskScoreResult {
        let profile = disease_profile(disease_type);
        let possible = profile.map_or(0, |p| p.weights.len());

        info!(
            "Calculating PRS for {} with {} variants ({} risk SNPs in table)",
            disease_type,
            variants.len(),
            possible
        );

        let Some(profile) = profile else {
            info!("No weight table for '{}', using population-based scoring", disease_type);
            return self.population_based(variants, disease_type, None);
        };

        let mut seen: HashSet<&str> = HashSet::new();
        let mut contributions = Vec::new();

        for variant in variants {
            let Some(id) = variant.id.as_deref() else {
                continue;
            };
            let Some(&weight) = profile.weights.get(id) else {
                continue;
            };
            if !seen.insert(id) {
                debug!("Ignoring repeated risk SNP {}", id);
                continue;
            }

            let genotype = variant.genotype.as_deref().unwrap_or(DEFAULT_GENOTYPE);
            let multiplier = genotype_multiplier(genotype);
            debug!("Found risk SNP {} with genotype {}", id, genotype);

            contributions.push(VariantContribution {
                variant_id: id.to_string(),
                weight,
                genotype: genotype.to_string(),
                genotype_multiplier: multiplier,
                contribution: weight * multiplier,
                chromosome: variant.chromosome.clone(),
                position: variant.position,
            });
        }

        if contributions.is_empty() {
            info!("No matching SNPs found, using population-based scoring");
            return self.population_based(variants, disease_type, Some(profile));
        }

        let raw_score: f64 = contributions.iter().map(|c| c.contribution).sum();
        let score = profile.normalization.apply(raw_score);
        let confidence = (contributions.len() as f64 / possible.max(1) as f64).min(1.0);

        info!(
            "PRS for {}: {} of {} SNPs matched, raw {:.3}, normalized {:.3}",
            disease_type,
            contributions.len(),
            possible,
            raw_score,
            score
        );

        RiskScoreResult {
            disease_type: disease_type.to_string(),
            score,
            raw_score,
            variants_used: contributions.len(),
            total_possible_variants: possible,
            confidence,
            contributing_variants: contributions,
            method: ScoringMethod::SnpBased,
            interpretation: interpret_score(score).to_string(),
            variant_burden: None,
        }
    }

    /// Score from overall variant burden around the population baseline
    fn population_based(
        &self,
        variants: &[Variant],
        disease_type: &str,
        profile: Option<&DiseaseProfile>,
    ) -> RiskScoreResult {
        let model = &self.population;
        let total = variants.len();
        let snv_count = variants
            .iter()
            .filter(|v| v.variant_type == VariantType::Snv)
            .count();

        let adjustment = if total > model.high_burden_threshold {
            model.burden_adjustment
        } else if total < model.low_burden_threshold {
            -model.burden_adjustment
        } else {
            0.0
        };
        let disease_offset = profile.map_or(0.0, |p| p.population_offset);
        let score = (model.baseline + adjustment + disease_offset).clamp(0.0, 1.0);

        debug!(
            "Population score for {}: baseline {} + burden {} + disease {} = {}",
            disease_type, model.baseline, adjustment, disease_offset, score
        );

        RiskScoreResult {
            disease_type: disease_type.to_string(),
            score,
            raw_score: 0.0,
            variants_used: 0,
            total_possible_variants: profile.map_or(0, |p| p.weights.len()),
            confidence: 0.0,
            contributing_variants: Vec::new(),
            method: ScoringMethod::PopulationBased,
            interpretation: interpret_score(score).to_string(),
            variant_burden: Some(VariantBurden {
                total_variants: total,
                snv_count,
                indel_count: total - snv_count,
            }),
        }
    }
}
