// ==============================================================================
// config.rs - Analysis Configuration
// ==============================================================================
// Description: Sampling caps, reporting limits and population-model constants
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MAX_INPUT_BYTES: usize = 500 * 1024 * 1024; // 500 MB

/// Tunables for the analyzers and risk calculator
///
/// Every field has a default, so a config file only needs the keys it
/// wants to override:
///
/// ```json
/// { "max_reads": 2000, "population": { "baseline": 0.45 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Reads used for statistics; later reads are counted only
    pub max_reads: usize,

    /// Variant lines analyzed; later lines are counted only
    pub max_variant_lines: usize,

    /// Leading positions of each read that feed quality aggregation
    pub quality_positions: usize,

    /// Leading positions reported in the per-position quality table
    pub reported_positions: usize,

    /// Number of overrepresented sequences reported
    pub overrepresented_limit: usize,

    /// Bases kept when displaying an overrepresented sequence
    pub display_truncation: usize,

    /// Reads echoed back as `sample_sequences`
    pub sample_read_count: usize,

    /// Bases kept for each echoed read
    pub sample_read_truncation: usize,

    /// Variants echoed back as `sample_variants`
    pub sample_variant_count: usize,

    /// Skipped-record messages retained per file
    pub max_diagnostics: usize,

    /// Largest accepted input buffer
    pub max_input_bytes: usize,

    pub population: PopulationModel,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_reads: 10_000,
            max_variant_lines: 50_000,
            quality_positions: 100,
            reported_positions: 50,
            overrepresented_limit: 5,
            display_truncation: 50,
            sample_read_count: 3,
            sample_read_truncation: 100,
            sample_variant_count: 5,
            max_diagnostics: 20,
            max_input_bytes: MAX_INPUT_BYTES,
            population: PopulationModel::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: AnalysisConfig = serde_json::from_str(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        if config.max_reads == 0 || config.max_variant_lines == 0 {
            anyhow::bail!("Sampling caps must be greater than zero");
        }

        Ok(config)
    }
}

/// Constants of the population-based risk fallback
///
/// These are illustrative placeholders, not fitted values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationModel {
    /// Score of an average individual
    pub baseline: f64,

    /// Shift applied above/below the burden thresholds
    pub burden_adjustment: f64,

    /// Variant count above which `burden_adjustment` is added
    pub high_burden_threshold: usize,

    /// Variant count below which `burden_adjustment` is subtracted
    pub low_burden_threshold: usize,
}

impl Default for PopulationModel {
    fn default() -> Self {
        Self {
            baseline: 0.5,
            burden_adjustment: 0.1,
            high_burden_threshold: 5_000_000,
            low_burden_threshold: 1_000_000,
        }
    }
}
