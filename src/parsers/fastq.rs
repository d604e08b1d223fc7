// ==============================================================================
// parsers/fastq.rs - Sequencing Read Analyzer
// ==============================================================================
// Description: Lenient FASTQ/FASTA parser with quality, composition and
//              duplication statistics over a bounded read sample
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// Format: 4-line FASTQ records (Phred+33) or quality-less FASTA records
// Example:
//   @read1 extra description
//   ACGTACGTAC
//   +
//   IIIIIIIIII
// ==============================================================================

use serde::{de, Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::iter::Peekable;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{decode_input, InputDecodeError, MissingQuality, QualityRepr, SkipLog};
use crate::config::AnalysisConfig;
use crate::models::SequencingRead;
use crate::stats::{self, round2, DistributionSummary};

const PHRED_OFFSET: u8 = 33;
const MAX_PHRED_CHAR: u8 = b'~';

const HIGH_QUALITY: u8 = 30;
const MEDIUM_QUALITY: u8 = 20;

/// Read file parsing errors
#[derive(Error, Debug)]
pub enum ReadParseError {
    #[error("FASTQ parsing failed: {0}")]
    Decode(#[from] InputDecodeError),

    #[error("No valid sequences found in FASTQ file ({skipped} malformed records skipped)")]
    NoRecords { skipped: usize },
}

/// Aggregate statistics for a read file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadAnalysis {
    /// Every record that parsed, including those beyond the sampling cap
    pub total_sequences: usize,

    /// Records that fed the statistics below
    pub sample_analyzed: usize,

    pub read_length: DistributionSummary,
    pub gc_content: DistributionSummary,
    pub quality_metrics: ReadQualityMetrics,
    pub composition_metrics: CompositionMetrics,
    pub duplication_metrics: DuplicationMetrics,
    pub sample_sequences: Vec<SampleSequence>,

    pub skipped_records: usize,
    pub parse_diagnostics: Vec<String>,
}

/// Base-quality summary, or a marker when no record carried qualities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QualityRepr<ReadQualitySummary>", into = "QualityRepr<ReadQualitySummary>")]
pub enum ReadQualityMetrics {
    Measured(ReadQualitySummary),
    NoQualityData,
}

impl From<QualityRepr<ReadQualitySummary>> for ReadQualityMetrics {
    fn from(repr: QualityRepr<ReadQualitySummary>) -> Self {
        match repr {
            QualityRepr::Measured(summary) => ReadQualityMetrics::Measured(summary),
            QualityRepr::Missing { .. } => ReadQualityMetrics::NoQualityData,
        }
    }
}

impl From<ReadQualityMetrics> for QualityRepr<ReadQualitySummary> {
    fn from(metrics: ReadQualityMetrics) -> Self {
        match metrics {
            ReadQualityMetrics::Measured(summary) => QualityRepr::Measured(summary),
            ReadQualityMetrics::NoQualityData => QualityRepr::Missing {
                status: MissingQuality::NoQualityData,
            },
        }
    }
}

impl ReadQualityMetrics {
    pub fn mean_quality(&self) -> Option<f64> {
        match self {
            ReadQualityMetrics::Measured(summary) => Some(summary.mean_quality),
            ReadQualityMetrics::NoQualityData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadQualitySummary {
    pub mean_quality: f64,
    pub median_quality: f64,
    pub quality_distribution: QualityDistribution,
    /// Mean Phred score per 0-based position
    #[serde(deserialize_with = "position_keys")]
    pub per_position_quality: BTreeMap<usize, f64>,
    pub total_bases: usize,
}

/// Positions are written as JSON object keys (strings); buffered input from
/// the untagged quality wrapper does not coerce them back to integers.
fn position_keys<'de, D>(deserializer: D) -> Result<BTreeMap<usize, f64>, D::Error>
where
    D: Deserializer<'de>,
{
    BTreeMap::<String, f64>::deserialize(deserializer)?
        .into_iter()
        .map(|(pos, quality)| {
            pos.parse::<usize>()
                .map(|pos| (pos, quality))
                .map_err(de::Error::custom)
        })
        .collect()
}

/// Share of bases in each Phred band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityDistribution {
    /// Q >= 30
    pub high_quality_percent: f64,
    /// 20 <= Q < 30
    pub medium_quality_percent: f64,
    /// Q < 20
    pub low_quality_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositionMetrics {
    /// Percentage of each (uppercased) symbol across analyzed bases
    pub nucleotide_composition: BTreeMap<String, f64>,
    pub overrepresented_sequences: Vec<OverrepresentedSequence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverrepresentedSequence {
    /// Leading bases only
    pub sequence: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DuplicationMetrics {
    pub total_sequences: usize,
    pub unique_sequences: usize,
    pub duplication_rate_percent: f64,
    /// copies -> number of distinct sequences seen exactly that many times
    pub duplication_levels: BTreeMap<usize, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSequence {
    pub id: String,
    pub sequence: String,
    pub length: usize,
    pub gc_content: f64,
}

/// Records parsed from one file
struct ParsedReads {
    reads: Vec<SequencingRead>,
    total: usize,
    skips: SkipLog,
}

/// Sequencing read analyzer
pub struct ReadAnalyzer {
    max_reads: usize,
    quality_positions: usize,
    reported_positions: usize,
    overrepresented_limit: usize,
    display_truncation: usize,
    sample_read_count: usize,
    sample_read_truncation: usize,
    max_diagnostics: usize,
}

impl Default for ReadAnalyzer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl ReadAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_reads: config.max_reads,
            quality_positions: config.quality_positions,
            reported_positions: config.reported_positions,
            overrepresented_limit: config.overrepresented_limit,
            display_truncation: config.display_truncation,
            sample_read_count: config.sample_read_count,
            sample_read_truncation: config.sample_read_truncation,
            max_diagnostics: config.max_diagnostics,
        }
    }

    /// Set the number of reads used for statistics
    pub fn with_max_reads(mut self, max: usize) -> Self {
        self.max_reads = max;
        self
    }

    /// Analyze a read file held in memory
    ///
    /// # Arguments
    /// * `bytes` - File contents, gzip-compressed when `filename` ends in `.gz`
    /// * `filename` - Used for compression detection and logging only
    ///
    /// # Returns
    /// * `Ok(ReadAnalysis)` - Statistics over the first `max_reads` records
    /// * `Err(ReadParseError)` - Undecodable input or no parseable record
    pub fn analyze(&self, bytes: &[u8], filename: &str) -> Result<ReadAnalysis, ReadParseError> {
        let text = decode_input(bytes, filename)?;
        let ParsedReads { reads, total, skips } = self.parse_records(&text);

        if reads.is_empty() {
            return Err(ReadParseError::NoRecords {
                skipped: skips.skipped(),
            });
        }

        info!("Parsing {} sequences from {}", total, filename);
        if skips.skipped() > 0 {
            warn!("Skipped {} malformed records in {}", skips.skipped(), filename);
        }

        let lengths: Vec<f64> = reads.iter().map(|r| r.len() as f64).collect();
        let gc_values: Vec<f64> = reads.iter().map(|r| r.gc_content()).collect();

        let read_length = DistributionSummary::from_values(&lengths)
            .ok_or(ReadParseError::NoRecords { skipped: skips.skipped() })?;
        let gc_content = DistributionSummary::from_values(&gc_values)
            .ok_or(ReadParseError::NoRecords { skipped: skips.skipped() })?;

        let quality_metrics = self.quality_metrics(&reads);
        let composition_metrics = self.composition_metrics(&reads);
        let duplication_metrics = duplication_metrics(&reads);

        let sample_sequences = reads
            .iter()
            .take(self.sample_read_count)
            .map(|read| SampleSequence {
                id: read.id.clone(),
                sequence: read.sequence.chars().take(self.sample_read_truncation).collect(),
                length: read.len(),
                gc_content: round2(read.gc_content()),
            })
            .collect();

        info!(
            "FASTQ analysis complete: {} reads, mean length {:.1}bp, mean GC {:.1}%",
            total, read_length.mean, gc_content.mean
        );

        let (skipped_records, parse_diagnostics) = skips.into_parts();

        Ok(ReadAnalysis {
            total_sequences: total,
            sample_analyzed: reads.len(),
            read_length,
            gc_content,
            quality_metrics,
            composition_metrics,
            duplication_metrics,
            sample_sequences,
            skipped_records,
            parse_diagnostics,
        })
    }

    /// Split text into records, keeping at most `max_reads` of them
    fn parse_records(&self, text: &str) -> ParsedReads {
        let mut reads = Vec::new();
        let mut total = 0;
        let mut skips = SkipLog::new(self.max_diagnostics);

        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
            .peekable();

        while let Some((line_num, line)) = lines.next() {
            let parsed = if let Some(header) = line.strip_prefix('@') {
                parse_fastq_record(header, &mut lines)
            } else if let Some(header) = line.strip_prefix('>') {
                parse_fasta_record(header, &mut lines)
            } else {
                Err("expected '@' or '>' record header".to_string())
            };

            match parsed {
                Ok(read) => {
                    total += 1;
                    if reads.len() < self.max_reads {
                        reads.push(read);
                    }
                }
                Err(reason) => skips.record(line_num, reason),
            }
        }

        debug!("Retained {} of {} parsed records", reads.len(), total);

        ParsedReads { reads, total, skips }
    }

    /// Per-base quality over the leading `quality_positions` of each read
    fn quality_metrics(&self, reads: &[SequencingRead]) -> ReadQualityMetrics {
        let reported = self.reported_positions.min(self.quality_positions);
        let mut scores: Vec<f64> = Vec::new();
        let mut position_sums = vec![(0u64, 0usize); reported];

        for quality in reads.iter().filter_map(|r| r.quality.as_ref()) {
            for (pos, &q) in quality.iter().take(self.quality_positions).enumerate() {
                scores.push(f64::from(q));
                if let Some(slot) = position_sums.get_mut(pos) {
                    slot.0 += u64::from(q);
                    slot.1 += 1;
                }
            }
        }

        let (Some(mean), Some(median)) = (stats::mean(&scores), stats::median(&scores)) else {
            return ReadQualityMetrics::NoQualityData;
        };

        let total = scores.len();
        let high = scores.iter().filter(|&&q| q >= f64::from(HIGH_QUALITY)).count();
        let low = scores.iter().filter(|&&q| q < f64::from(MEDIUM_QUALITY)).count();
        let medium = total - high - low;

        let per_position_quality = position_sums
            .iter()
            .enumerate()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(pos, (sum, count))| (pos, round2(*sum as f64 / *count as f64)))
            .collect();

        ReadQualityMetrics::Measured(ReadQualitySummary {
            mean_quality: round2(mean),
            median_quality: round2(median),
            quality_distribution: QualityDistribution {
                high_quality_percent: round2(stats::percentage(high, total)),
                medium_quality_percent: round2(stats::percentage(medium, total)),
                low_quality_percent: round2(stats::percentage(low, total)),
            },
            per_position_quality,
            total_bases: total,
        })
    }

    /// Nucleotide percentages and the most frequent repeated sequences
    fn composition_metrics(&self, reads: &[SequencingRead]) -> CompositionMetrics {
        let mut base_counts: BTreeMap<char, usize> = BTreeMap::new();
        // uppercased sequence -> (count, first index)
        let mut sequence_counts: HashMap<String, (usize, usize)> = HashMap::new();

        for (idx, read) in reads.iter().enumerate() {
            let upper = read.sequence.to_uppercase();
            for base in upper.chars() {
                *base_counts.entry(base).or_insert(0) += 1;
            }
            sequence_counts.entry(upper).or_insert((0, idx)).0 += 1;
        }

        let total_bases: usize = base_counts.values().sum();
        let nucleotide_composition = base_counts
            .into_iter()
            .map(|(base, count)| (base.to_string(), round2(stats::percentage(count, total_bases))))
            .collect();

        let mut ranked: Vec<(String, usize, usize)> = sequence_counts
            .into_iter()
            .map(|(seq, (count, first))| (seq, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        let overrepresented_sequences = ranked
            .into_iter()
            .take(self.overrepresented_limit)
            .filter(|(_, count, _)| *count > 1)
            .map(|(seq, count, _)| OverrepresentedSequence {
                sequence: seq.chars().take(self.display_truncation).collect(),
                count,
                percentage: round2(stats::percentage(count, reads.len())),
            })
            .collect();

        CompositionMetrics {
            nucleotide_composition,
            overrepresented_sequences,
        }
    }
}

/// Exact-duplicate clustering over the analyzed reads
fn duplication_metrics(reads: &[SequencingRead]) -> DuplicationMetrics {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for read in reads {
        *counts.entry(read.sequence.as_str()).or_insert(0) += 1;
    }

    let total = reads.len();
    let unique = counts.len();
    let duplication_rate_percent = if total == 0 {
        0.0
    } else {
        round2(100.0 * (1.0 - unique as f64 / total as f64))
    };

    let mut duplication_levels = BTreeMap::new();
    for copies in counts.values() {
        *duplication_levels.entry(*copies).or_insert(0) += 1;
    }

    DuplicationMetrics {
        total_sequences: total,
        unique_sequences: unique,
        duplication_rate_percent,
        duplication_levels,
    }
}

/// Parse the three lines following an `@` header
fn parse_fastq_record<'a, I>(
    header: &str,
    lines: &mut Peekable<I>,
) -> Result<SequencingRead, String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let id = header.split_whitespace().next().unwrap_or_default().to_string();

    let (_, sequence) = lines
        .next_if(|(_, l)| !l.starts_with('@') && !l.starts_with('>') && !l.starts_with('+'))
        .ok_or_else(|| format!("record '{}' is missing its sequence line", id))?;

    lines
        .next_if(|(_, l)| l.starts_with('+'))
        .ok_or_else(|| format!("record '{}' is missing the '+' separator", id))?;

    // A quality line may legitimately start with '@'; only refuse it when the
    // length shows it is really the next record's header.
    let (_, quality_line) = lines
        .next_if(|(_, l)| l.len() == sequence.len() || !l.starts_with('@'))
        .ok_or_else(|| format!("record '{}' is missing its quality line", id))?;

    if quality_line.len() != sequence.len() {
        return Err(format!(
            "record '{}' has {} quality values for {} bases",
            id,
            quality_line.len(),
            sequence.len()
        ));
    }

    let quality = decode_phred(quality_line).map_err(|c| {
        format!("record '{}' has invalid quality character '{}'", id, c)
    })?;

    Ok(SequencingRead {
        id,
        sequence: sequence.to_string(),
        quality: Some(quality),
    })
}

/// Parse the sequence lines following a `>` header
fn parse_fasta_record<'a, I>(
    header: &str,
    lines: &mut Peekable<I>,
) -> Result<SequencingRead, String>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let id = header.split_whitespace().next().unwrap_or_default().to_string();

    let mut sequence = String::new();
    while let Some((_, line)) = lines.next_if(|(_, l)| !l.starts_with('>') && !l.starts_with('@')) {
        sequence.push_str(line.trim());
    }

    if sequence.is_empty() {
        return Err(format!("record '{}' has no sequence", id));
    }

    Ok(SequencingRead {
        id,
        sequence,
        quality: None,
    })
}

/// Phred+33 characters to scores; returns the first invalid character
fn decode_phred(line: &str) -> Result<Vec<u8>, char> {
    line.bytes()
        .map(|b| {
            if (PHRED_OFFSET..=MAX_PHRED_CHAR).contains(&b) {
                Ok(b - PHRED_OFFSET)
            } else {
                Err(char::from(b))
            }
        })
        .collect()
}
