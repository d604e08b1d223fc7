// ==============================================================================
// parsers/vcf.rs - Variant Call File Analyzer
// ==============================================================================
// Description: Line-oriented VCF parser with header extraction, variant
//              classification and per-file aggregation
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================
// References:
// - VCF 4.2 Spec: https://samtools.github.io/hts-specs/VCFv4.2.pdf
// ==============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::{decode_input, InputDecodeError, MissingQuality, QualityRepr, SkipLog};
use crate::config::AnalysisConfig;
use crate::models::{GenomicRegion, InfoValue, Variant, VariantType};
use crate::stats::{self, round2};

const MIN_COLUMNS: usize = 8;
const HIGH_QUALITY_VARIANT: f64 = 30.0;

/// VCF parsing errors
#[derive(Error, Debug)]
pub enum VariantParseError {
    #[error("VCF parsing failed: {0}")]
    Decode(#[from] InputDecodeError),

    #[error("No variants found in VCF file")]
    NoVariants,
}

/// Metadata declared in the `##` header and the `#CHROM` line
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VcfHeaderInfo {
    /// `##fileformat=` value (e.g. "VCFv4.2")
    pub format_version: Option<String>,
    /// `##reference=` value
    pub reference_genome: Option<String>,
    /// IDs of `##INFO` declarations
    pub info_fields: Vec<String>,
    /// IDs of `##FORMAT` declarations
    pub format_fields: Vec<String>,
    /// Sample columns of the `#CHROM` line
    pub samples: Vec<String>,
}

/// Aggregate statistics for a variant file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantAnalysis {
    /// Every data line in the file
    pub total_variants: usize,

    /// Data lines considered for analysis (capped)
    pub sample_analyzed: usize,

    /// Analyzed lines that parsed successfully
    pub parsed_variants: usize,

    pub header_info: VcfHeaderInfo,
    pub chromosome_distribution: BTreeMap<String, usize>,
    pub variant_type_distribution: BTreeMap<VariantType, usize>,
    pub quality_metrics: VariantQualityMetrics,
    pub genomic_regions: BTreeMap<GenomicRegion, usize>,
    pub sample_variants: Vec<Variant>,

    pub skipped_records: usize,
    pub parse_diagnostics: Vec<String>,

    /// All parsed variants from the analyzed lines; kept for risk scoring
    #[serde(skip)]
    pub variants: Vec<Variant>,
}

impl VariantAnalysis {
    /// Variants available for scoring
    ///
    /// Falls back to the display sample when the analysis was rebuilt from
    /// its serialized form, which does not carry the full list.
    pub fn scoring_variants(&self) -> &[Variant] {
        if self.variants.is_empty() {
            &self.sample_variants
        } else {
            &self.variants
        }
    }
}

/// QUAL-column summary, or a marker when no line carried a quality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "QualityRepr<VariantQualitySummary>", into = "QualityRepr<VariantQualitySummary>")]
pub enum VariantQualityMetrics {
    Measured(VariantQualitySummary),
    NoQualityData,
}

impl From<QualityRepr<VariantQualitySummary>> for VariantQualityMetrics {
    fn from(repr: QualityRepr<VariantQualitySummary>) -> Self {
        match repr {
            QualityRepr::Measured(summary) => VariantQualityMetrics::Measured(summary),
            QualityRepr::Missing { .. } => VariantQualityMetrics::NoQualityData,
        }
    }
}

impl From<VariantQualityMetrics> for QualityRepr<VariantQualitySummary> {
    fn from(metrics: VariantQualityMetrics) -> Self {
        match metrics {
            VariantQualityMetrics::Measured(summary) => QualityRepr::Measured(summary),
            VariantQualityMetrics::NoQualityData => QualityRepr::Missing {
                status: MissingQuality::NoQualityData,
            },
        }
    }
}

impl VariantQualityMetrics {
    pub fn mean_quality(&self) -> Option<f64> {
        match self {
            VariantQualityMetrics::Measured(summary) => Some(summary.mean_quality),
            VariantQualityMetrics::NoQualityData => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantQualitySummary {
    pub mean_quality: f64,
    pub median_quality: f64,
    pub min_quality: f64,
    pub max_quality: f64,
    /// Variants with QUAL >= 30
    pub high_quality_variants: usize,
    pub total_variants_with_quality: usize,
}

/// VCF analyzer with configurable sampling
pub struct VariantAnalyzer {
    /// Data lines analyzed per file
    pub max_variant_lines: usize,

    /// Parsed variants echoed back in the result
    pub sample_variant_count: usize,

    /// Skipped-line messages retained
    pub max_diagnostics: usize,
}

impl Default for VariantAnalyzer {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl VariantAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            max_variant_lines: config.max_variant_lines,
            sample_variant_count: config.sample_variant_count,
            max_diagnostics: config.max_diagnostics,
        }
    }

    /// Set the number of data lines analyzed
    pub fn with_max_variant_lines(mut self, max: usize) -> Self {
        self.max_variant_lines = max;
        self
    }

    /// Analyze a VCF held in memory
    ///
    /// # Arguments
    /// * `bytes` - File contents (.vcf or .vcf.gz)
    /// * `filename` - Used for compression detection and logging only
    ///
    /// # Returns
    /// * `Ok(VariantAnalysis)` - Statistics over the first `max_variant_lines` data lines
    /// * `Err(VariantParseError)` - Undecodable input or no data lines at all
    ///
    /// Malformed data lines never fail the file; they are counted in
    /// `skipped_records` with the first few reasons in `parse_diagnostics`.
    pub fn analyze(
        &self,
        bytes: &[u8],
        filename: &str,
    ) -> Result<VariantAnalysis, VariantParseError> {
        let text = decode_input(bytes, filename)?;

        let mut header_lines = Vec::new();
        let mut data_lines = Vec::new();
        for (idx, line) in text.lines().enumerate() {
            if line.starts_with('#') {
                header_lines.push(line);
            } else if !line.trim().is_empty() {
                data_lines.push((idx + 1, line));
            }
        }

        if data_lines.is_empty() {
            return Err(VariantParseError::NoVariants);
        }

        let header_info = parse_header(&header_lines);
        let total_variants = data_lines.len();
        let sample_analyzed = total_variants.min(self.max_variant_lines);

        info!(
            "Parsing {} variants from {} (analyzing {})",
            total_variants, filename, sample_analyzed
        );

        let mut skips = SkipLog::new(self.max_diagnostics);
        let mut variants = Vec::with_capacity(sample_analyzed);
        for &(line_num, line) in &data_lines[..sample_analyzed] {
            match parse_variant_line(line) {
                Ok(variant) => variants.push(variant),
                Err(reason) => skips.record(line_num, reason),
            }
        }

        if skips.skipped() > 0 {
            warn!("Skipped {} malformed variant lines in {}", skips.skipped(), filename);
        }

        let mut chromosome_distribution = BTreeMap::new();
        let mut variant_type_distribution = BTreeMap::new();
        let mut genomic_regions = BTreeMap::new();
        let mut qualities = Vec::new();

        for variant in &variants {
            *chromosome_distribution
                .entry(variant.chromosome.clone())
                .or_insert(0) += 1;
            *variant_type_distribution.entry(variant.variant_type).or_insert(0) += 1;
            *genomic_regions
                .entry(classify_region(&variant.chromosome))
                .or_insert(0) += 1;
            if let Some(q) = variant.quality {
                qualities.push(q);
            }
        }

        let quality_metrics = quality_metrics(&qualities);
        let sample_variants = variants
            .iter()
            .take(self.sample_variant_count)
            .cloned()
            .collect();

        info!(
            "VCF analysis complete: {} variants, {} chromosomes",
            total_variants,
            chromosome_distribution.len()
        );

        let (skipped_records, parse_diagnostics) = skips.into_parts();

        Ok(VariantAnalysis {
            total_variants,
            sample_analyzed,
            parsed_variants: variants.len(),
            header_info,
            chromosome_distribution,
            variant_type_distribution,
            quality_metrics,
            genomic_regions,
            sample_variants,
            skipped_records,
            parse_diagnostics,
            variants,
        })
    }
}

/// Classify a variant by allele lengths
///
/// Equal-length multi-base alleles are Complex.
pub fn classify_variant(reference: &str, alternative: &str) -> VariantType {
    if reference.len() == 1 && alternative.len() == 1 {
        VariantType::Snv
    } else if reference.len() > alternative.len() {
        VariantType::Deletion
    } else if reference.len() < alternative.len() {
        VariantType::Insertion
    } else {
        VariantType::Complex
    }
}

/// Strip any leading "chr" prefix (case-insensitive): "chr19" -> "19"
pub fn normalize_chromosome(chrom: &str) -> String {
    let mut name = chrom.trim();
    while let Some(prefix) = name.get(..3) {
        if !prefix.eq_ignore_ascii_case("chr") {
            break;
        }
        name = &name[3..];
    }
    name.to_string()
}

/// Autosome (1-22), sex chromosome (X/Y) or anything else
pub fn classify_region(chrom: &str) -> GenomicRegion {
    let name = normalize_chromosome(chrom);

    if name.eq_ignore_ascii_case("X") || name.eq_ignore_ascii_case("Y") {
        return GenomicRegion::SexChromosomes;
    }

    if !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(n) = name.parse::<u32>() {
            if (1..=22).contains(&n) {
                return GenomicRegion::Autosomes;
            }
        }
    }

    GenomicRegion::Other
}

/// Extract metadata from header lines; stops at `#CHROM`
fn parse_header(lines: &[&str]) -> VcfHeaderInfo {
    let mut header = VcfHeaderInfo::default();

    for line in lines {
        if let Some(version) = line.strip_prefix("##fileformat=") {
            header.format_version = Some(version.to_string());
        } else if let Some(reference) = line.strip_prefix("##reference=") {
            header.reference_genome = Some(reference.to_string());
        } else if line.starts_with("##INFO=") {
            if let Some(id) = declared_id(line) {
                header.info_fields.push(id);
            }
        } else if line.starts_with("##FORMAT=") {
            if let Some(id) = declared_id(line) {
                header.format_fields.push(id);
            }
        } else if line.starts_with("#CHROM") {
            header.samples = line.split('\t').skip(9).map(str::to_string).collect();
            break;
        }
    }

    debug!(
        "VCF header: version={:?}, {} INFO, {} FORMAT, {} samples",
        header.format_version,
        header.info_fields.len(),
        header.format_fields.len(),
        header.samples.len()
    );

    header
}

/// The `ID=` value of a structured header line
fn declared_id(line: &str) -> Option<String> {
    let start = line.find("ID=")? + 3;
    let id: String = line[start..]
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!id.is_empty()).then_some(id)
}

/// Parse one tab-separated data line
///
/// Returns a human-readable reason when the line has to be skipped.
fn parse_variant_line(line: &str) -> Result<Variant, String> {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < MIN_COLUMNS {
        return Err(format!(
            "expected at least {} tab-separated columns, found {}",
            MIN_COLUMNS,
            fields.len()
        ));
    }

    let position = fields[1]
        .trim()
        .parse::<u64>()
        .map_err(|_| format!("invalid position '{}'", fields[1]))?;

    let id = match fields[2] {
        "." | "" => None,
        id => Some(id.to_string()),
    };

    let quality = match fields[5] {
        "." | "" => None,
        raw => match raw.parse::<f64>() {
            Ok(q) if q.is_finite() => Some(q),
            _ => return Err(format!("invalid quality '{}'", raw)),
        },
    };

    let (genotype, genotype_quality) = if fields.len() >= 10 {
        extract_sample_fields(fields[8], fields[9])
    } else {
        (None, None)
    };

    let reference = fields[3].to_string();
    let alternative = fields[4].to_string();

    Ok(Variant {
        chromosome: normalize_chromosome(fields[0]),
        position,
        id,
        variant_type: classify_variant(&reference, &alternative),
        reference,
        alternative,
        quality,
        filter: fields[6].to_string(),
        info: parse_info(fields[7]),
        genotype,
        genotype_quality,
    })
}

/// GT and GQ of the first sample, located by name in the FORMAT column
fn extract_sample_fields(format: &str, sample: &str) -> (Option<String>, Option<i32>) {
    let keys: Vec<&str> = format.split(':').collect();
    let values: Vec<&str> = sample.split(':').collect();

    let lookup = |name: &str| {
        keys.iter()
            .position(|&k| k == name)
            .and_then(|idx| values.get(idx).copied())
    };

    let genotype = lookup("GT").map(str::to_string);
    let genotype_quality = lookup("GQ").and_then(|gq| gq.parse::<i32>().ok());

    (genotype, genotype_quality)
}

/// Split an INFO column into typed values
fn parse_info(info: &str) -> BTreeMap<String, InfoValue> {
    let mut parsed = BTreeMap::new();
    if info == "." {
        return parsed;
    }

    for item in info.split(';').filter(|item| !item.is_empty()) {
        match item.split_once('=') {
            Some((key, value)) => {
                parsed.insert(key.to_string(), typed_info_value(value));
            }
            None => {
                parsed.insert(item.to_string(), InfoValue::Flag(true));
            }
        }
    }

    parsed
}

fn typed_info_value(value: &str) -> InfoValue {
    if value.contains('.') {
        match value.parse::<f64>() {
            Ok(v) => InfoValue::Float(v),
            Err(_) => InfoValue::Text(value.to_string()),
        }
    } else {
        match value.parse::<i64>() {
            Ok(v) => InfoValue::Integer(v),
            Err(_) => InfoValue::Text(value.to_string()),
        }
    }
}

fn quality_metrics(qualities: &[f64]) -> VariantQualityMetrics {
    let Some(summary) = stats::DistributionSummary::from_values(qualities) else {
        return VariantQualityMetrics::NoQualityData;
    };

    VariantQualityMetrics::Measured(VariantQualitySummary {
        mean_quality: round2(summary.mean),
        median_quality: round2(summary.median),
        min_quality: summary.min,
        max_quality: summary.max,
        high_quality_variants: qualities
            .iter()
            .filter(|&&q| q >= HIGH_QUALITY_VARIANT)
            .count(),
        total_variants_with_quality: qualities.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "##fileformat=VCFv4.2\n\
        ##reference=GRCh38\n\
        ##INFO=<ID=AF,Number=A,Type=Float,Description=\"Allele Frequency\">\n\
        ##INFO=<ID=DB,Number=0,Type=Flag,Description=\"dbSNP membership\">\n\
        ##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">\n\
        ##FORMAT=<ID=GQ,Number=1,Type=Integer,Description=\"Genotype Quality\">\n\
        #CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tNA12878\tNA12891\n";

    fn vcf(body: &str) -> String {
        format!("{}{}", HEADER, body)
    }

    #[test]
    fn test_header_parsing() {
        let data = vcf("1\t100\trs1\tA\tG\t50\tPASS\tAF=0.5\n");
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "calls.vcf").unwrap();
        let header = &analysis.header_info;

        assert_eq!(header.format_version.as_deref(), Some("VCFv4.2"));
        assert_eq!(header.reference_genome.as_deref(), Some("GRCh38"));
        assert_eq!(header.info_fields, vec!["AF", "DB"]);
        assert_eq!(header.format_fields, vec!["GT", "GQ"]);
        assert_eq!(header.samples, vec!["NA12878", "NA12891"]);
    }

    #[test]
    fn test_apoe_line() {
        let data = vcf("19\t45411941\trs429358\tT\tC\t99\tPASS\tAF=0.4\n");
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "apoe.vcf").unwrap();

        assert_eq!(analysis.total_variants, 1);
        assert_eq!(analysis.sample_analyzed, 1);

        let variant = &analysis.sample_variants[0];
        assert_eq!(variant.chromosome, "19");
        assert_eq!(variant.position, 45411941);
        assert_eq!(variant.id.as_deref(), Some("rs429358"));
        assert_eq!(variant.variant_type, VariantType::Snv);
        assert_eq!(variant.quality, Some(99.0));
        assert_eq!(variant.info["AF"], InfoValue::Float(0.4));
        assert_eq!(variant.genotype, None);
    }

    #[test]
    fn test_genotype_lookup_by_name() {
        let data = vcf(
            "chr1\t100\trs1\tA\tG\t50\tPASS\t.\tGT:GQ\t0/1:45\t1/1:10\n\
             chr1\t200\trs2\tA\tG\t50\tPASS\t.\tGQ:DP:GT\t38:20:1|1\n\
             chr1\t300\trs3\tA\tG\t50\tPASS\t.\tGT:GQ\t0/0:notanumber\n",
        );
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "gt.vcf").unwrap();
        let v = &analysis.variants;

        assert_eq!(v[0].genotype.as_deref(), Some("0/1"));
        assert_eq!(v[0].genotype_quality, Some(45));
        assert_eq!(v[1].genotype.as_deref(), Some("1|1"));
        assert_eq!(v[1].genotype_quality, Some(38));
        assert_eq!(v[2].genotype.as_deref(), Some("0/0"));
        assert_eq!(v[2].genotype_quality, None);
        assert!(v[0].info.is_empty());
    }

    #[test]
    fn test_malformed_lines_skipped() {
        let data = vcf(
            "1\t100\trs1\tA\tG\t50\tPASS\tAF=0.5\n\
             1\t200\trs2\tA\n\
             1\tabc\trs3\tA\tG\t50\tPASS\tAF=0.5\n\
             1\t400\trs4\tA\tG\tbad\tPASS\tAF=0.5\n\
             2\t500\trs5\tAT\tA\t20\tPASS\tDB\n",
        );
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "messy.vcf").unwrap();

        assert_eq!(analysis.total_variants, 5);
        assert_eq!(analysis.sample_analyzed, 5);
        assert_eq!(analysis.parsed_variants, 2);
        assert_eq!(analysis.skipped_records, 3);
        assert!(analysis.parse_diagnostics[0].contains("columns"));
        assert!(analysis.parse_diagnostics[1].contains("invalid position 'abc'"));
        assert_eq!(analysis.variants[1].info["DB"], InfoValue::Flag(true));
    }

    #[test]
    fn test_sampling_cap() {
        let body: String = (1..=30)
            .map(|i| format!("1\t{}\t.\tA\tG\t40\tPASS\t.\n", i))
            .collect();
        let data = vcf(&body);

        let analysis = VariantAnalyzer::new()
            .with_max_variant_lines(10)
            .analyze(data.as_bytes(), "big.vcf")
            .unwrap();

        assert_eq!(analysis.total_variants, 30);
        assert_eq!(analysis.sample_analyzed, 10);
        assert!(analysis.sample_analyzed <= analysis.total_variants);
        assert_eq!(analysis.variants.len(), 10);
        assert_eq!(analysis.sample_variants.len(), 5);
    }

    #[test]
    fn test_distributions() {
        let data = vcf(
            "chr1\t1\t.\tA\tG\t10\tPASS\t.\n\
             1\t2\t.\tAT\tA\t40\tPASS\t.\n\
             chrX\t3\t.\tA\tAT\t.\tPASS\t.\n\
             Y\t4\t.\tAC\tGT\t100\tPASS\t.\n\
             MT\t5\t.\tA\tC\t50\tPASS\t.\n\
             chr23\t6\t.\tA\tC\t50\tPASS\t.\n",
        );
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "d.vcf").unwrap();

        assert_eq!(analysis.chromosome_distribution["1"], 2);
        assert_eq!(analysis.chromosome_distribution["X"], 1);

        assert_eq!(analysis.variant_type_distribution[&VariantType::Snv], 3);
        assert_eq!(analysis.variant_type_distribution[&VariantType::Deletion], 1);
        assert_eq!(analysis.variant_type_distribution[&VariantType::Insertion], 1);
        assert_eq!(analysis.variant_type_distribution[&VariantType::Complex], 1);

        assert_eq!(analysis.genomic_regions[&GenomicRegion::Autosomes], 2);
        assert_eq!(analysis.genomic_regions[&GenomicRegion::SexChromosomes], 2);
        assert_eq!(analysis.genomic_regions[&GenomicRegion::Other], 2);

        match &analysis.quality_metrics {
            VariantQualityMetrics::Measured(q) => {
                assert_eq!(q.total_variants_with_quality, 5);
                assert_eq!(q.mean_quality, 50.0);
                assert_eq!(q.median_quality, 50.0);
                assert_eq!(q.min_quality, 10.0);
                assert_eq!(q.max_quality, 100.0);
                assert_eq!(q.high_quality_variants, 4);
            }
            VariantQualityMetrics::NoQualityData => panic!("expected quality data"),
        }
    }

    #[test]
    fn test_no_quality_values() {
        let data = vcf("1\t100\t.\tA\tG\t.\tPASS\t.\n");
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "q.vcf").unwrap();
        assert_eq!(analysis.quality_metrics, VariantQualityMetrics::NoQualityData);
        assert_eq!(analysis.sample_variants[0].id, None);

        let json = serde_json::to_value(&analysis.quality_metrics).unwrap();
        assert_eq!(json, serde_json::json!({"status": "no_quality_data"}));
    }

    #[test]
    fn test_measured_quality_has_no_status_key() {
        let data = vcf("1\t100\t.\tA\tG\t60\tPASS\t.\n");
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "q.vcf").unwrap();

        let json = serde_json::to_value(&analysis.quality_metrics).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["mean_quality"], 60.0);
    }

    #[test]
    fn test_analysis_json_round_trip() {
        let data = vcf(
            "chr1\t1\trs1\tA\tG\t10\tPASS\tDP=12;DB\tGT\t0/1\n\
             X\t2\t.\tAT\tA\t40\tPASS\t.\tGT\t1/1\n\
             MT\t3\t.\tA\tC\t.\tPASS\t.\tGT\t0/0\n",
        );
        let mut analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "r.vcf").unwrap();

        let text = serde_json::to_string(&analysis).unwrap();
        let back: VariantAnalysis = serde_json::from_str(&text).unwrap();

        // the full variant list is not serialized
        assert!(back.variants.is_empty());
        assert_eq!(back.scoring_variants(), &back.sample_variants[..]);

        analysis.variants.clear();
        assert_eq!(back, analysis);
    }

    #[test]
    fn test_header_only_file() {
        let err = VariantAnalyzer::new()
            .analyze(HEADER.as_bytes(), "empty.vcf")
            .unwrap_err();
        assert!(matches!(err, VariantParseError::NoVariants));
        assert_eq!(err.to_string(), "No variants found in VCF file");
    }

    #[test]
    fn test_classify_variant() {
        assert_eq!(classify_variant("A", "T"), VariantType::Snv);
        assert_eq!(classify_variant("AT", "A"), VariantType::Deletion);
        assert_eq!(classify_variant("A", "AT"), VariantType::Insertion);
        assert_eq!(classify_variant("AC", "GT"), VariantType::Complex);
        assert_eq!(classify_variant("A", "T,G"), VariantType::Insertion);
    }

    #[test]
    fn test_normalize_chromosome() {
        assert_eq!(normalize_chromosome("chr19"), "19");
        assert_eq!(normalize_chromosome("19"), "19");
        assert_eq!(normalize_chromosome("CHRX"), "X");

        for name in ["chr19", "19", "chrchr7", "chrM", "Chr2", "chr", ""] {
            let once = normalize_chromosome(name);
            assert_eq!(normalize_chromosome(&once), once, "not idempotent for {}", name);
        }
    }

    #[test]
    fn test_info_typing() {
        let info = parse_info("AF=0.25;AC=3;ANN=missense;DB;GENE=.");
        assert_eq!(info["AF"], InfoValue::Float(0.25));
        assert_eq!(info["AC"], InfoValue::Integer(3));
        assert_eq!(info["ANN"], InfoValue::Text("missense".to_string()));
        assert_eq!(info["DB"], InfoValue::Flag(true));
        assert_eq!(info["GENE"], InfoValue::Text(".".to_string()));
    }

    #[test]
    fn test_crlf_line_endings() {
        let data = vcf("1\t100\trs1\tA\tG\t50\tPASS\tAF=0.5\n").replace('\n', "\r\n");
        let analysis = VariantAnalyzer::new().analyze(data.as_bytes(), "win.vcf").unwrap();
        assert_eq!(analysis.parsed_variants, 1);
        assert_eq!(analysis.variants[0].info["AF"], InfoValue::Float(0.5));
        assert_eq!(analysis.header_info.samples, vec!["NA12878", "NA12891"]);
    }
}
