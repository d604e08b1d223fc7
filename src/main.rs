// ==============================================================================
// main.rs - Genomic Analyzer Entry Point
// ==============================================================================
// Description: Command-line front end for file analysis and risk scoring
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use genomic_analysis::config::AnalysisConfig;
use genomic_analysis::models::ErrorResult;
use genomic_analysis::output::{write_json, JsonStyle};
use genomic_analysis::processor::{GenomicProcessor, ProcessingError};
use genomic_analysis::risk::{disease_profile, supported_diseases};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file overriding analysis defaults
    #[arg(short, long, env = "GENOMIC_ANALYSIS_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a FASTQ/FASTA or VCF file (optionally .gz)
    Analyze {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Output path (stdout if omitted; .gz is compressed)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Compute a polygenic risk score from a VCF file
    Risk {
        /// Input VCF file
        #[arg(short, long)]
        input: PathBuf,

        /// Disease key (alzheimer, diabetes, heart_disease)
        #[arg(short, long)]
        disease: String,

        /// Output path (stdout if omitted; .gz is compressed)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Indent the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<ExitCode> {
    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genomic_analysis=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            AnalysisConfig::from_file(path)?
        }
        None => AnalysisConfig::default(),
    };
    let processor = GenomicProcessor::new(&config);

    match args.command {
        Command::Analyze { input, output, pretty } => {
            let style = JsonStyle::from_pretty_flag(pretty);
            let (bytes, filename) = read_input(&input)?;

            match processor.process_file(&bytes, &filename) {
                Ok(processed) => {
                    write_json(&processed, output.as_deref(), style)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => report_failure(&e, output.as_deref(), style),
            }
        }
        Command::Risk { input, disease, output, pretty } => {
            let style = JsonStyle::from_pretty_flag(pretty);
            if disease_profile(&disease).is_none() {
                warn!(
                    "No weight table for '{}' (known: {}); score will be population-based",
                    disease,
                    supported_diseases().join(", ")
                );
            }

            let (bytes, filename) = read_input(&input)?;
            let result = processor
                .process_file(&bytes, &filename)
                .and_then(|processed| processor.calculate_risk_score(&processed, &disease));

            match result {
                Ok(score) => {
                    info!(
                        "{} risk for {}: {:.3} ({})",
                        score.disease_type, filename, score.score, score.interpretation
                    );
                    write_json(&score, output.as_deref(), style)?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => report_failure(&e, output.as_deref(), style),
            }
        }
    }
}

/// Read a whole input file; the library only sees bytes and a name
fn read_input(path: &Path) -> Result<(Vec<u8>, String)> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read input file {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    info!("Read {} bytes from {}", bytes.len(), path.display());
    Ok((bytes, filename))
}

fn report_failure(
    err: &ProcessingError,
    output: Option<&Path>,
    style: JsonStyle,
) -> Result<ExitCode> {
    error!("Processing failed: {}", err);
    write_json(&ErrorResult::from(err), output, style)?;
    Ok(ExitCode::FAILURE)
}
