// ==============================================================================
// output.rs - JSON Result Output
// ==============================================================================
// Description: Write analysis and risk results as JSON to stdout or a file,
//              gzip-compressed when the path ends in .gz
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use anyhow::{Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::validator::is_gzipped;

/// JSON layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    #[default]
    Compact,
    Pretty,
}

impl JsonStyle {
    pub fn from_pretty_flag(pretty: bool) -> Self {
        if pretty {
            JsonStyle::Pretty
        } else {
            JsonStyle::Compact
        }
    }
}

fn serialize<W: Write, T: Serialize>(
    writer: W,
    value: &T,
    style: JsonStyle,
) -> serde_json::Result<()> {
    match style {
        JsonStyle::Compact => serde_json::to_writer(writer, value),
        JsonStyle::Pretty => serde_json::to_writer_pretty(writer, value),
    }
}

/// Write `value` to `path`, or to stdout when no path is given
pub fn write_json<T: Serialize>(value: &T, path: Option<&Path>, style: JsonStyle) -> Result<()> {
    match path {
        Some(path) => write_json_file(value, path, style),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            serialize(&mut handle, value, style).context("Failed to write JSON to stdout")?;
            writeln!(handle)?;
            Ok(())
        }
    }
}

/// Write `value` to a file, gzip-compressed for `.gz` paths
pub fn write_json_file<T: Serialize>(value: &T, path: &Path, style: JsonStyle) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file {}", path.display()))?;
    let writer = BufWriter::new(file);

    if is_gzipped(&path.to_string_lossy()) {
        let mut encoder = GzEncoder::new(writer, Compression::default());
        serialize(&mut encoder, value, style).context("Failed to write JSON output")?;
        encoder
            .finish()
            .context("Failed to finish gzip stream")?
            .flush()?;
        info!("Wrote gzip-compressed JSON to {}", path.display());
    } else {
        let mut writer = writer;
        serialize(&mut writer, value, style).context("Failed to write JSON output")?;
        writeln!(writer)?;
        writer.flush()?;
        info!("Wrote JSON to {}", path.display());
    }

    Ok(())
}
