//! Demand export (CSV download layout and JSON).
//!
//! CSV export uses the five-column layout
//! `Cliente,Demanda,Prioridade,Status,Responsável`, UTF-8 without BOM. The
//! CSV store reads this layout back, so an export can seed a new store.

use crate::error::{DemandError, Result};
use crate::format::csv;
use crate::model::Demand;
use crate::storage::csv::LEGACY_DEMAND_HEADER;
use crate::storage::write_atomic;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// `path` with this format's extension when it has none of its own.
    #[must_use]
    pub fn output_path(self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.extension())
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DemandError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(DemandError::validation(
                "format",
                format!("unknown export format '{other}' (expected csv or json)"),
            )),
        }
    }
}

/// Outcome of a file export.
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub exported_count: usize,
    pub format: ExportFormat,
    /// SHA-256 of the written bytes, lowercase hex.
    pub content_hash: String,
    pub output_path: Option<String>,
}

/// Write demands as CSV in the export layout.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn export_csv<W: Write>(demands: &[Demand], writer: &mut W) -> Result<()> {
    csv::write_record(writer, LEGACY_DEMAND_HEADER)?;
    for demand in demands {
        csv::write_record(
            writer,
            [
                demand.client.as_str(),
                demand.description.as_str(),
                demand.priority.as_str(),
                demand.status.as_str(),
                demand.team_member.as_str(),
            ],
        )?;
    }
    Ok(())
}

/// Write demands as a pretty JSON array.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn export_json<W: Write>(demands: &[Demand], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, demands)?;
    writeln!(writer)?;
    Ok(())
}

/// Render demands in the given format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render(demands: &[Demand], format: ExportFormat) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    match format {
        ExportFormat::Csv => export_csv(demands, &mut buf)?,
        ExportFormat::Json => export_json(demands, &mut buf)?,
    }
    Ok(buf)
}

/// Export to a writer (e.g. stdout).
///
/// # Errors
///
/// Returns an error if rendering or writing fails.
pub fn export_to_writer<W: Write>(
    demands: &[Demand],
    format: ExportFormat,
    writer: &mut W,
) -> Result<ExportResult> {
    let bytes = render(demands, format)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(ExportResult {
        exported_count: demands.len(),
        format,
        content_hash: content_hash(&bytes),
        output_path: None,
    })
}

/// Export atomically to a file: an existing file is only replaced once the
/// new content is fully written.
///
/// # Errors
///
/// Returns an error if rendering or file I/O fails.
pub fn export_to_path(
    demands: &[Demand],
    format: ExportFormat,
    path: &Path,
) -> Result<ExportResult> {
    let bytes = render(demands, format)?;
    write_atomic(path, |w| {
        w.write_all(&bytes)?;
        Ok(())
    })?;

    let result = ExportResult {
        exported_count: demands.len(),
        format,
        content_hash: content_hash(&bytes),
        output_path: Some(path.to_string_lossy().to_string()),
    };
    info!(
        path = %path.display(),
        count = result.exported_count,
        hash = %result.content_hash,
        "Exported demands"
    );
    Ok(result)
}

fn content_hash(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
