//! JSON export of a credit-history report

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use super::coordinator::Report;

/// Metadata about the analysis run
#[derive(Debug, Serialize)]
pub struct ReportMetadata {
    /// Timestamp of the analysis (RFC 3339)
    pub timestamp: String,
    /// Version of this tool
    pub version: String,
    /// Input file path
    pub input_file: String,
    /// Outcome column name
    pub outcome_column: String,
    /// Requested bucket count for bucket tables
    pub bucket_count: usize,
    /// Columns that received bucket tables
    pub bucket_columns: Vec<String>,
}

/// Complete report export with metadata
#[derive(Serialize)]
pub struct ReportExport<'a> {
    pub metadata: ReportMetadata,
    pub report: &'a Report,
}

/// Parameters recorded alongside the exported report
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub outcome_column: &'a str,
    pub bucket_count: usize,
    pub bucket_columns: &'a [String],
}

impl ExportParams<'_> {
    fn metadata(&self) -> ReportMetadata {
        ReportMetadata {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: self.input_file.to_string(),
            outcome_column: self.outcome_column.to_string(),
            bucket_count: self.bucket_count,
            bucket_columns: self.bucket_columns.to_vec(),
        }
    }
}

/// Serialize `report` with run metadata as pretty-printed JSON
pub fn report_to_json(report: &Report, params: &ExportParams) -> Result<String> {
    let export = ReportExport {
        metadata: params.metadata(),
        report,
    };

    serde_json::to_string_pretty(&export).context("Failed to serialize report to JSON")
}

/// Write `report` with run metadata to a JSON file
pub fn export_report(report: &Report, output_path: &Path, params: &ExportParams) -> Result<()> {
    let json = report_to_json(report, params)?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write report to {}", output_path.display()))?;

    Ok(())
}
