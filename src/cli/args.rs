//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{TargetMapping, DEFAULT_OUTCOME_COLUMN};

/// Credit-history EDA - how credit attributes relate to loan default
#[derive(Parser, Debug)]
#[command(name = "credit-eda")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Outcome column name (0/1 loan default indicator)
    #[arg(short, long, default_value = DEFAULT_OUTCOME_COLUMN)]
    pub target: String,

    /// Value in the outcome column that represents a default (maps to 1).
    /// Required with --non-event-value when the outcome is not binary 0/1.
    #[arg(long, requires = "non_event_value")]
    pub event_value: Option<String>,

    /// Value in the outcome column that represents a non-default (maps to 0).
    /// Required with --event-value when the outcome is not binary 0/1.
    #[arg(long, requires = "event_value")]
    pub non_event_value: Option<String>,

    /// Columns to produce default-rate bucket tables for (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "dti,revol_util")]
    pub bucket_columns: Vec<String>,

    /// Number of quantile buckets per bucket table
    #[arg(long, default_value = "5", value_parser = validate_bucket_count)]
    pub buckets: usize,

    /// Override the registry of analyzed credit columns (comma-separated).
    /// Defaults to the built-in credit-history registry.
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// JSON report output path.
    /// Defaults to input directory with '_credit_report.json' suffix.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Do not write the JSON report
    #[arg(long, default_value = "false")]
    pub no_export: bool,

    /// Record failing steps in the report instead of aborting
    #[arg(long, default_value = "false")]
    pub continue_on_error: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,
}

impl Cli {
    /// Get the JSON output path, deriving it from the input if not explicitly provided.
    pub fn output_path(&self) -> PathBuf {
        self.output.clone().unwrap_or_else(|| {
            let parent = self
                .input
                .parent()
                .unwrap_or_else(|| std::path::Path::new("."));
            let stem = self
                .input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("output");
            parent.join(format!("{}_credit_report.json", stem))
        })
    }

    /// Outcome mapping, when both event and non-event values were given
    pub fn target_mapping(&self) -> Option<TargetMapping> {
        match (&self.event_value, &self.non_event_value) {
            (Some(event), Some(non_event)) => Some(TargetMapping::new(event, non_event)),
            _ => None,
        }
    }
}

/// Validator for the bucket count parameter
fn validate_bucket_count(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid bucket count", s))?;

    if value < 1 {
        Err("buckets must be at least 1".to_string())
    } else {
        Ok(value)
    }
}
