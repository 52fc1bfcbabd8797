//! Dataset loader for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;
use tracing::info;

/// Load a dataset from a file (CSV or Parquet based on extension).
///
/// `infer_schema_length` only applies to CSV; 0 scans the whole file.
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let lf = match extension.as_str() {
        "csv" => {
            let schema_length = (infer_schema_length > 0).then_some(infer_schema_length);
            LazyCsvReader::new(path)
                .with_infer_schema_length(schema_length)
                .finish()
                .with_context(|| format!("Failed to load CSV file: {}", path.display()))?
        }
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        _ => anyhow::bail!(
            "Unsupported file format: {}. Supported formats: csv, parquet",
            extension
        ),
    };

    let df = lf
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))?;

    let (rows, cols) = df.shape();
    info!(path = %path.display(), rows, cols, "dataset loaded");

    Ok(df)
}
