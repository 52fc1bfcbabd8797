//! Structure summary: missingness and central tendency per registry column

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::error::Result;
use super::values::{lookup_column, numeric_values};

/// One row of the structure summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureSummaryRow {
    /// Registry column name
    pub column: String,
    /// Storage type of the column as reported by the dataframe
    pub dtype: String,
    /// Number of missing entries (null or non-finite)
    pub n_missing: usize,
    /// Missing entries as a percentage of all rows (0-100)
    pub missing_pct: f64,
    /// Arithmetic mean over present values, `None` when there are none
    pub mean: Option<f64>,
    /// Sample standard deviation over present values, `None` for fewer than two
    pub std: Option<f64>,
}

/// Summarize every registry column, in registry order.
///
/// Fails with `ColumnNotFound` on the first registry column the dataset lacks.
pub fn summarize<S: AsRef<str>>(df: &DataFrame, registry: &[S]) -> Result<Vec<StructureSummaryRow>> {
    let total_rows = df.height();

    registry
        .iter()
        .map(|name| summarize_column(df, name.as_ref(), total_rows))
        .collect()
}

fn summarize_column(df: &DataFrame, name: &str, total_rows: usize) -> Result<StructureSummaryRow> {
    let dtype = lookup_column(df, name)?.dtype().to_string();
    let values = numeric_values(df, name)?;

    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let n_missing = values.len() - present.len();
    let missing_pct = if total_rows == 0 {
        0.0
    } else {
        n_missing as f64 / total_rows as f64 * 100.0
    };

    let (mean, std) = mean_and_sample_std(&present);

    debug!(
        column = name,
        n_missing,
        ?mean,
        ?std,
        "summarized column"
    );

    Ok(StructureSummaryRow {
        column: name.to_string(),
        dtype,
        n_missing,
        missing_pct,
        mean,
        std,
    })
}

/// Mean and sample standard deviation using Welford's single-pass update
pub(crate) fn mean_and_sample_std(values: &[f64]) -> (Option<f64>, Option<f64>) {
    let mut count = 0usize;
    let mut mean = 0.0;
    let mut m2 = 0.0;

    for &x in values {
        count += 1;
        let delta = x - mean;
        mean += delta / count as f64;
        m2 += delta * (x - mean);
    }

    match count {
        0 => (None, None),
        1 => (Some(mean), None),
        _ => (Some(mean), Some((m2 / (count - 1) as f64).sqrt())),
    }
}
