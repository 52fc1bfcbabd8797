//! Outcome column encoding
//!
//! Loan datasets often carry the outcome as text (e.g. "Charged Off" /
//! "Fully Paid"). The analyzers expect 0/1, so drivers can encode the
//! column up front with a [`TargetMapping`].

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::Result;
use super::values::{is_numeric_dtype, lookup_column};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mapping configuration for converting outcome values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetMapping {
    /// Value that maps to 1 (default)
    pub event_value: String,
    /// Value that maps to 0 (non-default)
    pub non_event_value: String,
}

impl TargetMapping {
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }

    fn encode(&self, raw: &str) -> Option<f64> {
        let raw = raw.trim();
        if raw == self.event_value.trim() {
            Some(1.0)
        } else if raw == self.non_event_value.trim() {
            Some(0.0)
        } else {
            None
        }
    }
}

/// Whether `column` is numeric and holds only 0, 1 or missing values
pub fn is_binary_outcome(df: &DataFrame, column: &str) -> Result<bool> {
    let col = lookup_column(df, column)?;
    if !is_numeric_dtype(col.dtype()) {
        return Ok(false);
    }

    let float_col = col.cast(&DataType::Float64)?;
    let binary = float_col
        .f64()?
        .iter()
        .flatten()
        .all(|v| v.abs() < TOLERANCE || (v - 1.0).abs() < TOLERANCE);

    Ok(binary)
}

/// Return a copy of `df` whose `column` is encoded as Float64 1.0 / 0.0.
///
/// Values matching neither side of the mapping become null, so they count
/// as missing outcomes downstream.
pub fn encode_outcome(df: &DataFrame, column: &str, mapping: &TargetMapping) -> Result<DataFrame> {
    let col = lookup_column(df, column)?;
    let as_text = col.cast(&DataType::String)?;

    let encoded: Vec<Option<f64>> = as_text
        .str()?
        .iter()
        .map(|v| v.and_then(|raw| mapping.encode(raw)))
        .collect();

    let unmatched = encoded
        .iter()
        .filter(|v| v.is_none())
        .count()
        .saturating_sub(col.null_count());
    if unmatched > 0 {
        warn!(
            column,
            unmatched,
            event = %mapping.event_value,
            non_event = %mapping.non_event_value,
            "outcome values matched neither event nor non-event and were set to null"
        );
    }

    let mut out = df.clone();
    out.with_column(Column::new(column.into(), encoded))?;
    Ok(out)
}
