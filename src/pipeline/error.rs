//! Error types for credit-history analysis.
//!
//! Statistics that cannot be computed (no observations, zero variance) are
//! not errors; they are reported as `None` in the result rows.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors raised by the analyzers and the report coordinator.
#[derive(Debug, Error)]
pub enum EdaError {
    /// A requested or registered column is absent from the dataset.
    #[error("Column '{column}' not found in dataset")]
    ColumnNotFound {
        /// Name of the missing column
        column: String,
    },

    /// A parameter cannot be satisfied by the data, e.g. `bucket_count == 0`
    /// or too few distinct values to form the requested buckets.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Unexpected failure inside the dataframe engine.
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl EdaError {
    pub fn column_not_found(column: &str) -> Self {
        EdaError::ColumnNotFound {
            column: column.to_string(),
        }
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        EdaError::InvalidParameter(message.into())
    }
}

/// Result alias used across the analysis pipeline
pub type Result<T> = std::result::Result<T, EdaError>;
