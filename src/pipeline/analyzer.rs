//! Credit-history analyzer bound to one dataset and outcome column

use polars::prelude::*;

use super::buckets::{bucket_default_rate, BucketRow};
use super::correlation::{correlation_with_outcome, CorrelationSeries};
use super::error::Result;
use super::registry::{CREDIT_NUMERIC_COLS, DEFAULT_BUCKET_COUNT, DEFAULT_OUTCOME_COLUMN};
use super::structure::{summarize, StructureSummaryRow};

/// Read-only view over a loan dataset for credit-history EDA.
///
/// The analyzer never mutates the dataset; every method is a pure
/// computation over the borrowed frame.
#[derive(Debug, Clone)]
pub struct CreditHistoryAnalyzer<'a> {
    df: &'a DataFrame,
    outcome_column: String,
    registry: &'a [&'a str],
}

impl<'a> CreditHistoryAnalyzer<'a> {
    /// Create an analyzer over `df` using the default credit registry
    pub fn new(df: &'a DataFrame, outcome_column: impl Into<String>) -> Self {
        Self {
            df,
            outcome_column: outcome_column.into(),
            registry: CREDIT_NUMERIC_COLS,
        }
    }

    /// Replace the registry of columns analyzed by the summary and correlation steps
    pub fn with_registry(mut self, registry: &'a [&'a str]) -> Self {
        self.registry = registry;
        self
    }

    pub fn dataset(&self) -> &'a DataFrame {
        self.df
    }

    pub fn outcome_column(&self) -> &str {
        &self.outcome_column
    }

    pub fn registry(&self) -> &'a [&'a str] {
        self.registry
    }

    /// Missingness, mean and standard deviation per registry column
    pub fn structure_summary(&self) -> Result<Vec<StructureSummaryRow>> {
        summarize(self.df, self.registry)
    }

    /// Loan count and default rate per quantile bucket of `column`
    pub fn default_rate_by_bucket(&self, column: &str, bucket_count: usize) -> Result<Vec<BucketRow>> {
        bucket_default_rate(self.df, column, &self.outcome_column, bucket_count)
    }

    /// [`Self::default_rate_by_bucket`] with [`DEFAULT_BUCKET_COUNT`] buckets
    pub fn default_rate_by_quartile(&self, column: &str) -> Result<Vec<BucketRow>> {
        self.default_rate_by_bucket(column, DEFAULT_BUCKET_COUNT)
    }

    /// Pearson correlation of each registry column with the outcome
    pub fn correlation_with_default(&self) -> Result<CorrelationSeries> {
        correlation_with_outcome(self.df, self.registry, &self.outcome_column)
    }
}

impl<'a> From<&'a DataFrame> for CreditHistoryAnalyzer<'a> {
    fn from(df: &'a DataFrame) -> Self {
        Self::new(df, DEFAULT_OUTCOME_COLUMN)
    }
}
