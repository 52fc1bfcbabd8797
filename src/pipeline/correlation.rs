//! Correlation of each registry column with the loan outcome

use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use super::error::Result;
use super::values::numeric_values;

/// Ordered mapping of column name to Pearson correlation with the outcome.
///
/// `None` marks an undefined coefficient (fewer than two paired
/// observations, or zero variance on either side).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorrelationSeries {
    entries: Vec<(String, Option<f64>)>,
}

impl CorrelationSeries {
    /// Coefficient for `column`; the outer `None` means the column is not in the series
    pub fn get(&self, column: &str) -> Option<Option<f64>> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, corr)| *corr)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<f64>)> {
        self.entries.iter().map(|(name, corr)| (name.as_str(), *corr))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<f64>)> for CorrelationSeries {
    fn from_iter<I: IntoIterator<Item = (String, Option<f64>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for CorrelationSeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, corr) in &self.entries {
            map.serialize_entry(name, corr)?;
        }
        map.end()
    }
}

/// Pearson correlation between each registry column and the outcome column.
///
/// Each coefficient uses the rows where both values are present, so a
/// sparse column does not shrink the sample used for the others.
pub fn correlation_with_outcome<S: AsRef<str>>(
    df: &DataFrame,
    registry: &[S],
    outcome_column: &str,
) -> Result<CorrelationSeries> {
    let outcomes = numeric_values(df, outcome_column)?;

    registry
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let values = numeric_values(df, name)?;
            let corr = pearson_pairwise(&values, &outcomes);
            debug!(column = name, ?corr, "correlation with outcome");
            Ok((name.to_string(), corr))
        })
        .collect()
}

/// Pearson correlation over pairwise complete observations.
///
/// Single-pass Welford update of means, variances and covariance.
pub fn pearson_pairwise(xs: &[Option<f64>], ys: &[Option<f64>]) -> Option<f64> {
    let mut n = 0usize;
    let mut mean_x = 0.0;
    let mut mean_y = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    let mut cov_xy = 0.0;

    for (x, y) in xs.iter().zip(ys.iter()) {
        let (Some(x), Some(y)) = (*x, *y) else {
            continue;
        };
        n += 1;
        let dx = x - mean_x;
        let dy = y - mean_y;
        mean_x += dx / n as f64;
        mean_y += dy / n as f64;
        var_x += dx * (x - mean_x);
        var_y += dy * (y - mean_y);
        cov_xy += dx * (y - mean_y);
    }

    if n < 2 || var_x <= 0.0 || var_y <= 0.0 {
        return None;
    }

    let corr = cov_xy / (var_x.sqrt() * var_y.sqrt());
    Some(corr.clamp(-1.0, 1.0))
}
