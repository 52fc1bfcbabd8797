//! Bucketed default rates over quantile bins
//!
//! Bucketing runs in two explicit phases so boundary behavior can be
//! inspected on its own:
//! 1. [`quantile_edges`] computes equal-frequency boundaries from the
//!    empirical distribution, merging boundaries that coincide.
//! 2. [`assign_buckets`] maps each row to the interval that contains it.
//!
//! Intervals are right-closed `(lower, upper]`, except the first which also
//! includes its lower bound. A value equal to a boundary therefore lands in
//! the lower bucket.

use std::fmt;

use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::error::{EdaError, Result};
use super::values::numeric_values;

/// A half-open numeric interval covered by one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketInterval {
    pub lower: f64,
    pub upper: f64,
    /// True for the first bucket, whose lower bound is inclusive
    pub closed_lower: bool,
}

impl BucketInterval {
    pub fn contains(&self, value: f64) -> bool {
        let above_lower = if self.closed_lower {
            value >= self.lower
        } else {
            value > self.lower
        };
        above_lower && value <= self.upper
    }
}

impl fmt::Display for BucketInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.closed_lower { '[' } else { '(' };
        write!(f, "{}{}, {}]", open, self.lower, self.upper)
    }
}

/// Loan count and default rate for one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketRow {
    pub bucket: BucketInterval,
    /// Rows whose column value falls in this bucket
    pub n_loans: usize,
    /// Mean of the present outcome values in this bucket
    pub default_rate: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
struct BucketStats {
    n_loans: usize,
    outcome_sum: f64,
    outcome_count: usize,
}

impl BucketStats {
    fn add(&mut self, outcome: Option<f64>) {
        self.n_loans += 1;
        if let Some(y) = outcome {
            self.outcome_sum += y;
            self.outcome_count += 1;
        }
    }

    fn default_rate(&self) -> Option<f64> {
        if self.outcome_count == 0 {
            None
        } else {
            Some(self.outcome_sum / self.outcome_count as f64)
        }
    }
}

/// Partition `column` into `bucket_count` quantile buckets and compute the
/// loan count and mean outcome per bucket.
///
/// Rows with a missing `column` value are left out. Buckets are returned in
/// ascending order; when ties collapse boundaries fewer buckets than
/// requested may come back.
///
/// # Errors
/// * `InvalidParameter` if `bucket_count` is zero, the column has no present
///   values, or it has fewer distinct values than `bucket_count`
/// * `ColumnNotFound` if either column is absent
pub fn bucket_default_rate(
    df: &DataFrame,
    column: &str,
    outcome_column: &str,
    bucket_count: usize,
) -> Result<Vec<BucketRow>> {
    if bucket_count < 1 {
        return Err(EdaError::invalid_parameter(format!(
            "bucket_count must be at least 1, got {}",
            bucket_count
        )));
    }

    let values = numeric_values(df, column)?;
    let outcomes = numeric_values(df, outcome_column)?;

    let mut sorted: Vec<f64> = values.iter().flatten().copied().collect();
    if sorted.is_empty() {
        return Err(EdaError::invalid_parameter(format!(
            "Column '{}' has no valid (non-missing) values to bucket",
            column
        )));
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let distinct = count_distinct(&sorted);
    if distinct < bucket_count {
        return Err(EdaError::invalid_parameter(format!(
            "Column '{}' has {} distinct value(s), cannot form {} buckets",
            column, distinct, bucket_count
        )));
    }

    let edges = quantile_edges(&sorted, bucket_count);
    let intervals = intervals_from_edges(&edges);
    debug!(column, bucket_count, ?edges, "computed quantile edges");

    let assignment = assign_buckets(&values, &intervals);

    let mut stats = vec![BucketStats::default(); intervals.len()];
    for (slot, outcome) in assignment.iter().zip(outcomes.iter()) {
        if let Some(idx) = slot {
            stats[*idx].add(*outcome);
        }
    }

    let rows = merge_empty_buckets(&intervals, &stats);
    if rows.len() < bucket_count {
        debug!(
            column,
            requested = bucket_count,
            effective = rows.len(),
            "tied boundaries merged into fewer buckets"
        );
    }

    Ok(rows)
}

/// Compute strictly increasing quantile boundaries over sorted values.
///
/// Boundaries are taken at probabilities `i / bucket_count` using linear
/// interpolation between order statistics. Coinciding boundaries merge, so
/// the result may hold fewer than `bucket_count + 1` edges. A single edge is
/// returned when every value is identical.
pub fn quantile_edges(sorted: &[f64], bucket_count: usize) -> Vec<f64> {
    if sorted.is_empty() || bucket_count == 0 {
        return Vec::new();
    }

    let mut edges: Vec<f64> = (0..=bucket_count)
        .map(|i| quantile(sorted, i as f64 / bucket_count as f64))
        .collect();
    edges.dedup_by(|next, prev| *next <= *prev);
    edges
}

/// Build the bucket intervals delimited by consecutive edges
pub fn intervals_from_edges(edges: &[f64]) -> Vec<BucketInterval> {
    match edges {
        [] => Vec::new(),
        [only] => vec![BucketInterval {
            lower: *only,
            upper: *only,
            closed_lower: true,
        }],
        _ => edges
            .windows(2)
            .enumerate()
            .map(|(i, pair)| BucketInterval {
                lower: pair[0],
                upper: pair[1],
                closed_lower: i == 0,
            })
            .collect(),
    }
}

/// Map each value to the index of the interval containing it.
///
/// Missing values and values outside every interval map to `None`.
pub fn assign_buckets(values: &[Option<f64>], intervals: &[BucketInterval]) -> Vec<Option<usize>> {
    let Some(last) = intervals.len().checked_sub(1) else {
        return vec![None; values.len()];
    };

    values
        .iter()
        .map(|value| {
            let x = (*value)?;
            let idx = intervals.partition_point(|b| b.upper < x).min(last);
            intervals[idx].contains(x).then_some(idx)
        })
        .collect()
}

/// Linear-interpolated quantile of non-empty sorted data
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let h = last as f64 * p;
    let lo = (h.floor() as usize).min(last);
    let hi = (lo + 1).min(last);
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

fn count_distinct(sorted: &[f64]) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    1 + sorted.windows(2).filter(|w| w[1] > w[0]).count()
}

/// Fold empty buckets into their successor (or predecessor when last) so the
/// remaining buckets still share boundaries.
fn merge_empty_buckets(intervals: &[BucketInterval], stats: &[BucketStats]) -> Vec<BucketRow> {
    let mut rows: Vec<BucketRow> = Vec::with_capacity(intervals.len());
    let mut carried_lower: Option<(f64, bool)> = None;
    let mut trailing_upper: Option<f64> = None;

    for (interval, stat) in intervals.iter().zip(stats.iter()) {
        if stat.n_loans == 0 {
            carried_lower.get_or_insert((interval.lower, interval.closed_lower));
            trailing_upper = Some(interval.upper);
            continue;
        }

        let mut bucket = *interval;
        if let Some((lower, closed_lower)) = carried_lower.take() {
            bucket.lower = lower;
            bucket.closed_lower = closed_lower;
        }
        trailing_upper = None;

        rows.push(BucketRow {
            bucket,
            n_loans: stat.n_loans,
            default_rate: stat.default_rate(),
        });
    }

    if let (Some(upper), Some(last)) = (trailing_upper, rows.last_mut()) {
        last.bucket.upper = upper;
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        assert_eq!(quantile(&sorted, 0.0), 1.0);
        assert!((quantile(&sorted, 0.5) - 5.5).abs() < 1e-12);
        assert_eq!(quantile(&sorted, 1.0), 10.0);
    }

    #[test]
    fn test_quantile_edges_merge_ties() {
        // Half the mass sits on 0, so the 0.25 quantile coincides with the minimum
        let sorted = [0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let edges = quantile_edges(&sorted, 4);
        assert_eq!(edges.first(), Some(&0.0));
        assert_eq!(edges.last(), Some(&5.0));
        assert!(edges.len() < 5, "tied edges should merge, got {:?}", edges);
        assert!(edges.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_single_value_yields_single_closed_interval() {
        let edges = quantile_edges(&[3.0, 3.0, 3.0], 1);
        assert_eq!(edges, vec![3.0]);
        let intervals = intervals_from_edges(&edges);
        assert_eq!(intervals.len(), 1);
        assert!(intervals[0].contains(3.0));
    }

    #[test]
    fn test_boundary_value_falls_in_lower_bucket() {
        let intervals = intervals_from_edges(&[1.0, 5.0, 10.0]);
        let assignment = assign_buckets(&[Some(1.0), Some(5.0), Some(5.01), Some(10.0), None], &intervals);
        assert_eq!(assignment, vec![Some(0), Some(0), Some(1), Some(1), None]);
    }

    #[test]
    fn test_values_outside_intervals_are_unassigned() {
        let intervals = intervals_from_edges(&[1.0, 5.0]);
        let assignment = assign_buckets(&[Some(0.5), Some(6.0)], &intervals);
        assert_eq!(assignment, vec![None, None]);
    }

    #[test]
    fn test_interval_display() {
        let intervals = intervals_from_edges(&[1.0, 5.5, 10.0]);
        assert_eq!(intervals[0].to_string(), "[1, 5.5]");
        assert_eq!(intervals[1].to_string(), "(5.5, 10]");
    }

    #[test]
    fn test_empty_middle_bucket_merges_into_successor() {
        let intervals = intervals_from_edges(&[0.0, 1.0, 2.0, 3.0]);
        let stats = [
            BucketStats { n_loans: 2, outcome_sum: 1.0, outcome_count: 2 },
            BucketStats::default(),
            BucketStats { n_loans: 4, outcome_sum: 1.0, outcome_count: 4 },
        ];

        let rows = merge_empty_buckets(&intervals, &stats);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].bucket.upper, 1.0);
        assert_eq!(rows[1].bucket.lower, 1.0);
        assert_eq!(rows[1].bucket.upper, 3.0);
        assert_eq!(rows[1].default_rate, Some(0.25));
    }

    #[test]
    fn test_empty_edge_buckets_merge_into_neighbors() {
        let intervals = intervals_from_edges(&[0.0, 1.0, 2.0, 3.0]);
        let stats = [
            BucketStats::default(),
            BucketStats { n_loans: 3, outcome_sum: 0.0, outcome_count: 3 },
            BucketStats::default(),
        ];

        let rows = merge_empty_buckets(&intervals, &stats);
        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].bucket,
            BucketInterval { lower: 0.0, upper: 3.0, closed_lower: true }
        );
        assert_eq!(rows[0].default_rate, Some(0.0));
    }

    #[test]
    fn test_default_rate_skips_missing_outcomes() {
        let mut stats = BucketStats::default();
        stats.add(Some(1.0));
        stats.add(None);
        stats.add(Some(0.0));
        assert_eq!(stats.n_loans, 3);
        assert_eq!(stats.default_rate(), Some(0.5));

        let mut all_missing = BucketStats::default();
        all_missing.add(None);
        assert_eq!(all_missing.default_rate(), None);
    }
}
