//! Report coordinator: run named analysis steps and collect their results
//!
//! A report is described by [`ReportSteps`], an insertion-ordered mapping of
//! step name to a deferred computation. [`run_report`] evaluates the steps in
//! order and stops at the first failure; wrap a step with [`capture_failure`]
//! to record its error in the report instead.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{info, warn};

use crate::pipeline::error::Result;
use crate::pipeline::{BucketRow, CorrelationSeries, CreditHistoryAnalyzer, StructureSummaryRow};

/// Bucket count used by the default report wiring
pub const DEFAULT_REPORT_BUCKET_COUNT: usize = 5;

/// Columns bucketed by the default report wiring
pub const DEFAULT_BUCKET_COLUMNS: &[&str] = &["dti", "revol_util"];

/// Result of a single report step
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum StepOutput {
    Structure(Vec<StructureSummaryRow>),
    Buckets(Vec<BucketRow>),
    Correlation(CorrelationSeries),
    /// Error captured by [`capture_failure`]
    Failed { error: String },
}

impl StepOutput {
    pub fn as_structure(&self) -> Option<&[StructureSummaryRow]> {
        match self {
            StepOutput::Structure(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_buckets(&self) -> Option<&[BucketRow]> {
        match self {
            StepOutput::Buckets(rows) => Some(rows),
            _ => None,
        }
    }

    pub fn as_correlation(&self) -> Option<&CorrelationSeries> {
        match self {
            StepOutput::Correlation(series) => Some(series),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, StepOutput::Failed { .. })
    }
}

/// A deferred, zero-argument report step
pub type StepFn<'a> = Box<dyn FnOnce() -> Result<StepOutput> + 'a>;

/// Insertion-ordered mapping of step name to step computation
#[derive(Default)]
pub struct ReportSteps<'a> {
    steps: Vec<(String, StepFn<'a>)>,
}

impl<'a> ReportSteps<'a> {
    pub fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Register a step. Re-using a name replaces the computation but keeps
    /// the step's original position.
    pub fn add<F>(&mut self, name: impl Into<String>, step: F) -> &mut Self
    where
        F: FnOnce() -> Result<StepOutput> + 'a,
    {
        let name = name.into();
        let step: StepFn<'a> = Box::new(step);

        match self.steps.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = step,
            None => self.steps.push((name, step)),
        }
        self
    }

    /// Wrap every registered step with [`capture_failure`]
    pub fn capture_failures(self) -> Self {
        let steps = self
            .steps
            .into_iter()
            .map(|(name, step)| {
                let wrapped: StepFn<'a> = Box::new(capture_failure(step));
                (name, wrapped)
            })
            .collect();
        Self { steps }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl fmt::Debug for ReportSteps<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Turn a failing step into one that records its error as [`StepOutput::Failed`]
pub fn capture_failure<'a, F>(step: F) -> impl FnOnce() -> Result<StepOutput> + 'a
where
    F: FnOnce() -> Result<StepOutput> + 'a,
{
    move || match step() {
        Ok(output) => Ok(output),
        Err(err) => {
            warn!(error = %err, "report step failed, recording error");
            Ok(StepOutput::Failed {
                error: err.to_string(),
            })
        }
    }
}

/// Named step results, in the order the steps were registered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    entries: Vec<(String, StepOutput)>,
}

impl Report {
    pub fn get(&self, name: &str) -> Option<&StepOutput> {
        self.entries
            .iter()
            .find(|(step, _)| step == name)
            .map(|(_, output)| output)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StepOutput)> {
        self.entries.iter().map(|(name, output)| (name.as_str(), output))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, output) in &self.entries {
            map.serialize_entry(name, output)?;
        }
        map.end()
    }
}

/// Evaluate every step in registration order.
///
/// The first failing step aborts the run and its error is returned; no
/// partial report is produced.
pub fn run_report(steps: ReportSteps<'_>) -> Result<Report> {
    let mut entries = Vec::with_capacity(steps.len());

    for (name, step) in steps.steps {
        info!(step = %name, "running report step");
        let output = step().map_err(|err| {
            warn!(step = %name, error = %err, "report step failed");
            err
        })?;
        entries.push((name, output));
    }

    info!(steps = entries.len(), "report complete");
    Ok(Report { entries })
}

/// Build the standard credit-history steps: structure summary, one bucket
/// table per entry of `bucket_columns`, then the correlation series.
pub fn credit_history_steps<'a, S: AsRef<str>>(
    analyzer: &'a CreditHistoryAnalyzer<'_>,
    bucket_columns: &[S],
    bucket_count: usize,
) -> ReportSteps<'a> {
    let mut steps = ReportSteps::new();

    steps.add("structure_summary", move || {
        analyzer.structure_summary().map(StepOutput::Structure)
    });

    for column in bucket_columns {
        let column = column.as_ref().to_string();
        steps.add(format!("{}_buckets", column), move || {
            analyzer
                .default_rate_by_bucket(&column, bucket_count)
                .map(StepOutput::Buckets)
        });
    }

    steps.add("correlation_with_default", move || {
        analyzer.correlation_with_default().map(StepOutput::Correlation)
    });

    steps
}

/// Default wiring: `dti` and `revol_util` in 5 buckets each
pub fn default_steps<'a>(analyzer: &'a CreditHistoryAnalyzer<'_>) -> ReportSteps<'a> {
    credit_history_steps(analyzer, DEFAULT_BUCKET_COLUMNS, DEFAULT_REPORT_BUCKET_COUNT)
}

/// Run the default credit-history report over `analyzer`
pub fn credit_history_report(analyzer: &CreditHistoryAnalyzer<'_>) -> Result<Report> {
    run_report(default_steps(analyzer))
}
