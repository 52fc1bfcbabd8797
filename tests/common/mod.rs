//! Shared test utilities and fixture generators

#![allow(dead_code)]

use credit_eda::pipeline::CREDIT_NUMERIC_COLS;
use polars::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

/// Alternating 0/1 outcome for ten loans
pub const ALTERNATING_OUTCOME: [i32; 10] = [1, 0, 1, 0, 1, 0, 1, 0, 1, 0];

/// Ten loans with `dti` 1..=10, an alternating outcome and an empty `revol_util`
pub fn create_dti_dataframe() -> DataFrame {
    df! {
        "loan_status" => ALTERNATING_OUTCOME,
        "dti" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
        "revol_util" => [None::<f64>; 10],
    }
    .unwrap()
}

/// Values used for every registry column in [`create_registry_dataframe`]
pub fn registry_column_values(name: &str, index: usize) -> Vec<Option<f64>> {
    match name {
        "dti" => (1..=10).map(|r| Some(r as f64)).collect(),
        // 20% missing
        "revol_util" => vec![
            Some(10.0),
            Some(20.0),
            None,
            Some(40.0),
            Some(50.0),
            Some(60.0),
            None,
            Some(80.0),
            Some(90.0),
            Some(100.0),
        ],
        // Never reported
        "dti_joint" => vec![None; 10],
        // Zero variance
        "acc_now_delinq" => vec![Some(0.0); 10],
        // Identical to the outcome
        "delinq_2yrs" => ALTERNATING_OUTCOME.iter().map(|&y| Some(y as f64)).collect(),
        // Mirror image of the outcome
        "inq_last_6mths" => ALTERNATING_OUTCOME
            .iter()
            .map(|&y| Some(1.0 - y as f64))
            .collect(),
        _ => (0..10).map(|r| Some((r * r + index) as f64)).collect(),
    }
}

/// Ten loans carrying every registry column plus `loan_status`
pub fn create_registry_dataframe() -> DataFrame {
    let mut columns: Vec<Column> = Vec::with_capacity(CREDIT_NUMERIC_COLS.len() + 1);
    columns.push(Column::new("loan_status".into(), ALTERNATING_OUTCOME.to_vec()));

    for (index, name) in CREDIT_NUMERIC_COLS.iter().enumerate() {
        columns.push(Column::new((*name).into(), registry_column_values(name, index)));
    }

    DataFrame::new(columns).unwrap()
}

/// Write a small loan CSV (dti, revol_util, loan_status) into a temp directory
pub fn create_temp_loan_csv(revol_util_present: bool) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("loans.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(file, "dti,revol_util,loan_status").unwrap();
    for (r, outcome) in ALTERNATING_OUTCOME.iter().enumerate() {
        let revol_util = if revol_util_present {
            format!("{}", (r + 1) * 10)
        } else {
            String::new()
        };
        writeln!(file, "{},{},{}", r + 1, revol_util, outcome).unwrap();
    }
    drop(file);

    (temp_dir, csv_path)
}

/// Assert two floats agree within a small tolerance
pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}
