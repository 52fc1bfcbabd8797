//! Tests for bucketed default rates

use credit_eda::pipeline::{
    bucket_default_rate, load_dataset, BucketRow, CreditHistoryAnalyzer, EdaError,
    DEFAULT_BUCKET_COUNT,
};
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::assert_close;

fn assert_contiguous(rows: &[BucketRow]) {
    assert!(rows[0].bucket.closed_lower, "first bucket must include its lower bound");
    for pair in rows.windows(2) {
        assert!(!pair[1].bucket.closed_lower);
        assert!(pair[0].bucket.lower < pair[0].bucket.upper || rows.len() == 1);
        assert_eq!(
            pair[0].bucket.upper, pair[1].bucket.lower,
            "consecutive buckets must share a boundary"
        );
        assert!(pair[0].bucket.lower < pair[1].bucket.lower);
    }
}

#[test]
fn test_two_buckets_over_ten_loans() {
    let df = common::create_dti_dataframe();
    let analyzer = CreditHistoryAnalyzer::new(&df, "loan_status");

    let rows = analyzer.default_rate_by_bucket("dti", 2).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].n_loans, 5);
    assert_eq!(rows[1].n_loans, 5);
    assert_eq!(rows[0].bucket.to_string(), "[1, 5.5]");
    assert_eq!(rows[1].bucket.to_string(), "(5.5, 10]");
    // Outcomes 1,0,1,0,1 then 0,1,0,1,0
    assert_close(rows[0].default_rate.unwrap(), 0.6);
    assert_close(rows[1].default_rate.unwrap(), 0.4);
}

#[test]
fn test_n_loans_sum_to_present_values() {
    let df = common::create_registry_dataframe();

    let rows = bucket_default_rate(&df, "revol_util", "loan_status", 4).unwrap();

    let total: usize = rows.iter().map(|r| r.n_loans).sum();
    assert_eq!(total, 8, "the two missing revol_util rows must be excluded");
    assert_contiguous(&rows);
}

#[test]
fn test_default_rates_within_unit_interval() {
    let df = common::create_registry_dataframe();

    for k in 1..=5 {
        let rows = bucket_default_rate(&df, "dti", "loan_status", k).unwrap();
        assert_eq!(rows.len(), k);
        for row in &rows {
            let rate = row.default_rate.unwrap();
            assert!((0.0..=1.0).contains(&rate), "rate {} out of range", rate);
        }
        assert_contiguous(&rows);
    }
}

#[test]
fn test_bucketing_is_deterministic() {
    let df = common::create_registry_dataframe();

    let first = bucket_default_rate(&df, "revol_util", "loan_status", 3).unwrap();
    let second = bucket_default_rate(&df, "revol_util", "loan_status", 3).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_all_missing_column_is_invalid() {
    let df = common::create_dti_dataframe();

    let result = bucket_default_rate(&df, "revol_util", "loan_status", 5);
    assert!(
        matches!(result, Err(EdaError::InvalidParameter(_))),
        "expected InvalidParameter, got {:?}",
        result
    );
}

#[test]
fn test_zero_buckets_is_invalid() {
    let df = common::create_dti_dataframe();

    let result = bucket_default_rate(&df, "dti", "loan_status", 0);
    assert!(matches!(result, Err(EdaError::InvalidParameter(_))));
}

#[test]
fn test_too_few_distinct_values_is_invalid() {
    let df = df! {
        "loan_status" => [0i32, 1, 0, 1],
        "pub_rec" => [1.0f64, 1.0, 2.0, 2.0],
    }
    .unwrap();

    let result = bucket_default_rate(&df, "pub_rec", "loan_status", 3);
    match result {
        Err(EdaError::InvalidParameter(message)) => {
            assert!(message.contains("2 distinct"), "unexpected message: {}", message)
        }
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn test_absent_column_is_not_found() {
    let df = common::create_dti_dataframe();

    let result = bucket_default_rate(&df, "all_util", "loan_status", 2);
    assert!(matches!(result, Err(EdaError::ColumnNotFound { .. })));

    let result = bucket_default_rate(&df, "dti", "charged_off", 2);
    assert!(matches!(result, Err(EdaError::ColumnNotFound { .. })));
}

#[test]
fn test_tie_heavy_column_merges_buckets() {
    let df = df! {
        "loan_status" => [0i32, 0, 0, 0, 0, 1, 1, 0, 1, 1],
        "inq_last_6mths" => [0.0f64, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let rows = bucket_default_rate(&df, "inq_last_6mths", "loan_status", 4).unwrap();

    // Edges 0, 0, 0, 1.75, 4 collapse to 0, 1.75, 4
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].n_loans, 7);
    assert_eq!(rows[1].n_loans, 3);
    assert_close(rows[0].default_rate.unwrap(), 2.0 / 7.0);
    assert_close(rows[1].default_rate.unwrap(), 2.0 / 3.0);
    assert_contiguous(&rows);
}

#[test]
fn test_boundary_ties_fall_into_lower_bucket() {
    let df = df! {
        "loan_status" => [0i32, 1, 1, 1, 0, 0],
        "open_acc" => [1.0f64, 2.0, 2.0, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let rows = bucket_default_rate(&df, "open_acc", "loan_status", 2).unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].bucket.upper, 2.0);
    assert_eq!(rows[0].n_loans, 4);
    assert_eq!(rows[1].n_loans, 2);
    assert_close(rows[0].default_rate.unwrap(), 0.75);
    assert_close(rows[1].default_rate.unwrap(), 0.0);
}

#[test]
fn test_missing_outcomes_excluded_from_rate() {
    let df = df! {
        "loan_status" => [Some(1i32), None, Some(0), Some(0)],
        "dti" => [1.0f64, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let rows = bucket_default_rate(&df, "dti", "loan_status", 1).unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].n_loans, 4);
    assert_close(rows[0].default_rate.unwrap(), 1.0 / 3.0);
}

#[test]
fn test_bucket_with_only_missing_outcomes_has_undefined_rate() {
    let df = df! {
        "loan_status" => [Some(1i32), Some(0), None, None],
        "dti" => [1.0f64, 2.0, 3.0, 4.0],
    }
    .unwrap();

    let rows = bucket_default_rate(&df, "dti", "loan_status", 2).unwrap();

    assert_eq!(rows.len(), 2);
    assert_close(rows[0].default_rate.unwrap(), 0.5);
    assert_eq!(rows[1].default_rate, None);
}

#[test]
fn test_non_finite_values_are_excluded() {
    let df = df! {
        "loan_status" => [1i32, 0, 1, 0, 1],
        "revol_bal" => [Some(100.0f64), Some(f64::NAN), Some(200.0), Some(f64::INFINITY), None],
    }
    .unwrap();

    let rows = bucket_default_rate(&df, "revol_bal", "loan_status", 2).unwrap();

    let total: usize = rows.iter().map(|r| r.n_loans).sum();
    assert_eq!(total, 2);
    assert_eq!(rows[1].bucket.upper, 200.0);
}

#[test]
fn test_bucket_rows_serialize_as_field_mappings() {
    let df = common::create_dti_dataframe();
    let rows = bucket_default_rate(&df, "dti", "loan_status", 2).unwrap();

    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["n_loans"], 5);
    assert_eq!(json[0]["bucket"]["lower"], 1.0);
    assert_eq!(json[0]["bucket"]["upper"], 5.5);
    assert_eq!(json[1]["bucket"]["closed_lower"], false);
}

#[test]
fn test_empty_csv_column_is_invalid_for_bucketing() {
    let (_temp_dir, csv_path) = common::create_temp_loan_csv(false);
    let df = load_dataset(&csv_path, 10000).unwrap();

    match bucket_default_rate(&df, "revol_util", "loan_status", 5) {
        Err(EdaError::InvalidParameter(message)) => {
            assert!(message.contains("no valid"), "unexpected message: {}", message)
        }
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
}

#[test]
fn test_quartiles_use_default_bucket_count() {
    let df = common::create_dti_dataframe();
    let analyzer = CreditHistoryAnalyzer::new(&df, "loan_status");

    let rows = analyzer.default_rate_by_quartile("dti").unwrap();
    assert_eq!(rows.len(), DEFAULT_BUCKET_COUNT);
    assert_eq!(
        rows,
        analyzer.default_rate_by_bucket("dti", DEFAULT_BUCKET_COUNT).unwrap()
    );
    assert_eq!(rows.iter().map(|r| r.n_loans).sum::<usize>(), 10);
}
