//! Registry of recognized credit-history columns

/// Credit-history numeric attributes analyzed by default, in report order.
pub const CREDIT_NUMERIC_COLS: &[&str] = &[
    "dti",
    "dti_joint",
    "delinq_2yrs",
    "mths_since_last_delinq",
    "mths_since_last_record",
    "mths_since_last_major_derog",
    "open_acc",
    "total_acc",
    "pub_rec",
    "acc_now_delinq",
    "revol_bal",
    "revol_util",
    "total_rev_hi_lim",
    "tot_coll_amt",
    "tot_cur_bal",
    "total_bal_il",
    "open_acc_6m",
    "open_il_6m",
    "open_il_12m",
    "open_il_24m",
    "mths_since_rcnt_il",
    "open_rv_12m",
    "open_rv_24m",
    "max_bal_bc",
    "all_util",
    "inq_last_6mths",
    "inq_last_12m",
    "inq_fi",
    "collections_12_mths_ex_med",
];

/// Name of the 0/1 loan outcome column when none is given
pub const DEFAULT_OUTCOME_COLUMN: &str = "loan_status";

/// Bucket count used when a caller does not choose one
pub const DEFAULT_BUCKET_COUNT: usize = 4;
