//! Credit-history EDA library
//!
//! Descriptive statistics and default-rate associations between borrower
//! credit-history attributes and a binary loan outcome: structure
//! summaries, quantile-bucketed default rates, and outcome correlations,
//! coordinated into a named report.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
