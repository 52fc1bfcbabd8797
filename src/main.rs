//! credit-eda: Credit-history EDA CLI Tool
//!
//! Loads a loan dataset, runs the credit-history report (structure summary,
//! bucketed default rates, outcome correlations) and prints and exports
//! the results.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

use credit_eda::cli::Cli;
use credit_eda::pipeline::{
    encode_outcome, is_binary_outcome, load_dataset, CreditHistoryAnalyzer,
};
use credit_eda::report::{
    credit_history_steps, display_report, export_report, run_report, ExportParams,
};
use credit_eda::utils::{
    create_spinner, finish_with_failure, finish_with_success, print_banner, print_completion,
    print_config, print_info, print_step_header, print_success, print_warning,
};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let output_path = (!cli.no_export).then(|| cli.output_path());

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &cli.input,
        &cli.target,
        output_path.as_deref(),
        &cli.bucket_columns,
        cli.buckets,
    );

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");

    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = match load_dataset(&cli.input, cli.infer_schema_length) {
        Ok(df) => df,
        Err(err) => {
            finish_with_failure(&spinner, "Failed to load dataset");
            return Err(err);
        }
    };
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols) = df.shape();
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!(
        "      {}",
        style(format!("{:.2?}", step_start.elapsed())).dim()
    );

    let df = match cli.target_mapping() {
        Some(mapping) => {
            let encoded = encode_outcome(&df, &cli.target, &mapping)
                .with_context(|| format!("Failed to encode outcome column '{}'", cli.target))?;
            print_success(&format!(
                "Encoded '{}': '{}' -> 1, '{}' -> 0",
                cli.target, mapping.event_value, mapping.non_event_value
            ));
            encoded
        }
        None => {
            let binary = is_binary_outcome(&df, &cli.target)
                .with_context(|| format!("Outcome column '{}' is not usable", cli.target))?;
            if !binary {
                print_warning(&format!(
                    "Outcome column '{}' is not 0/1; use --event-value/--non-event-value to encode it",
                    cli.target
                ));
            }
            df
        }
    };

    // Step 2: Run report steps
    print_step_header(2, "Credit History Report");

    let registry: Vec<&str> = cli.columns.iter().map(String::as_str).collect();
    let mut analyzer = CreditHistoryAnalyzer::new(&df, cli.target.clone());
    if !registry.is_empty() {
        analyzer = analyzer.with_registry(&registry);
    }

    let mut steps = credit_history_steps(&analyzer, &cli.bucket_columns, cli.buckets);
    if cli.continue_on_error {
        steps = steps.capture_failures();
    }

    let step_start = Instant::now();
    let spinner = create_spinner(&format!("Running {} report steps...", steps.len()));
    let report = match run_report(steps) {
        Ok(report) => report,
        Err(err) => {
            finish_with_failure(&spinner, "Report generation failed");
            return Err(anyhow::Error::new(err).context("Report generation failed"));
        }
    };
    finish_with_success(&spinner, &format!("Completed {} report steps", report.len()));
    println!(
        "      {}",
        style(format!("{:.2?}", step_start.elapsed())).dim()
    );

    let failed: Vec<&str> = report
        .iter()
        .filter(|(_, output)| output.is_failed())
        .map(|(name, _)| name)
        .collect();
    if !failed.is_empty() {
        print_warning(&format!("{} step(s) failed: {}", failed.len(), failed.join(", ")));
    }

    display_report(&report);

    // Step 3: Export
    print_step_header(3, "Save Results");

    match output_path {
        Some(path) => {
            let input_file = cli.input.display().to_string();
            let params = ExportParams {
                input_file: &input_file,
                outcome_column: &cli.target,
                bucket_count: cli.buckets,
                bucket_columns: &cli.bucket_columns,
            };
            export_report(&report, &path, &params)?;
            print_success(&format!("Saved report to {}", path.display()));
        }
        None => print_info("JSON export disabled"),
    }

    print_completion();

    Ok(())
}
