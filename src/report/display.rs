//! Terminal rendering of report results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use super::coordinator::{Report, StepOutput};
use crate::pipeline::{BucketRow, CorrelationSeries, StructureSummaryRow};

/// Placeholder shown for undefined statistics
const MISSING_MARKER: &str = "—";

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|t| Cell::new(t).add_attribute(Attribute::Bold))
        .collect()
}

fn number_cell(value: Option<f64>, precision: usize) -> Cell {
    match value {
        Some(v) => Cell::new(format!("{:.*}", precision, v)).set_alignment(CellAlignment::Right),
        None => Cell::new(MISSING_MARKER).fg(Color::DarkGrey),
    }
}

/// Table of missingness and central tendency per column
pub fn structure_table(rows: &[StructureSummaryRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Column", "Type", "Missing", "Missing %", "Mean", "Std"]));

    for row in rows {
        let pct_color = if row.missing_pct > 50.0 {
            Color::Red
        } else if row.missing_pct > 10.0 {
            Color::Yellow
        } else {
            Color::White
        };

        table.add_row(vec![
            Cell::new(&row.column),
            Cell::new(&row.dtype).fg(Color::DarkGrey),
            Cell::new(row.n_missing).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", row.missing_pct))
                .fg(pct_color)
                .set_alignment(CellAlignment::Right),
            number_cell(row.mean, 3),
            number_cell(row.std, 3),
        ]);
    }

    table
}

/// Table of loan counts and default rates per bucket
pub fn bucket_table(rows: &[BucketRow]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Bucket", "Loans", "Default rate"]));

    for row in rows {
        let rate = match row.default_rate {
            Some(rate) => Cell::new(format!("{:.2}%", rate * 100.0)).set_alignment(CellAlignment::Right),
            None => Cell::new(MISSING_MARKER).fg(Color::DarkGrey),
        };
        table.add_row(vec![
            Cell::new(row.bucket.to_string()),
            Cell::new(row.n_loans).set_alignment(CellAlignment::Right),
            rate,
        ]);
    }

    table
}

/// Table of correlation coefficients with the outcome
pub fn correlation_table(series: &CorrelationSeries) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Column", "Correlation"]));

    for (column, corr) in series.iter() {
        let cell = match corr {
            Some(c) if c.abs() >= 0.1 => number_cell(Some(c), 4)
                .fg(if c > 0.0 { Color::Red } else { Color::Green })
                .add_attribute(Attribute::Bold),
            other => number_cell(other, 4),
        };
        table.add_row(vec![Cell::new(column), cell]);
    }

    table
}

/// Print every step of the report as a titled, indented table
pub fn display_report(report: &Report) {
    for (name, output) in report.iter() {
        println!();
        println!(
            "    {} {}",
            style("▸").cyan(),
            style(name.to_uppercase()).white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());

        let table = match output {
            StepOutput::Structure(rows) => structure_table(rows),
            StepOutput::Buckets(rows) => bucket_table(rows),
            StepOutput::Correlation(series) => correlation_table(series),
            StepOutput::Failed { error } => {
                println!("    {} {}", style("✗").red().bold(), style(error).red());
                continue;
            }
        };

        for line in table.to_string().lines() {
            println!("    {}", line);
        }
    }
}
