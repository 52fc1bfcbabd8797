//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {}",
        style("CREDIT-EDA").cyan().bold()
    );
    println!(
        "    {}",
        style("Credit history vs. loan default").dim()
    );
    println!("    {}", style(format!("v{}", version)).dim());
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(
    input: &Path,
    target: &str,
    output: Option<&Path>,
    bucket_columns: &[String],
    buckets: usize,
) {
    println!("    {}", style("Configuration").cyan().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!("      {}Input:   {}", FOLDER, truncate_path(input, 40));
    println!("      {}Outcome: {}", TARGET, truncate_string(target, 40));
    match output {
        Some(path) => println!("      {}Output:  {}", SAVE, truncate_path(path, 40)),
        None => println!("      {}Output:  {}", SAVE, style("(export disabled)").dim()),
    }
    println!(
        "      {}Buckets: {} x {}",
        CHART,
        style(buckets).yellow(),
        style(bucket_columns.join(", ")).yellow()
    );
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {} {}", INFO, message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("    {} {}", style("!").yellow().bold(), style(message).yellow());
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {} {}",
        ROCKET,
        style("Credit-history report complete!").green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    let path_str = path.display().to_string();
    truncate_string(&path_str, max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
