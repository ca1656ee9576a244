//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! messages, the scan progress spinner, and the listing and summary
//! tables. Keeping formatting here makes it easy to change globally.

use crate::query::BYTES_PER_MB;
use crate::scanner::FileRecord;
use chrono::{DateTime, Local, Utc};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;

/// Formats a byte count the way listings display it: binary megabytes
/// with two decimals.
pub fn format_size(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / BYTES_PER_MB as f64)
}

/// Formats a modification timestamp in local time, minute precision.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M")
        .to_string()
}

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - The scan progress spinner
/// - Listing and summary tables
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsift::output::OutputFormatter;
    /// OutputFormatter::success("Added category 'Ebooks'");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dirsift::output::OutputFormatter;
    /// OutputFormatter::error("Directory not found: /tmp/nope");
    /// ```
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates the spinner shown while a scan walks directory entries.
    ///
    /// The entry count is unknown up front, so this is a spinner with a
    /// running position rather than a bar. Drive it with `inc(1)` from
    /// the scan progress callback.
    pub fn create_scan_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} Scanning... {pos} entries")
                .expect("Invalid progress bar template"),
        );
        pb
    }

    /// Prints the listing table: one row per record with name, size,
    /// category and modification time.
    pub fn record_table(records: &[FileRecord]) {
        if records.is_empty() {
            Self::plain("No files match the current filters.");
            return;
        }

        let sizes: Vec<String> = records.iter().map(|r| format_size(r.size_bytes)).collect();
        let name_width = records
            .iter()
            .map(|r| r.name.len())
            .max()
            .unwrap_or(0)
            .max(4); // At least "Name" width
        let size_width = sizes.iter().map(|s| s.len()).max().unwrap_or(0).max(4);
        let type_width = records
            .iter()
            .map(|r| r.category.len())
            .max()
            .unwrap_or(0)
            .max(4);

        println!(
            "{:<name_width$} | {:>size_width$} | {:<type_width$} | {}",
            "Name".bold(),
            "Size".bold(),
            "Type".bold(),
            "Modified".bold(),
        );
        println!("{}", "-".repeat(name_width + size_width + type_width + 25));

        for (record, size) in records.iter().zip(&sizes) {
            println!(
                "{:<name_width$} | {:>size_width$} | {:<type_width$} | {}",
                record.name,
                size,
                record.category,
                format_timestamp(record.modified_at),
            );
        }
    }

    /// Prints per-category counts and overall totals for a listing.
    pub fn listing_summary(records: &[FileRecord]) {
        Self::header("SUMMARY");

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for record in records {
            *counts.entry(record.category.as_str()).or_insert(0) += 1;
        }

        // Sort categories for consistent output
        let mut categories: Vec<_> = counts.into_iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let max_category_len = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        for (category, count) in &categories {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<max_category_len$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        let total_bytes: u64 = records.iter().map(|r| r.size_bytes).sum();
        println!(
            "{:<max_category_len$} | {} {}, {}",
            "Total".bold(),
            records.len().to_string().green().bold(),
            if records.len() == 1 { "file" } else { "files" },
            format_size(total_bytes),
        );
    }
}
