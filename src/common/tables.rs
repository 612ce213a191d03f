//! Shared table formatting for the text reports
//!
//! The table generators all emit the same shape of output: a titled ASCII
//! table rendered with the [`tabled`] crate, followed by computed summary
//! lines. The helpers here keep percentage formatting consistent across
//! every report.

use tabled::{Table, Tabled};

/// Formats rows as an ASCII table with an optional underlined title
pub fn format_table<T: Tabled>(rows: &[T], title: Option<&str>) -> String {
    if rows.is_empty() {
        return "No data available".to_string();
    }

    let table = Table::new(rows).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.len()), table)
    } else {
        table
    }
}

/// Percentage of `count` over `total`, zero when the total is zero
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        (count as f64 / total as f64) * 100.0
    }
}

/// Renders "12 (63.2%)" cells used throughout the concordance tables
pub fn count_with_pct(count: usize, total: usize) -> String {
    format!("{} ({:.1}%)", count, percentage(count, total))
}

/// Renders "12/19 (63.2%)" accuracy cells
pub fn ratio_with_pct(count: usize, total: usize) -> String {
    format!("{}/{} ({:.1}%)", count, total, percentage(count, total))
}
