use chrono::{DateTime, Local};
use colored::*;
use humansize::{format_size as human_format_size, BINARY, DECIMAL};

/// Format a byte count for display (`1.23 MB`)
pub fn format_size(size: u64) -> String {
    human_format_size(size, DECIMAL)
}

/// Format a byte count with binary units (`1.50 GiB`), used for traffic totals
pub fn format_bytes_binary(size: u64) -> String {
    human_format_size(size, BINARY)
}

/// Format timestamp in human-readable format (YYYY-MM-DD HH:MM:SS)
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Percentage colored by load: green, yellow above 50, red above 80
pub fn format_percent(percent: f64) -> ColoredString {
    let text = format!("{:.1}%", percent);
    if percent > 80.0 {
        text.red()
    } else if percent > 50.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Ten-cell usage bar, e.g. `[######----]`
pub fn usage_bar(percent: f64) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 10.0).round()) as usize;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(10 - filled))
}
