//! Formatting helpers for timestamps, ages and counts

use chrono::{Local, TimeZone};

/// Format epoch milliseconds as local date and time.
///
/// Returns "never" for `None` and "N/A" for out-of-range values.
pub fn format_timestamp_ms(millis: Option<i64>) -> String {
    let Some(millis) = millis else {
        return "never".to_string();
    };

    match Local.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => "N/A".to_string(),
    }
}

/// Human age of something fetched at `then_ms`, e.g. `2m 30s ago`.
pub fn format_age(then_ms: i64, now_ms: i64) -> String {
    let secs = now_ms.saturating_sub(then_ms).max(0) / 1000;

    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m ago", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s ago", mins, secs)
    } else {
        format!("{}s ago", secs)
    }
}

/// Compact participant counts: 950, 45.0K, 1.2M
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

/// Format bytes as a human-readable size
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
