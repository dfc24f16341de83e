//! Reusable formatting utilities for CLI output

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

/// Format a price in cents as dollars.
///
/// # Example output
/// `$3.50`, `-$0.25`
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, cents / 100, cents % 100)
}

/// Format an age relative to now.
///
/// # Example output
/// - `just now` (under a minute)
/// - `12m ago`
/// - `3h 5m ago`
pub fn format_age(age: Duration) -> String {
    let secs = age.as_secs();
    if secs < 60 {
        return "just now".to_string();
    }

    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m ago", hours, mins)
    } else {
        format!("{}m ago", mins)
    }
}

/// Format epoch milliseconds as local date/time, "N/A" if out of range.
pub fn format_millis_local(millis: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(millis) {
        Some(dt) => format_local(&dt),
        None => "N/A".to_string(),
    }
}

/// Format a UTC timestamp in the local time zone
///
/// # Example output
/// `01/15/2025 14:30`
pub fn format_local(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%m/%d/%Y %H:%M").to_string()
}

/// Format a byte count with a binary unit
pub fn format_bytes(bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes_f = bytes as f64;
    if bytes_f < KIB {
        format!("{} B", bytes)
    } else if bytes_f < KIB * KIB {
        format!("{:.1} KiB", bytes_f / KIB)
    } else {
        format!("{:.1} MiB", bytes_f / (KIB * KIB))
    }
}
