//! Common display utilities and helpers

/// Placeholder for empty optional columns
pub const EMPTY_CELL: &str = "--";

/// Truncate string to max characters with ellipsis
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Value of an optional column, or the placeholder
pub fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or(EMPTY_CELL).to_string()
}
