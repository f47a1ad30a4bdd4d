//! Shared helper functions for CLI commands
//!
//! Value formatting used across the command modules so every output format
//! shows numbers the same way.

/// Format a time in minutes with two decimals
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.2}", minutes)
}

/// Format an optional time, `-` when absent
pub fn format_optional(minutes: Option<f64>) -> String {
    minutes.map(format_minutes).unwrap_or_else(|| "-".to_string())
}

/// Format a signed difference, `-` when absent
pub fn format_delta(delta: Option<f64>) -> String {
    match delta {
        Some(d) if d > 0.0 => format!("+{:.2}", d),
        Some(d) => format_minutes(d),
        None => "-".to_string(),
    }
}

pub fn format_flag(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
