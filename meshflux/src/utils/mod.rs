use colored::*;
use std::time::Duration;

pub fn print_error(message: &str) {
    eprintln!("{prefix} {message}", prefix = "Error:".red().bold());
}

pub fn print_success(message: &str) {
    eprintln!("{prefix} {message}", prefix = "✓".green().bold());
}

pub fn print_warning(message: &str) {
    eprintln!("{prefix} {message}", prefix = "⚠".yellow().bold());
}

pub fn print_info(message: &str) {
    eprintln!("{prefix} {message}", prefix = "ℹ".blue().bold());
}

/// Age of a timestamp relative to now, e.g. `42s ago`
pub fn format_ago(seconds_ago: i64) -> String {
    let ago = seconds_ago.max(0);
    if ago < 60 {
        format!("{ago}s ago")
    } else if ago < 3600 {
        format!("{minutes}m ago", minutes = ago / 60)
    } else {
        format!("{hours}h ago", hours = ago / 3600)
    }
}

/// Uptime in human units, e.g. `1day 2h 3m`
pub fn format_uptime(seconds: u64) -> String {
    // Drop seconds for readability
    let rounded = Duration::from_secs(seconds - seconds % 60);
    if rounded.is_zero() {
        return format!("{seconds}s");
    }
    humantime::format_duration(rounded).to_string()
}
