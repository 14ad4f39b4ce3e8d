//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Color a tier or overall status by severity
pub fn color_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "normal" | "online" | "healthy" => status.green().to_string(),
        "warning" | "degraded" => status.yellow().to_string(),
        "critical" | "unhealthy" => status.red().to_string(),
        _ => status.to_string(),
    }
}

/// Trend arrow for a parameter row
pub fn trend_arrow(trend: &str) -> &'static str {
    match trend {
        "up" => "↑",
        "down" => "↓",
        _ => "→",
    }
}

/// Format a metric value with its display unit
///
/// Uptime arrives in seconds and is shown in days; network arrives in
/// KB and is shown in GB, matching the feed's units.
pub fn format_value(metric: &str, value: f64) -> String {
    match metric {
        "cpu" | "memory" | "disk" => format!("{:.1}%", value),
        "temperature" => format!("{:.1}°C", value),
        "response_time" => format!("{:.2}ms", value),
        "network" => format!("{:.2}GB", value / (1024.0 * 1024.0)),
        "uptime" => format!("{:.1}days", value / 86400.0),
        _ => format!("{:.0}", value),
    }
}

/// Render a sparkline as unicode bars, scaled to the row's own range
pub fn sparkline(values: &[f64]) -> String {
    const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

    if values.is_empty() {
        return String::new();
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = if max > min { max - min } else { 1.0 };

    values
        .iter()
        .map(|v| {
            let level = (((v - min) / range) * (BARS.len() - 1) as f64).round() as usize;
            BARS[level.min(BARS.len() - 1)]
        })
        .collect()
}

/// Format a percentage score with severity coloring
pub fn color_score(score: u8) -> String {
    let formatted = format!("{}/100", score);
    if score >= 80 {
        formatted.green().to_string()
    } else if score >= 60 {
        formatted.yellow().to_string()
    } else {
        formatted.red().to_string()
    }
}

/// Format a unix timestamp as local time
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
