//! Output formatting module
//!
//! Output format selection, message helpers and the value formatting shared
//! by the report presenters.

use std::fmt::Display;

use colored::{Color, ColoredString, Colorize};
use glm_quota_core::AlertLevel;
use serde_json::Number;

pub mod report;
#[cfg(feature = "styled")]
pub mod styled;

/// Width of the quota progress bar, in cells
pub const BAR_WIDTH: usize = 20;

/// Output format enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid format: {}. Use 'table' or 'json'", s)),
        }
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{}", message.yellow());
}

/// Print an info message (respects quiet mode)
pub fn print_info(message: &str, quiet: bool) {
    if !quiet {
        println!("{}", message);
    }
}

// ============ Value Formatting ============

/// Format a count with `,` thousands separators
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Format a JSON number as received, grouping digits of non-negative integers
pub fn format_number(value: &Number) -> String {
    match value.as_u64() {
        Some(n) => format_count(n),
        None => value.to_string(),
    }
}

/// Format a percentage exactly as the upstream sent it
pub fn format_percent(value: &Number) -> String {
    format!("{}%", value)
}

/// Number of filled bar cells: floor(width × percentage / 100), kept within the bar
pub fn filled_cells(percentage: f64, width: usize) -> usize {
    let filled = (width as f64 * percentage / 100.0).floor();
    if filled.is_nan() || filled <= 0.0 {
        0
    } else {
        (filled as usize).min(width)
    }
}

/// Block progress bar of `width` cells
pub fn progress_bar(percentage: f64, width: usize) -> String {
    let filled = filled_cells(percentage, width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Terminal colour for an alert level
pub fn alert_color(level: AlertLevel) -> Color {
    match level {
        AlertLevel::Critical => Color::Red,
        AlertLevel::Warning => Color::Yellow,
        AlertLevel::Normal => Color::Green,
    }
}

/// Paint text in the colour of the usage severity
pub fn paint_for_usage(text: &str, percentage: f64) -> ColoredString {
    text.color(alert_color(AlertLevel::from_percentage(percentage)))
}
