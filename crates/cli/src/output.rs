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

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Color a health status string
pub fn color_status(status: &str) -> String {
    match status {
        "healthy" => status.green().to_string(),
        "models_not_loaded" => status.red().to_string(),
        _ => status.yellow().to_string(),
    }
}

/// Render a loaded flag as a check mark
pub fn format_loaded(loaded: bool) -> String {
    if loaded {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

/// Render a class label as a risk description
pub fn format_risk(prediction: u8) -> String {
    match prediction {
        1 => "high risk".red().to_string(),
        _ => "low risk".green().to_string(),
    }
}

/// Format a probability with presentation precision
pub fn format_probability(probability: f64) -> String {
    format!("{:.1}%", probability * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.8550), "85.5%");
        assert_eq!(format_probability(1.0), "100.0%");
    }
}
