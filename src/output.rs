//! Output formatting utilities with TTY auto-detection and semantic styling.

use std::io::IsTerminal;

use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use serde::Serialize;

use crate::entry::Mark;
use crate::error::Error;

/// Output format for commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-optimized: colors, tables
    #[default]
    Pretty,
    /// Script-friendly: the bare log lines, no colors
    Plain,
    /// Machine-readable JSON
    Json,
    /// Machine-readable YAML
    Yaml,
}

impl OutputFormat {
    /// Resolve the output format, applying TTY auto-detection.
    ///
    /// If format is Pretty but stdout is not a TTY, returns Plain.
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Pretty if !std::io::stdout().is_terminal() => OutputFormat::Plain,
            other => other,
        }
    }
}

/// Print a value as pretty JSON or YAML.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<(), Error> {
    match format {
        OutputFormat::Yaml => {
            let yaml = serde_yaml::to_string(value)
                .map_err(|e| Error::Serialize(format!("YAML serialization failed: {}", e)))?;
            print!("{}", yaml);
        }
        _ => {
            let json = serde_json::to_string_pretty(value)
                .map_err(|e| Error::Serialize(format!("JSON serialization failed: {}", e)))?;
            println!("{}", json);
        }
    }
    Ok(())
}

// ============================================================================
// Semantic Styling
// ============================================================================

/// Mark colors.
/// - Cyan: notes
/// - Yellow: pending tasks
/// - Dimmed: completed tasks
pub fn style_mark(mark: Mark) -> ColoredString {
    let symbol = mark.symbol().to_string();
    match mark {
        Mark::Note => symbol.cyan(),
        Mark::Task => symbol.yellow().bold(),
        Mark::Done => symbol.dimmed(),
    }
}

/// Style for section dates - always dimmed.
pub fn style_date(date: &str) -> ColoredString {
    date.dimmed()
}

// ============================================================================
// Terminal utilities
// ============================================================================

/// Get terminal width, defaulting to 80 if unavailable.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Truncate a string from the back, showing "prefix…".
pub fn truncate_back(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 1).collect();
        format!("{}…", truncated)
    }
}
