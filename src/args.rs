//! Shared CLI argument structs for consistent flag definitions across commands.
//!
//! Use `#[command(flatten)]` to include them in command-specific Args structs.

use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

// ============================================================================
// FormatArgs - Output format flags
// ============================================================================

/// Common output format flags.
///
/// Provides consistent --format/-f and --json flags across commands.
/// Use `resolve()` to get the effective format with TTY auto-detection.
#[derive(Args, Clone, Debug, Default)]
pub struct FormatArgs {
    /// Output format (auto-detects TTY for pretty vs plain)
    #[arg(short = 'f', long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Output as JSON (shorthand for --format=json)
    #[arg(long, conflicts_with = "format")]
    pub json: bool,
}

impl FormatArgs {
    /// Resolve the effective output format.
    ///
    /// Handles --json shorthand and applies TTY auto-detection for pretty mode.
    pub fn resolve(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format.resolve()
        }
    }
}

// ============================================================================
// LogArgs - Log location and date overrides
// ============================================================================

/// Global flags that take precedence over BULLETLOG_FILE / BULLETLOG_DATE.
#[derive(Args, Clone, Debug, Default)]
pub struct LogArgs {
    /// Log file path (overrides $BULLETLOG_FILE)
    #[arg(long, value_name = "PATH", global = true)]
    pub file: Option<PathBuf>,

    /// File new entries under this date (overrides $BULLETLOG_DATE)
    #[arg(long, value_name = "YYYYMMDD", global = true)]
    pub date: Option<String>,
}
