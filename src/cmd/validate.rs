use std::io::BufRead;
use std::sync::LazyLock;

use chrono::NaiveDate;
use clap::Args;
use colored::Colorize;
use regex::Regex;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::config::Settings;
use crate::entry::Mark;
use crate::error::Error;
use crate::header::{self, HEADER_MARKER};
use crate::lines;
use crate::logfile::LogFile;
use crate::output::{self, OutputFormat};

/// Mark-like line that is missing the space, indented, or uses a capital X
static MALFORMED_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s+[*\-xX]\s|[*\-xX][^\s]|X\s)").unwrap());

/// Issue code descriptions
fn issue_description(code: &str) -> &'static str {
    match code {
        "E001" => "First line is not a section header",
        "E002" => "Malformed section header",
        "W001" => "Section out of order",
        "W002" => "Malformed entry mark",
        "W003" => "Unrecognized line",
        "W004" => "Invalid UTF-8",
        _ => "Unknown issue",
    }
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Show issue descriptions
    #[arg(short = 'v', long)]
    verbose: bool,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub line: usize,
    pub severity: Severity,
    pub code: String,
    pub message: String,
}

impl Issue {
    fn error_at(code: &str, line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Error,
            code: code.to_string(),
            message: message.into(),
        }
    }

    fn warning_at(code: &str, line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            severity: Severity::Warning,
            code: code.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    pub path: String,
    pub sections: usize,
    pub entries: usize,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<Issue>,
}

/// Check a log stream's structure.
pub fn validate_log<R: BufRead>(mut reader: R, path: &str) -> Result<ValidationSummary, Error> {
    let mut issues = Vec::new();
    let mut sections = 0;
    let mut entries = 0;
    let mut previous: Option<NaiveDate> = None;
    let mut buf = Vec::new();
    let mut n = 0;

    while lines::read_line(&mut reader, &mut buf)? {
        n += 1;
        let line = lines::lossy(&buf);
        if std::str::from_utf8(&buf).is_err() {
            issues.push(Issue::warning_at("W004", n, "line is not valid UTF-8"));
        }

        match header::parse_header(&line) {
            Ok(date) => {
                sections += 1;
                if let Some(prev) = previous
                    && date >= prev
                {
                    issues.push(Issue::warning_at(
                        "W001",
                        n,
                        format!(
                            "section {} is not older than {}",
                            header::format_date(date),
                            header::format_date(prev)
                        ),
                    ));
                }
                previous = Some(date);
                continue;
            }
            Err(e) if n == 1 => {
                issues.push(Issue::error_at("E001", n, e.to_string()));
            }
            Err(e) if line.starts_with(HEADER_MARKER) => {
                issues.push(Issue::error_at("E002", n, e.to_string()));
                continue;
            }
            Err(_) => {}
        }

        if Mark::split_line(&line).is_some() {
            entries += 1;
        } else if MALFORMED_MARK_RE.is_match(&line) {
            issues.push(Issue::warning_at(
                "W002",
                n,
                format!("expected one of '* ', '- ', 'x ': {:?}", line),
            ));
        } else if !line.trim().is_empty() && n > 1 {
            issues.push(Issue::warning_at("W003", n, format!("{:?}", line)));
        }
    }

    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    let warnings = issues.len() - errors;

    Ok(ValidationSummary {
        path: path.to_string(),
        sections,
        entries,
        errors,
        warnings,
        issues,
    })
}

pub fn run(args: ValidateArgs, settings: &Settings) -> Result<(), Error> {
    let format = args.format.resolve();
    let log = LogFile::open(&settings.path)?;
    let summary = validate_log(log.reader()?, &settings.path.to_string_lossy())?;

    match format {
        OutputFormat::Pretty => output_pretty(&summary, args.verbose),
        OutputFormat::Plain => output_plain(&summary, args.verbose),
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(&summary, format)?,
    }

    if summary.errors > 0 {
        return Err(Error::Invalid(summary.errors));
    }
    Ok(())
}

fn output_pretty(summary: &ValidationSummary, verbose: bool) {
    for issue in &summary.issues {
        let label = match issue.severity {
            Severity::Error => format!("{} {}", issue.code, issue.severity).red().bold(),
            Severity::Warning => format!("{} {}", issue.code, issue.severity).yellow(),
        };
        println!(
            "{}:{}: {}: {}",
            summary.path.dimmed(),
            issue.line,
            label,
            issue.message
        );
        if verbose {
            println!("    {}", issue_description(&issue.code).dimmed());
        }
    }

    let status = if summary.errors > 0 {
        "invalid".red().bold()
    } else {
        "ok".green().bold()
    };
    println!(
        "{}: {} sections, {} entries, {} errors, {} warnings",
        status, summary.sections, summary.entries, summary.errors, summary.warnings
    );
}

fn output_plain(summary: &ValidationSummary, verbose: bool) {
    for issue in &summary.issues {
        println!(
            "{}:{}: {} {}: {}",
            summary.path, issue.line, issue.code, issue.severity, issue.message
        );
        if verbose {
            println!("    {}", issue_description(&issue.code));
        }
    }
    println!(
        "{}: {} sections, {} entries, {} errors, {} warnings",
        if summary.errors > 0 { "invalid" } else { "ok" },
        summary.sections,
        summary.entries,
        summary.errors,
        summary.warnings
    );
}
