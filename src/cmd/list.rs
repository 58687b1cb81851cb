use clap::Args;
use colored::Colorize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::args::FormatArgs;
use crate::config::Settings;
use crate::entry::Mark;
use crate::error::Error;
use crate::logfile::{LogFile, LoggedEntry};
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    format: FormatArgs,
}

/// Which entries a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing {
    Notes,
    Tasks,
}

pub fn run(args: ListArgs, listing: Listing, settings: &Settings) -> Result<(), Error> {
    let format = args.format.resolve();
    let log = LogFile::open(&settings.path)?;

    let entries = match listing {
        Listing::Notes => log.notes()?,
        Listing::Tasks => log.pending_tasks()?,
    };

    match format {
        OutputFormat::Pretty => output_pretty(&entries, listing),
        OutputFormat::Plain => {
            for line in plain_lines(&entries, listing) {
                println!("{}", line);
            }
            Ok(())
        }
        OutputFormat::Json | OutputFormat::Yaml => output::print_structured(&entries, format),
    }
}

/// Plain listing lines: `* body` for notes, `<index>: body` for tasks.
pub fn plain_lines(entries: &[LoggedEntry], listing: Listing) -> Vec<String> {
    entries
        .iter()
        .map(|e| match (listing, e.index) {
            (Listing::Tasks, Some(index)) => format!("{}: {}", index, e.body),
            _ => format!("{}{}", e.mark.prefix(), e.body),
        })
        .collect()
}

/// Row data for tabled output
#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "#")]
    index: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = " ")]
    mark: String,
    #[tabled(rename = "TEXT")]
    body: String,
}

fn output_pretty(entries: &[LoggedEntry], listing: Listing) -> Result<(), Error> {
    let noun = match listing {
        Listing::Notes => "notes",
        Listing::Tasks => "open tasks",
    };
    println!("{} {}", entries.len().to_string().bold(), noun);

    if entries.is_empty() {
        return Ok(());
    }
    println!();

    let body_max = output::terminal_width().saturating_sub(30).max(20);
    let rows: Vec<TableRow> = entries
        .iter()
        .map(|e| TableRow {
            index: e.index.map(|i| i.to_string()).unwrap_or_default(),
            date: e
                .date
                .as_deref()
                .map(|d| output::style_date(d).to_string())
                .unwrap_or_default(),
            mark: output::style_mark(e.mark).to_string(),
            body: output::truncate_back(&e.body, body_max),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{}", table);

    if listing == Listing::Tasks {
        println!();
        println!(
            "{}",
            format!("Complete with: blt complete <#>  ({} marks done)", Mark::Done).dimmed()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(mark: Mark, body: &str, index: Option<usize>) -> LoggedEntry {
        LoggedEntry {
            date: Some("20240101".to_string()),
            mark,
            body: body.to_string(),
            index,
            line: 1,
        }
    }

    #[test]
    fn test_plain_notes_keep_mark() {
        let entries = vec![entry(Mark::Note, "buy milk", None)];
        assert_eq!(plain_lines(&entries, Listing::Notes), vec!["* buy milk"]);
    }

    #[test]
    fn test_plain_tasks_show_index() {
        let entries = vec![
            entry(Mark::Task, "first", Some(0)),
            entry(Mark::Task, "second", Some(1)),
        ];
        assert_eq!(
            plain_lines(&entries, Listing::Tasks),
            vec!["0: first", "1: second"]
        );
    }
}
