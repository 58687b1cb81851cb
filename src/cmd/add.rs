use clap::Args;

use crate::config::Settings;
use crate::entry::{Entry, Mark};
use crate::error::Error;
use crate::header;
use crate::input;
use crate::logfile::LogFile;
use crate::rewrite::Placement;

#[derive(Args)]
pub struct AddArgs {
    /// Entry text (words are joined with spaces; read from stdin if omitted)
    text: Vec<String>,
}

pub fn run(args: AddArgs, mark: Mark, settings: &Settings) -> Result<(), Error> {
    let raw = if args.text.is_empty() {
        input::read_stdin()
    } else {
        args.text.join(" ")
    };
    let body = input::single_line(&raw);
    if body.is_empty() {
        let usage = match mark {
            Mark::Task => "usage: blt task \"text\"",
            _ => "usage: blt add \"text\"",
        };
        return Err(Error::Usage(usage.to_string()));
    }

    let log = LogFile::open(&settings.path)?;
    let entry = Entry::new(mark, body);
    let placement = log.add_entry(settings.date, &entry)?;

    if !settings.quiet {
        let kind = if mark == Mark::Task { "task" } else { "note" };
        let date = header::format_date(settings.date);
        match placement {
            Placement::ExistingSection => println!("Added {} to {}", kind, date),
            Placement::NewLog | Placement::NewSection => {
                println!("Added {} to new section {}", kind, date)
            }
        }
    }

    Ok(())
}
