use clap::Args;

use crate::config::Settings;
use crate::error::Error;
use crate::logfile::LogFile;

#[derive(Args)]
pub struct CompleteArgs {
    /// Task index as shown by `blt tasks`
    index: String,
}

/// Parse a user-supplied task index.
pub fn parse_index(input: &str) -> Result<usize, Error> {
    input
        .trim()
        .parse()
        .map_err(|source| Error::InvalidTaskIndex {
            input: input.to_string(),
            source,
        })
}

pub fn run(args: CompleteArgs, settings: &Settings) -> Result<(), Error> {
    // Validate before touching the file
    let index = parse_index(&args.index)?;

    let log = LogFile::open(&settings.path)?;
    if let Some(body) = log.complete_task(index)?
        && !settings.quiet
    {
        println!("Completed task {}: {}", index, body);
    }

    Ok(())
}
