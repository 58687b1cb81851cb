use clap::Args;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::config::Settings;
use crate::error::Error;
use crate::output::{self, OutputFormat};

#[derive(Args)]
pub struct PathArgs {
    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Serialize)]
struct PathOutput {
    path: String,
    path_absolute: String,
    exists: bool,
    source: String,
}

pub fn run(args: PathArgs, settings: &Settings) -> Result<(), Error> {
    let format = args.format.resolve();

    let file = &settings.path;
    let abs_path = file.canonicalize().unwrap_or_else(|_| file.to_path_buf());

    match format {
        OutputFormat::Pretty | OutputFormat::Plain => {
            println!("{}", abs_path.display());
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let out = PathOutput {
                path: file.to_string_lossy().to_string(),
                path_absolute: abs_path.to_string_lossy().to_string(),
                exists: file.exists(),
                source: settings.path_source.to_string(),
            };
            output::print_structured(&out, format)?;
        }
    }

    Ok(())
}
