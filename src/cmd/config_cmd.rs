//! Configuration introspection command.
//!
//! Provides `blt config` subcommands:
//! - show: Display resolved settings and where they came from
//! - env: List environment variables

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::{ENV_VARS, LoadedConfig, Settings, user_config_path};
use crate::error::Error;
use crate::header;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show resolved configuration
    Show(ShowArgs),

    /// List environment variables
    Env,
}

#[derive(Args)]
struct ShowArgs {
    /// Show where each value came from
    #[arg(long)]
    effective: bool,
}

#[derive(Serialize)]
struct ResolvedView {
    file: String,
    date: String,
    quiet: bool,
}

pub fn run(args: ConfigArgs, settings: &Settings, loaded: &LoadedConfig) -> Result<(), Error> {
    match args.command {
        ConfigCommand::Show(show_args) => run_show(settings, loaded, show_args.effective),
        ConfigCommand::Env => run_env(),
    }
}

fn run_show(settings: &Settings, loaded: &LoadedConfig, effective: bool) -> Result<(), Error> {
    if effective {
        println!("# Resolved configuration");
        println!("# Config file: {}", loaded.source);
        if let Some(user_path) = user_config_path()
            && !user_path.exists()
        {
            println!("#   (user config can be placed at {})", user_path.display());
        }
        println!();
        println!("file: {}  # {}", settings.path.display(), settings.path_source);
        println!(
            "date: {}  # {}",
            header::format_date(settings.date),
            settings.date_source
        );
        println!("quiet: {}  # {}", settings.quiet, settings.quiet_source);
        return Ok(());
    }

    let view = ResolvedView {
        file: settings.path.to_string_lossy().to_string(),
        date: header::format_date(settings.date),
        quiet: settings.quiet,
    };
    let yaml = serde_yaml::to_string(&view)
        .map_err(|e| Error::Serialize(format!("failed to serialize config: {}", e)))?;
    println!("{}", yaml.trim());
    Ok(())
}

fn run_env() -> Result<(), Error> {
    println!("Environment Variables:");
    println!();

    for var in ENV_VARS {
        println!("  {}", var.name);
        println!("    {}", var.description);
        if let Some(values) = var.values {
            println!("    Values: {}", values);
        }
        println!("    Default: {}", var.default);
        println!();
    }

    Ok(())
}
