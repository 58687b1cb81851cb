use std::io;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::env::CompleteEnv;
use clap_complete::{Shell, generate};

mod args;
mod cmd;
mod config;
mod entry;
mod error;
mod header;
mod input;
mod lines;
mod logfile;
mod output;
mod rewrite;

use crate::entry::Mark;

#[derive(Parser)]
#[command(name = "blt")]
#[command(version = env!("BULLETLOG_VERSION"))]
#[command(about = "Take a log quickly like bullets")]
#[command(
    long_about = "blt - a plain-text log of notes and tasks.\n\nEntries live in one file, grouped under `## YYYYMMDD` day headers with the\nnewest day first. Notes are `* text`, open tasks `- text`, done tasks `x text`."
)]
struct Cli {
    #[command(flatten)]
    log: args::LogArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a note
    #[command(alias = "a", alias = "note")]
    Add(cmd::add::AddArgs),

    /// Add a task
    #[command(alias = "t")]
    Task(cmd::add::AddArgs),

    /// List notes
    #[command(alias = "ls")]
    Notes(cmd::list::ListArgs),

    /// List open tasks with their index
    #[command(alias = "ts")]
    Tasks(cmd::list::ListArgs),

    /// Complete task
    #[command(alias = "comp")]
    Complete(cmd::complete::CompleteArgs),

    /// Check the log's structure
    Validate(cmd::validate::ValidateArgs),

    /// Print the log file path
    Path(cmd::path::PathArgs),

    /// Configuration introspection
    Config(cmd::config_cmd::ConfigArgs),

    /// Generate shell completion script
    Completion(CompletionArgs),
}

#[derive(clap::Args)]
struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Clone, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn main() {
    // Handle dynamic shell completions
    CompleteEnv::with_factory(Cli::command).complete();

    env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(config::ENV_LOG, "warn"),
    )
    .format_timestamp(None)
    .init();

    // Use try_parse to catch errors and normalize exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // Exit with 0 for help/version, 1 for actual errors
            let exit_code = if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                0
            } else {
                1
            };
            process::exit(exit_code);
        }
    };

    // Handle completion before settings resolution (doesn't need the log)
    if let Commands::Completion(args) = &cli.command {
        let shell = match args.shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
        };
        generate(shell, &mut Cli::command(), "blt", &mut io::stdout());
        return;
    }

    let loaded = config::load_config();
    let settings = match config::Settings::resolve(cli.log.file, cli.log.date, &loaded) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(e.exit_code());
        }
    };
    log::debug!("settings: {:?}", settings);

    let result = match cli.command {
        Commands::Add(args) => cmd::add::run(args, Mark::Note, &settings),
        Commands::Task(args) => cmd::add::run(args, Mark::Task, &settings),
        Commands::Notes(args) => cmd::list::run(args, cmd::list::Listing::Notes, &settings),
        Commands::Tasks(args) => cmd::list::run(args, cmd::list::Listing::Tasks, &settings),
        Commands::Complete(args) => cmd::complete::run(args, &settings),
        Commands::Validate(args) => cmd::validate::run(args, &settings),
        Commands::Path(args) => cmd::path::run(args, &settings),
        Commands::Config(args) => cmd::config_cmd::run(args, &settings, &loaded),
        Commands::Completion(_) => unreachable!(), // Handled above
    };

    if let Err(e) = result {
        log::debug!("{:?}", e);
        eprintln!("{}", e);
        process::exit(e.exit_code());
    }
}
