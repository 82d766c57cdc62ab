pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "shutterquote",
    about = "Shutterquote operator CLI",
    long_about = "Apply migrations, inspect configuration, price openings offline, and report on saved quotations.",
    after_help = "Examples:\n  shutterquote migrate\n  shutterquote price openings.json\n  shutterquote report"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Price openings and surcharges from a JSON file, offline")]
    Price {
        #[arg(help = "JSON file with `openings` and optional `surcharges`")]
        file: PathBuf,
    },
    #[command(about = "List saved quotations and monthly revenue as JSON")]
    Report,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Migrate => commands::migrate::run(),
        Command::Config => commands::config::run(),
        Command::Price { file } => commands::price::run(&file),
        Command::Report => commands::report::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
