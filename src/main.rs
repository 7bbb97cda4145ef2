mod archive;
mod cli;
mod clipboard;
mod codec;
mod commands;
mod config;
mod daystrip;
mod journal;
mod model;
mod storage;
mod ui;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    let config = config::load()?;
    let command = args.command.unwrap_or(cli::Command::Tui);
    match command {
        cli::Command::Add { text } => commands::add(&config, text),
        cli::Command::List { date } => commands::list(&config, date),
        cli::Command::Days { recent } => commands::days(&config, recent),
        cli::Command::Copy { date, stdout } => commands::copy(&config, date, stdout),
        cli::Command::Archive { line, date } => commands::archive(&config, line, date),
        cli::Command::Restore { line, date } => commands::restore(&config, line, date),
        cli::Command::Tui => commands::tui(&config),
    }
}
