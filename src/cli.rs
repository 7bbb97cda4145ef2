use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "daybook", version, about = "Daily markdown task journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Append an item to today's journal
    Add {
        /// Item text; reads the clipboard when omitted
        text: Option<String>,
    },
    /// List a day's items
    List {
        /// Day to list (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show per-day item counts
    Days {
        /// Only the most recent N days
        #[arg(long)]
        recent: Option<usize>,
    },
    /// Copy a day's items as a markdown checklist
    Copy {
        /// Day to copy (defaults to today)
        #[arg(long)]
        date: Option<String>,
        /// Print to stdout instead of the clipboard
        #[arg(long)]
        stdout: bool,
    },
    /// Move an active line of a day file below its `## Archived` heading
    Archive {
        /// Zero-based position in the rendered active list
        line: usize,
        /// Day file to edit (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Move an archived line back into the active list
    Restore {
        /// Zero-based position in the archived list
        line: usize,
        /// Day file to edit (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Launch the interactive TUI
    Tui,
}
