//! Search CLI command.

use clap::Parser;

/// Search wines.
#[derive(Debug, Parser)]
pub struct SearchCommand {
    /// Words to search for; every word must match.
    pub words: Vec<String>,

    /// Read one search per line from stdin; each line supersedes the last.
    #[arg(long, short)]
    pub interactive: bool,

    /// Skip looking up where each result is stored.
    #[arg(long)]
    pub no_locate: bool,
}

impl SearchCommand {
    /// The search phrase given on the command line.
    pub fn phrase(&self) -> String {
        self.words.join(" ")
    }
}
