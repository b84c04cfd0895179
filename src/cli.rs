//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TracingFormat {
    Pretty,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "podium", version, about = "Contest aggregation service")]
pub struct Args {
    /// Log output format.
    #[arg(long, value_enum, default_value = "pretty")]
    pub tracing: TracingFormat,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch contests from all sources once and exit.
    Fetch,
    /// Scan configured video playlists and link solutions once, then exit.
    LinkSolutions,
}
