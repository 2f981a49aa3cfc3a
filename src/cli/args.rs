use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser)]
#[clap(version, about = "InkWell markdown note-taking application")]
pub struct Cli {
    /// Path to the data directory (defaults to the platform data dir)
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the inkwell application
    #[clap(subcommand)]
    pub command: Commands,
}
