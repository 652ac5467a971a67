//! Argument definitions for the `pnt` binary

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::cli::commands::data::DataCommands;
use crate::cli::commands::pipe::PipeCommands;
use crate::cli::commands::station::StationCommands;
use crate::core::audit::DEFAULT_LOG_FILE;

/// Pipenet Toolkit - manage an inventory of pipe segments and compressor stations
#[derive(Parser, Debug)]
#[command(name = "pnt", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Inventory snapshot the subcommands read and write
    #[arg(long, short = 'f', global = true, default_value = "pipenet.txt")]
    pub file: PathBuf,

    /// Audit trail file
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Disable the audit trail
    #[arg(long, global = true)]
    pub no_log: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage pipe segments
    #[command(subcommand)]
    Pipe(PipeCommands),

    /// Manage compressor stations
    #[command(subcommand)]
    Station(StationCommands),

    /// Save and load inventory snapshots
    #[command(subcommand)]
    Data(DataCommands),

    /// Run the interactive menu (the default when no subcommand is given)
    Menu,
}

/// Output format for list and search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON array, for piping into other tools
    Json,
}
