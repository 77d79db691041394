//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Config file used when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.yaml";

/// Load SQL query results into a search index and delimited files
#[derive(Parser, Debug)]
#[command(name = "sqlsink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Pipeline config file (YAML)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Selected command, `run` when none was given
    pub fn command(&self) -> Commands {
        self.command.unwrap_or(Commands::Run)
    }
}

/// CLI subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Run every configured sink
    Run,

    /// Load the index only
    Index,

    /// Write delimited files only
    Export,

    /// Print the index mapping for the query's fields
    Mapping,

    /// Validate the config file
    Validate,
}
