//! CLI module
//!
//! Command-line interface for running pipelines.
//!
//! # Commands
//!
//! - `run` - Feed every configured sink (default)
//! - `index` - Feed the index sink only
//! - `export` - Write delimited files only
//! - `mapping` - Print the index mapping the query would produce
//! - `validate` - Check the config file

mod commands;
mod runner;

pub use commands::{Cli, Commands, DEFAULT_CONFIG_PATH};
pub use runner::Runner;

#[cfg(test)]
mod tests;
