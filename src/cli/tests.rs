//! Tests for CLI module

use super::*;
use crate::error::Error;
use clap::Parser;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn write_config(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("pipeline.yaml");
    std::fs::write(&path, body).unwrap();
    path
}

#[test]
fn test_defaults_to_run_with_default_config() {
    let cli = Cli::try_parse_from(["sqlsink"]).unwrap();
    assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    assert!(!cli.verbose);
    assert_eq!(cli.command(), Commands::Run);
}

#[test]
fn test_parse_flags_and_subcommand() {
    let cli = Cli::try_parse_from(["sqlsink", "-c", "jobs/tczf.yaml", "-v", "export"]).unwrap();
    assert_eq!(cli.config, PathBuf::from("jobs/tczf.yaml"));
    assert!(cli.verbose);
    assert_eq!(cli.command(), Commands::Export);

    // Global flags may follow the subcommand
    let cli = Cli::try_parse_from(["sqlsink", "mapping", "--config", "a.yaml"]).unwrap();
    assert_eq!(cli.command(), Commands::Mapping);
    assert_eq!(cli.config, PathBuf::from("a.yaml"));
}

#[test]
fn test_rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["sqlsink", "serve"]).is_err());
}

#[tokio::test]
async fn test_validate_command() {
    let dir = tempdir().unwrap();
    let config = write_config(
        dir.path(),
        "source:\n  engine: duckdb\n  sql: \"SELECT 1\"\noutput:\n  path: out.csv\n",
    );

    let cli = Cli::try_parse_from(["sqlsink", "-c", config.to_str().unwrap(), "validate"]).unwrap();
    assert!(Runner::new(cli).run().await.unwrap());
}

#[tokio::test]
async fn test_missing_config_is_an_error() {
    let cli = Cli::try_parse_from(["sqlsink", "-c", "/nonexistent/pipeline.yaml"]).unwrap();
    assert!(matches!(
        Runner::new(cli).run().await,
        Err(Error::Config { .. })
    ));
}

#[tokio::test]
async fn test_export_command_writes_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.tsv");
    std::fs::write(&input, "host_ip\tdisk\n10.0.0.1\t5\n").unwrap();
    let output = dir.path().join("out.csv");

    let config = write_config(
        dir.path(),
        &format!(
            "source:\n  engine: delimited\n  path: {}\noutput:\n  path: {}\n",
            input.display(),
            output.display()
        ),
    );

    let cli = Cli::try_parse_from(["sqlsink", "-c", config.to_str().unwrap(), "export"]).unwrap();
    assert!(Runner::new(cli).run().await.unwrap());
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "host_ip,disk\n10.0.0.1,5\n"
    );
}
