//! Pipeline configuration
//!
//! A pipeline is described by one YAML file: where records come from, how
//! their timestamp is derived, and which sinks receive them.

use crate::error::{Error, Result};
use crate::normalize::TimestampConfig;
use crate::output::DelimitedWriterConfig;
use crate::schema::{validate_index_name, RESERVED_TIMESTAMP_FIELD};
use crate::sink::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Top-Level Pipeline Config
// ============================================================================

/// Complete pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Record source
    pub source: SourceConfig,

    /// Timestamp normalization; when absent records keep query order
    #[serde(default)]
    pub timestamp: Option<TimestampConfig>,

    /// Field whose values split the file output
    #[serde(default)]
    pub partition_key: Option<String>,

    /// Index sink
    #[serde(default)]
    pub index: Option<IndexConfig>,

    /// Delimited file sink
    #[serde(default)]
    pub output: Option<OutputConfig>,
}

// ============================================================================
// Source
// ============================================================================

/// Where records are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "lowercase")]
pub enum SourceConfig {
    /// SQL against a DuckDB database
    Duckdb {
        /// Database file, or `:memory:`
        #[serde(default = "default_database")]
        database: String,

        /// Statements run before the query (ATTACH, INSTALL, LOAD...)
        #[serde(default)]
        setup: Vec<String>,

        /// Query producing the records
        sql: String,
    },

    /// A delimited text file with a header line
    Delimited {
        /// File to read
        path: PathBuf,

        /// Value separator
        #[serde(default = "default_source_separator")]
        separator: String,
    },
}

fn default_database() -> String {
    ":memory:".to_string()
}

fn default_source_separator() -> String {
    "\t".to_string()
}

impl SourceConfig {
    /// Query text handed to the cursor
    pub fn sql(&self) -> &str {
        match self {
            SourceConfig::Duckdb { sql, .. } => sql,
            SourceConfig::Delimited { .. } => "",
        }
    }
}

// ============================================================================
// Index Sink
// ============================================================================

/// Index sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Cluster base URL
    pub url: String,

    /// Index name
    pub name: String,

    /// Legacy document type
    #[serde(default)]
    pub doc_type: Option<String>,

    /// Drop and recreate an existing index
    #[serde(default)]
    pub delete_mode: bool,

    /// Field stamped with the load time when missing
    #[serde(default = "default_timestamp_field")]
    pub timestamp_field: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Documents per bulk request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

fn default_timestamp_field() -> String {
    RESERVED_TIMESTAMP_FIELD.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl IndexConfig {
    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// File Sink
// ============================================================================

/// Delimited file sink settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output file; partitioned runs derive one file per key from it
    pub path: PathBuf,

    /// Formatting
    #[serde(flatten)]
    pub writer: DelimitedWriterConfig,
}

// ============================================================================
// Loading
// ============================================================================

/// Load and validate a pipeline config file
pub fn load_config(path: impl AsRef<Path>) -> Result<PipelineConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read config file '{}': {e}",
            path.display()
        ))
    })?;
    load_config_from_str(&content)
}

/// Parse and validate a pipeline config from YAML text
pub fn load_config_from_str(yaml: &str) -> Result<PipelineConfig> {
    let config: PipelineConfig = serde_yaml::from_str(yaml)?;
    validate_config(&config)?;
    Ok(config)
}

/// Check a parsed config for values serde cannot rule out
pub fn validate_config(config: &PipelineConfig) -> Result<()> {
    match &config.source {
        SourceConfig::Duckdb { sql, .. } if sql.trim().is_empty() => {
            return Err(Error::invalid_value("source.sql", "cannot be empty"));
        }
        SourceConfig::Delimited { separator, .. } if separator.is_empty() => {
            return Err(Error::invalid_value("source.separator", "cannot be empty"));
        }
        _ => {}
    }

    if config.index.is_none() && config.output.is_none() {
        return Err(Error::config(
            "At least one sink is required: configure 'index', 'output', or both",
        ));
    }

    if let Some(key) = &config.partition_key {
        if key.is_empty() {
            return Err(Error::invalid_value("partition_key", "cannot be empty"));
        }
    }

    if let Some(index) = &config.index {
        url::Url::parse(&index.url)
            .map_err(|e| Error::invalid_value("index.url", e.to_string()))?;
        validate_index_name(&index.name)?;
        if index.timestamp_field.is_empty() {
            return Err(Error::invalid_value("index.timestamp_field", "cannot be empty"));
        }
        if index.timeout_secs == 0 {
            return Err(Error::invalid_value("index.timeout_secs", "must be positive"));
        }
        if index.chunk_size == 0 {
            return Err(Error::invalid_value("index.chunk_size", "must be positive"));
        }
    }

    if let Some(output) = &config.output {
        if output.path.as_os_str().is_empty() {
            return Err(Error::missing_field("output.path"));
        }
        if output.writer.separator.is_empty() {
            return Err(Error::invalid_value("output.separator", "cannot be empty"));
        }
        if output.writer.columns.iter().any(|c| c.field().is_empty()) {
            return Err(Error::invalid_value("output.columns", "column names cannot be empty"));
        }
    }

    Ok(())
}
