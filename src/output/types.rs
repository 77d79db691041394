//! Output types

use crate::error::Error;
use crate::types::NULL_PLACEHOLDER;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_separator() -> String {
    ",".to_string()
}

fn default_header() -> bool {
    true
}

fn default_null_placeholder() -> String {
    NULL_PLACEHOLDER.to_string()
}

/// A selected output column.
///
/// Written in config either as a bare name or as `{name, precision}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    /// Column written as-is
    Name(String),
    /// Column with optional formatting
    Detailed {
        /// Field name
        name: String,
        /// Decimal places for numeric rendering
        #[serde(default)]
        precision: Option<usize>,
    },
}

impl ColumnSpec {
    /// Plain column
    pub fn name(name: impl Into<String>) -> Self {
        ColumnSpec::Name(name.into())
    }

    /// Column rendered with a fixed number of decimals
    pub fn with_precision(name: impl Into<String>, precision: usize) -> Self {
        ColumnSpec::Detailed {
            name: name.into(),
            precision: Some(precision),
        }
    }

    /// Field name
    pub fn field(&self) -> &str {
        match self {
            ColumnSpec::Name(name) | ColumnSpec::Detailed { name, .. } => name,
        }
    }

    /// Decimal places, if fixed
    pub fn precision(&self) -> Option<usize> {
        match self {
            ColumnSpec::Name(_) => None,
            ColumnSpec::Detailed { precision, .. } => *precision,
        }
    }
}

impl From<&str> for ColumnSpec {
    fn from(name: &str) -> Self {
        ColumnSpec::name(name)
    }
}

/// Delimited writer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimitedWriterConfig {
    /// Value separator
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Write a header line
    #[serde(default = "default_header")]
    pub header: bool,

    /// Text written for null or empty values
    #[serde(default = "default_null_placeholder")]
    pub null_placeholder: String,

    /// Selected columns; empty means every field in query order
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

impl Default for DelimitedWriterConfig {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            header: default_header(),
            null_placeholder: default_null_placeholder(),
            columns: Vec::new(),
        }
    }
}

impl DelimitedWriterConfig {
    /// Set the separator
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Toggle the header line
    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Set the null placeholder
    #[must_use]
    pub fn with_null_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.null_placeholder = placeholder.into();
        self
    }

    /// Select columns
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<ColumnSpec>) -> Self {
        self.columns = columns;
        self
    }
}

/// Outcome of writing a set of files
#[derive(Debug, Default)]
pub struct WriteReport {
    /// Files written, with their record counts
    pub written: Vec<(PathBuf, usize)>,
    /// Files that failed, with the error for each
    pub failed: Vec<(PathBuf, Error)>,
}

impl WriteReport {
    /// Whether every target was written
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Total records written across all files
    pub fn records_written(&self) -> usize {
        self.written.iter().map(|(_, n)| n).sum()
    }
}
