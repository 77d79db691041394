//! Delimited text file cursor
//!
//! Treats a header-first delimited file as a query result. Useful for
//! re-processing exports that were already pulled out of the query engine.

use super::types::QueryCursor;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use std::fs;
use std::path::{Path, PathBuf};

/// Cursor over a delimited file whose first line holds the column names
#[derive(Debug, Clone)]
pub struct DelimitedFileCursor {
    path: PathBuf,
    separator: String,
    columns: Vec<String>,
    pending: Option<Vec<Vec<JsonValue>>>,
}

impl DelimitedFileCursor {
    /// Create a cursor over a tab-separated file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::with_separator(path, "\t")
    }

    /// Create a cursor with a custom separator
    pub fn with_separator(path: impl AsRef<Path>, separator: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            separator: separator.into(),
            columns: Vec::new(),
            pending: None,
        }
    }

    /// File this cursor scans
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn split_fields<'a>(line: &'a str, separator: &'a str) -> impl Iterator<Item = &'a str> + 'a {
    line.trim_end_matches(['\r', '\n']).split(separator)
}

impl QueryCursor for DelimitedFileCursor {
    /// Scan the file. The statement text is ignored.
    fn execute(&mut self, _sql: &str) -> Result<()> {
        let content = fs::read_to_string(&self.path).map_err(|e| {
            Error::extraction(format!("Failed to read '{}': {e}", self.path.display()))
        })?;

        let mut lines = content.lines().filter(|line| !line.trim().is_empty());

        let Some(header) = lines.next() else {
            return Err(Error::extraction(format!(
                "'{}' has no header line",
                self.path.display()
            )));
        };

        let columns: Vec<String> = split_fields(header, &self.separator)
            .map(str::to_string)
            .collect();
        let rows: Vec<Vec<JsonValue>> = lines
            .map(|line| {
                split_fields(line, &self.separator)
                    .map(|field| JsonValue::String(field.to_string()))
                    .collect()
            })
            .collect();

        tracing::debug!(
            path = %self.path.display(),
            columns = columns.len(),
            rows = rows.len(),
            "Scanned delimited file"
        );

        self.columns = columns;
        self.pending = Some(rows);
        Ok(())
    }

    fn description(&self) -> &[String] {
        &self.columns
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<JsonValue>>> {
        self.pending
            .take()
            .ok_or_else(|| Error::extraction("No pending result; execute a query first"))
    }
}
