//! Delimited file writer

use super::types::{ColumnSpec, DelimitedWriterConfig, WriteReport};
use crate::error::{Error, Result};
use crate::partition::{PartitionKey, Partitions};
use crate::types::{value_to_text, JsonValue, Record};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Path of one partition's file.
///
/// `out/tczf.csv` with key `10.0.0.1` becomes `out/tczf_10.0.0.1.csv`.
/// Path separators and `:` in the key are replaced with `_`.
pub fn partition_path(base: &Path, key: &str) -> PathBuf {
    let sanitized = key.replace(['/', '\\', ':'], "_");
    let stem = base
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    let file_name = match base.extension() {
        Some(ext) => format!("{stem}_{sanitized}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{sanitized}"),
    };
    base.with_file_name(file_name)
}

fn label(key: &PartitionKey) -> String {
    match key.as_value() {
        Some(v) => format!("'{v}'"),
        None => "of null values".to_string(),
    }
}

/// Writes records as delimited text
#[derive(Debug, Clone, Default)]
pub struct DelimitedWriter {
    config: DelimitedWriterConfig,
}

impl DelimitedWriter {
    /// Create a writer
    pub fn new(config: DelimitedWriterConfig) -> Self {
        Self { config }
    }

    /// Writer settings
    pub fn config(&self) -> &DelimitedWriterConfig {
        &self.config
    }

    /// Write one file and return the number of records written.
    ///
    /// Any failure is reported as [`Error::SinkWrite`] for `path`. The file
    /// is flushed and closed before returning.
    pub fn write_file(&self, path: &Path, fields: &[String], records: &[Record]) -> Result<usize> {
        let target = path.display().to_string();
        let columns = self.columns(fields);

        self.write_lines(path, &columns, records)
            .map_err(|e| match e {
                Error::SinkWrite { .. } => e,
                other => Error::sink_write(&target, other.to_string()),
            })?;

        debug!(path = %target, records = records.len(), "Wrote delimited file");
        Ok(records.len())
    }

    /// Write one file per partition next to `base`.
    ///
    /// Each file succeeds or fails on its own; the report lists both. A group
    /// whose file name collides with an earlier group's is failed rather than
    /// written over it.
    pub fn write_partitions(
        &self,
        base: &Path,
        fields: &[String],
        partitions: &Partitions,
    ) -> WriteReport {
        let mut report = WriteReport::default();
        let mut claimed: HashMap<PathBuf, &PartitionKey> = HashMap::new();

        for (key, records) in partitions.iter() {
            let path = partition_path(base, &key.to_string());

            if let Some(owner) = claimed.get(&path) {
                let e = Error::sink_write(
                    path.display().to_string(),
                    format!(
                        "partition {} maps to the same file as partition {}; \
                         {} records not written",
                        label(key),
                        label(owner),
                        records.len()
                    ),
                );
                error!(partition = %key, error = %e, "Partition file failed");
                report.failed.push((path, e));
                continue;
            }
            claimed.insert(path.clone(), key);

            match self.write_file(&path, fields, records) {
                Ok(count) => report.written.push((path, count)),
                Err(e) => {
                    error!(partition = %key, error = %e, "Partition file failed");
                    report.failed.push((path, e));
                }
            }
        }

        info!(
            files = report.written.len(),
            failed = report.failed.len(),
            records = report.records_written(),
            "Partition files written"
        );
        report
    }

    fn columns(&self, fields: &[String]) -> Vec<ColumnSpec> {
        if self.config.columns.is_empty() {
            fields.iter().map(|f| ColumnSpec::name(f.as_str())).collect()
        } else {
            self.config.columns.clone()
        }
    }

    fn write_lines(&self, path: &Path, columns: &[ColumnSpec], records: &[Record]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut out = BufWriter::new(File::create(path)?);
        let separator = self.config.separator.as_str();

        if self.config.header {
            let names: Vec<&str> = columns.iter().map(ColumnSpec::field).collect();
            writeln!(out, "{}", names.join(separator))?;
        }

        let mut line = Vec::with_capacity(columns.len());
        for (position, record) in records.iter().enumerate() {
            line.clear();
            for column in columns {
                let value = record.get(column.field()).unwrap_or(&JsonValue::Null);
                let text = self.render(column, value).map_err(|message| {
                    Error::sink_write(
                        path.display().to_string(),
                        format!("record {position}: {message}"),
                    )
                })?;
                line.push(text);
            }
            writeln!(out, "{}", line.join(separator))?;
        }

        out.flush()?;
        Ok(())
    }

    fn render(&self, column: &ColumnSpec, value: &JsonValue) -> std::result::Result<String, String> {
        let Some(text) = value_to_text(value) else {
            return Ok(self.config.null_placeholder.clone());
        };

        let Some(precision) = column.precision() else {
            return Ok(text);
        };

        let number = match value {
            JsonValue::Number(n) => n.as_f64(),
            _ => text.trim().parse::<f64>().ok(),
        };
        number
            .map(|n| format!("{n:.precision$}"))
            .ok_or_else(|| format!("field '{}' is not numeric: {text}", column.field()))
    }
}
