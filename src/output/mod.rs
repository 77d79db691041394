//! Delimited file output
//!
//! Writes records as separator-joined text lines, one file per partition
//! when the batch is partitioned.
//!
//! # Overview
//!
//! - Optional header line of the selected column names
//! - Null and empty values become a placeholder (`NULL` by default)
//! - Columns may carry a fixed decimal precision
//! - A failed partition file does not stop its siblings

mod types;
mod writer;

pub use types::{ColumnSpec, DelimitedWriterConfig, WriteReport};
pub use writer::{partition_path, DelimitedWriter};

#[cfg(test)]
mod tests;
