//! Extraction module
//!
//! Turns a query result cursor into uniform records.
//!
//! # Overview
//!
//! A [`QueryCursor`] runs a statement and exposes ordered column names plus
//! row tuples. [`RecordReader`] zips the two into [`Record`](crate::types::Record)s.
//! Two cursors ship with the crate:
//! - [`DuckDbCursor`] - embedded DuckDB (files, `:memory:`, or attached databases)
//! - [`DelimitedFileCursor`] - a header-first delimited text file

mod delimited;
mod duckdb_cursor;
mod types;

pub use delimited::DelimitedFileCursor;
pub use duckdb_cursor::DuckDbCursor;
pub use types::{QueryCursor, RecordReader, RecordStream};
