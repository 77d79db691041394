//! Cursor trait and record reader

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record, RecordSet};

/// A query engine cursor.
///
/// Calls are synchronous and may block on the engine.
pub trait QueryCursor {
    /// Run a statement, replacing any previous result
    fn execute(&mut self, sql: &str) -> Result<()>;

    /// Column names of the last result, in order
    fn description(&self) -> &[String];

    /// Take every row of the last result
    fn fetch_all(&mut self) -> Result<Vec<Vec<JsonValue>>>;
}

/// Reads a query result as records
pub struct RecordReader<'a> {
    cursor: &'a mut dyn QueryCursor,
}

impl<'a> RecordReader<'a> {
    /// Create a reader over a cursor
    pub fn new(cursor: &'a mut dyn QueryCursor) -> Self {
        Self { cursor }
    }

    /// Execute `sql` and return a lazy stream of records.
    ///
    /// Rows are fetched before the stream is returned, so a failing query
    /// yields an [`Error::Extraction`] and no records at all.
    pub fn read(&mut self, sql: &str) -> Result<RecordStream> {
        self.cursor.execute(sql).map_err(as_extraction)?;
        let rows = self.cursor.fetch_all().map_err(as_extraction)?;
        let fields = self.cursor.description().to_vec();

        tracing::debug!(columns = fields.len(), rows = rows.len(), "Fetched query result");

        Ok(RecordStream::new(fields, rows))
    }
}

fn as_extraction(err: Error) -> Error {
    match err {
        Error::Extraction { .. } => err,
        other => Error::extraction(other.to_string()),
    }
}

/// Lazily zips column names onto row tuples
pub struct RecordStream {
    fields: Vec<String>,
    rows: std::vec::IntoIter<Vec<JsonValue>>,
}

impl RecordStream {
    /// Create a stream from column names and rows
    pub fn new(fields: Vec<String>, rows: Vec<Vec<JsonValue>>) -> Self {
        Self {
            fields,
            rows: rows.into_iter(),
        }
    }

    /// Column names shared by every record
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Collect the remaining records into a record set
    pub fn into_record_set(self) -> RecordSet {
        let fields = self.fields.clone();
        let records: Vec<Record> = self.collect();
        RecordSet::new(fields, records)
    }
}

impl Iterator for RecordStream {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let row = self.rows.next()?;
        let mut values = row.into_iter();

        // Short rows are padded with nulls, extra values are dropped
        let record = self
            .fields
            .iter()
            .map(|name| (name.clone(), values.next().unwrap_or(JsonValue::Null)))
            .collect();

        Some(record)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for RecordStream {}
