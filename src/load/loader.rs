//! Bulk loader

use crate::error::Result;
use crate::sink::IndexSink;
use crate::types::{BatchResult, JsonValue, LoadStatus, Record};
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

/// Format of the load time stamped onto records
pub const LOAD_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Copy `records`, adding `field = now` to each record that lacks it.
///
/// An existing value is never overwritten, even when it is null.
pub fn stamp_missing(records: &[Record], field: &str, now: DateTime<Utc>) -> Vec<Record> {
    let stamp = JsonValue::from(now.format(LOAD_TIME_FORMAT).to_string());
    records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if !record.contains_key(field) {
                record.insert(field.to_string(), stamp.clone());
            }
            record
        })
        .collect()
}

/// Submits one batch of records to an index
pub struct BulkLoader<'s> {
    sink: &'s dyn IndexSink,
    index: String,
    timestamp_field: String,
}

impl<'s> BulkLoader<'s> {
    /// Create a loader for `index`, stamping `timestamp_field` where missing
    pub fn new(
        sink: &'s dyn IndexSink,
        index: impl Into<String>,
        timestamp_field: impl Into<String>,
    ) -> Self {
        Self {
            sink,
            index: index.into(),
            timestamp_field: timestamp_field.into(),
        }
    }

    /// Target index
    pub fn index(&self) -> &str {
        &self.index
    }

    /// Stamp and submit the records in one bulk call.
    ///
    /// A failed submission is logged and reported as every record rejected;
    /// it is not returned as an error. Nothing is retried.
    pub async fn load(&self, records: &[Record]) -> Result<BatchResult> {
        let stamped = stamp_missing(records, &self.timestamp_field, Utc::now());

        let result = match self.sink.bulk_write(&self.index, &stamped).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    index = %self.index,
                    records = stamped.len(),
                    error = %e,
                    "Bulk submission failed"
                );
                BatchResult::rejected(stamped.len())
            }
        };

        match result.status() {
            LoadStatus::Success => info!(
                index = %self.index,
                attempted = result.attempted,
                "Bulk load complete"
            ),
            LoadStatus::Partial => warn!(
                index = %self.index,
                attempted = result.attempted,
                succeeded = result.succeeded,
                failed = result.failed(),
                "Bulk load partial"
            ),
        }
        Ok(result)
    }
}
