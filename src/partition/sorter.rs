//! Stable ordering and key grouping

use super::types::{partition_key_of, OrderedRecords, Partitions};
use crate::error::{Error, Result};
use crate::normalize::coerce_integer;
use crate::types::{JsonValue, RecordSet};

/// Sort a batch ascending by an integer timestamp field.
///
/// The sort is stable. Every record must hold an integer in `field`.
pub fn sort_by_timestamp(set: RecordSet, field: &str) -> Result<RecordSet> {
    let (fields, records) = set.into_parts();

    let mut keyed = records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let value = record.get(field).unwrap_or(&JsonValue::Null);
            let ts = coerce_integer(value).ok_or_else(|| {
                Error::malformed_timestamp(field, format!("record {idx}: not an integer: {value}"))
            })?;
            Ok((ts, record))
        })
        .collect::<Result<Vec<_>>>()?;

    // `sort_by_key` is a stable merge sort
    keyed.sort_by_key(|(ts, _)| *ts);

    Ok(RecordSet::new(
        fields,
        keyed.into_iter().map(|(_, record)| record).collect(),
    ))
}

/// Group a batch by the values of `key`.
///
/// Returns `None` when `key` is not part of the batch schema.
pub fn partition_by(set: &RecordSet, key: &str) -> Option<Partitions> {
    if !set.has_field(key) {
        return None;
    }

    let mut partitions = Partitions::new(key);
    for record in set.records() {
        partitions.push(partition_key_of(record.get(key)), record.clone());
    }
    Some(partitions)
}

/// Orders a batch and fans it out by partition key
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    timestamp_field: Option<String>,
    partition_key: Option<String>,
}

impl Partitioner {
    /// Create a partitioner that neither sorts nor groups
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by this timestamp field
    #[must_use]
    pub fn with_timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.timestamp_field = Some(field.into());
        self
    }

    /// Group by this field when the batch carries it
    #[must_use]
    pub fn with_partition_key(mut self, key: impl Into<String>) -> Self {
        self.partition_key = Some(key.into());
        self
    }

    /// Sort (if configured), then group (if the key is present)
    pub fn order(&self, set: RecordSet) -> Result<OrderedRecords> {
        let set = match &self.timestamp_field {
            Some(field) if !set.is_empty() => sort_by_timestamp(set, field)?,
            _ => set,
        };

        let partitions = match &self.partition_key {
            Some(key) => {
                let partitions = partition_by(&set, key);
                if partitions.is_none() {
                    tracing::info!(
                        key = %key,
                        "Partition key not in result columns; writing a single output"
                    );
                }
                partitions
            }
            None => None,
        };

        if let Some(partitions) = &partitions {
            tracing::debug!(
                key = partitions.key(),
                groups = partitions.len(),
                "Partitioned records"
            );
        }

        Ok(OrderedRecords { set, partitions })
    }
}
