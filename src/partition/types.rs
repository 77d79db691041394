//! Partition types

use crate::types::{value_to_text, JsonValue, Record, RecordSet, NULL_PLACEHOLDER};
use indexmap::IndexMap;
use std::fmt;

/// Identity of one partition group.
///
/// Null and empty values form their own group, distinct from a literal
/// `"NULL"` string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PartitionKey {
    /// A rendered, non-empty value
    Value(String),
    /// Null, empty, or missing
    Null,
}

impl PartitionKey {
    /// The rendered value, if not null
    pub fn as_value(&self) -> Option<&str> {
        match self {
            Self::Value(v) => Some(v),
            Self::Null => None,
        }
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.write_str(v),
            Self::Null => f.write_str(NULL_PLACEHOLDER),
        }
    }
}

impl From<&str> for PartitionKey {
    fn from(value: &str) -> Self {
        Self::Value(value.to_string())
    }
}

/// Partition key of a field value
pub fn partition_key_of(value: Option<&JsonValue>) -> PartitionKey {
    value
        .and_then(value_to_text)
        .map_or(PartitionKey::Null, PartitionKey::Value)
}

/// Records grouped by the distinct values of one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partitions {
    /// Field the records were grouped by
    key: String,
    /// Groups in first-seen order
    groups: IndexMap<PartitionKey, Vec<Record>>,
}

impl Partitions {
    /// Create an empty grouping on `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            groups: IndexMap::new(),
        }
    }

    /// Append a record to the group of `value`
    pub fn push(&mut self, value: PartitionKey, record: Record) {
        self.groups.entry(value).or_default().push(record);
    }

    /// Field the records were grouped by
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Number of groups
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Records of one group
    pub fn get(&self, value: &PartitionKey) -> Option<&[Record]> {
        self.groups.get(value).map(Vec::as_slice)
    }

    /// Group values in first-seen order
    pub fn keys(&self) -> impl Iterator<Item = &PartitionKey> {
        self.groups.keys()
    }

    /// Iterate over (value, records) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&PartitionKey, &[Record])> {
        self.groups
            .iter()
            .map(|(value, records)| (value, records.as_slice()))
    }

    /// Total records across all groups
    pub fn total_records(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// A time-ordered batch, plus its partition groups when a key applies
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedRecords {
    /// The whole batch in order
    pub set: RecordSet,
    /// Groups by partition key, if the key is in the batch schema
    pub partitions: Option<Partitions>,
}

impl OrderedRecords {
    /// Whether output fans out into several groups
    pub fn is_partitioned(&self) -> bool {
        self.partitions.is_some()
    }
}
