//! Common types used throughout sqlsink
//!
//! This module contains the record model shared by every pipeline stage
//! and the bulk-load accounting type.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// One row of extracted data, keyed by field name.
///
/// Stages never mutate a record in place; each stage builds new records.
pub type Record = serde_json::Map<String, JsonValue>;

/// Placeholder written for null or empty values
pub const NULL_PLACEHOLDER: &str = "NULL";

// ============================================================================
// Record Set
// ============================================================================

/// A batch of records sharing one ordered field list.
///
/// `Record` maps do not remember column order, so the order reported by the
/// query engine is kept here once for the whole batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    fields: Vec<String>,
    records: Vec<Record>,
}

impl RecordSet {
    /// Create a record set from an ordered field list and its records
    pub fn new(fields: Vec<String>, records: Vec<Record>) -> Self {
        Self { fields, records }
    }

    /// Ordered field names
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the batch schema contains a field
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|f| f == name)
    }

    /// The records in batch order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the batch holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Split into the field list and records
    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.fields, self.records)
    }
}

/// Render a value as plain text for keys and delimited output.
///
/// Returns `None` for null and empty strings so callers can substitute a
/// placeholder.
pub fn value_to_text(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::Null => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

// ============================================================================
// Bulk Load Accounting
// ============================================================================

/// Outcome of a bulk load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    /// Number of records submitted
    pub attempted: usize,
    /// Number of records the sink accepted
    pub succeeded: usize,
    /// Batch positions of the records the sink rejected
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_indices: Vec<usize>,
}

impl BatchResult {
    /// Create a result where every attempted record succeeded
    pub fn complete(attempted: usize) -> Self {
        Self {
            attempted,
            succeeded: attempted,
            failed_indices: Vec::new(),
        }
    }

    /// Create a result where nothing was accepted
    pub fn rejected(attempted: usize) -> Self {
        Self {
            attempted,
            succeeded: 0,
            failed_indices: (0..attempted).collect(),
        }
    }

    /// Number of records that were not accepted
    pub fn failed(&self) -> usize {
        self.attempted.saturating_sub(self.succeeded)
    }

    /// Whether every attempted record succeeded
    pub fn is_complete(&self) -> bool {
        self.succeeded == self.attempted
    }

    /// Caller-visible state of the load
    pub fn status(&self) -> LoadStatus {
        if self.is_complete() {
            LoadStatus::Success
        } else {
            LoadStatus::Partial
        }
    }

    /// Fold another chunk's result into this one, offsetting its indices
    pub fn merge(&mut self, other: BatchResult) {
        let offset = self.attempted;
        self.attempted += other.attempted;
        self.succeeded += other.succeeded;
        self.failed_indices
            .extend(other.failed_indices.into_iter().map(|i| i + offset));
    }
}

/// Whether a load fully succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    /// Every record was accepted
    Success,
    /// Some records were rejected; must be reported, never treated as success
    Partial,
}

impl std::fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadStatus::Success => write!(f, "success"),
            LoadStatus::Partial => write!(f, "partial"),
        }
    }
}
