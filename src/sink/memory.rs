//! In-process index sink used by unit tests

use super::types::IndexSink;
use crate::error::{Error, Result};
use crate::schema::MappingDefinition;
use crate::types::{BatchResult, Record};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryIndex {
    mapping: MappingDefinition,
    documents: Vec<Record>,
}

/// Index sink that keeps everything in memory.
///
/// It can be told to reject the last `n` documents of every bulk write, to
/// fail schema creation, or to fail bulk submission outright.
#[derive(Debug, Default)]
pub(crate) struct MemorySink {
    indices: Mutex<HashMap<String, MemoryIndex>>,
    reject_per_write: usize,
    fail_create: bool,
    fail_bulk: bool,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an index that already exists
    #[must_use]
    pub fn with_index(self, index: &str, mapping: MappingDefinition) -> Self {
        self.lock().insert(
            index.to_string(),
            MemoryIndex {
                mapping,
                documents: Vec::new(),
            },
        );
        self
    }

    /// Reject the last `count` documents of each bulk write
    #[must_use]
    pub fn rejecting(mut self, count: usize) -> Self {
        self.reject_per_write = count;
        self
    }

    /// Fail every schema creation
    #[must_use]
    pub fn failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Fail every bulk submission
    #[must_use]
    pub fn failing_bulk(mut self) -> Self {
        self.fail_bulk = true;
        self
    }

    /// Current mapping of an index
    pub fn mapping(&self, index: &str) -> Option<MappingDefinition> {
        self.lock().get(index).map(|i| i.mapping.clone())
    }

    /// Accepted documents of an index
    pub fn documents(&self, index: &str) -> Vec<Record> {
        self.lock()
            .get(index)
            .map(|i| i.documents.clone())
            .unwrap_or_default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, MemoryIndex>> {
        self.indices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IndexSink for MemorySink {
    async fn exists(&self, index: &str) -> Result<bool> {
        Ok(self.lock().contains_key(index))
    }

    async fn delete_schema(&self, index: &str) -> Result<()> {
        self.lock()
            .remove(index)
            .map(|_| ())
            .ok_or_else(|| Error::sink(format!("no such index: {index}")))
    }

    async fn create_schema(&self, index: &str, mapping: &MappingDefinition) -> Result<()> {
        if self.fail_create {
            return Err(Error::sink(format!("refusing to create index {index}")));
        }
        let mut indices = self.lock();
        if indices.contains_key(index) {
            return Err(Error::sink(format!("index already exists: {index}")));
        }
        indices.insert(
            index.to_string(),
            MemoryIndex {
                mapping: mapping.clone(),
                documents: Vec::new(),
            },
        );
        Ok(())
    }

    async fn bulk_write(&self, index: &str, records: &[Record]) -> Result<BatchResult> {
        if self.fail_bulk {
            return Err(Error::sink("bulk submission refused"));
        }

        let accepted = records.len().saturating_sub(self.reject_per_write);
        self.lock()
            .entry(index.to_string())
            .or_default()
            .documents
            .extend_from_slice(&records[..accepted]);

        Ok(BatchResult {
            attempted: records.len(),
            succeeded: accepted,
            failed_indices: (accepted..records.len()).collect(),
        })
    }
}
