//! Index sink trait

use crate::error::Result;
use crate::schema::MappingDefinition;
use crate::types::{BatchResult, Record};
use async_trait::async_trait;

/// Document store that holds one schema per index
#[async_trait]
pub trait IndexSink: Send + Sync {
    /// Whether the index exists
    async fn exists(&self, index: &str) -> Result<bool>;

    /// Drop the index and everything in it
    async fn delete_schema(&self, index: &str) -> Result<()>;

    /// Create the index with the given mapping
    async fn create_schema(&self, index: &str, mapping: &MappingDefinition) -> Result<()>;

    /// Submit records for indexing.
    ///
    /// Per-document rejections are reported in the returned [`BatchResult`];
    /// an `Err` means the submission itself failed.
    async fn bulk_write(&self, index: &str, records: &[Record]) -> Result<BatchResult>;
}
