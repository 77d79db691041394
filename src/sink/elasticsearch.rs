//! Elasticsearch REST sink

use super::types::IndexSink;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, RequestConfig};
use crate::schema::MappingDefinition;
use crate::types::{BatchResult, JsonValue, Record};
use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// Documents per `_bulk` request unless configured otherwise
pub const DEFAULT_CHUNK_SIZE: usize = 500;

const NDJSON: &str = "application/x-ndjson";

/// Index sink backed by the Elasticsearch REST API
#[derive(Debug)]
pub struct ElasticsearchSink {
    client: HttpClient,
    doc_type: Option<String>,
    chunk_size: usize,
}

impl ElasticsearchSink {
    /// Connect to a cluster at `url` with a request timeout
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let config = HttpClientConfig::builder()
            .base_url(url)
            .timeout(timeout)
            .build();
        Ok(Self::from_client(HttpClient::with_config(config)?))
    }

    /// Wrap an already configured client
    pub fn from_client(client: HttpClient) -> Self {
        Self {
            client,
            doc_type: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    /// Use a legacy document type for mappings and bulk actions
    #[must_use]
    pub fn with_doc_type(mut self, doc_type: Option<String>) -> Self {
        self.doc_type = doc_type;
        self
    }

    /// Set how many documents go into one `_bulk` request
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Legacy document type, if any
    pub fn doc_type(&self) -> Option<&str> {
        self.doc_type.as_deref()
    }

    /// Documents per `_bulk` request
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Render one `_bulk` request body
    fn bulk_body(&self, index: &str, records: &[Record]) -> Result<String> {
        let mut action = serde_json::Map::new();
        action.insert("_index".to_string(), JsonValue::from(index));
        if let Some(doc_type) = &self.doc_type {
            action.insert("_type".to_string(), JsonValue::from(doc_type.as_str()));
        }
        let action_line = serde_json::to_string(&serde_json::json!({ "index": action }))?;

        let mut body = String::new();
        for record in records {
            body.push_str(&action_line);
            body.push('\n');
            body.push_str(&serde_json::to_string(record)?);
            body.push('\n');
        }
        Ok(body)
    }

    async fn bulk_chunk(&self, index: &str, records: &[Record]) -> Result<BatchResult> {
        let body = self.bulk_body(index, records)?;
        let response: JsonValue = self
            .client
            .request_json(Method::POST, "/_bulk", RequestConfig::new().text(NDJSON, body))
            .await?;
        Ok(count_bulk_items(&response, records.len()))
    }
}

/// Tally per-item statuses of a `_bulk` response.
///
/// Items the response does not account for count as failed.
pub(crate) fn count_bulk_items(response: &JsonValue, attempted: usize) -> BatchResult {
    let items = response
        .get("items")
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let mut failed_indices = Vec::new();
    for position in 0..attempted {
        let accepted = items
            .get(position)
            .and_then(JsonValue::as_object)
            .and_then(|item| item.values().next())
            .and_then(|outcome| outcome.get("status"))
            .and_then(JsonValue::as_u64)
            .is_some_and(|status| (200..300).contains(&status));
        if !accepted {
            failed_indices.push(position);
        }
    }

    BatchResult {
        attempted,
        succeeded: attempted - failed_indices.len(),
        failed_indices,
    }
}

#[async_trait]
impl IndexSink for ElasticsearchSink {
    async fn exists(&self, index: &str) -> Result<bool> {
        match self.client.head(&format!("/{index}")).await? {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(Error::http_status(
                status.as_u16(),
                "unexpected status for index lookup",
            )),
        }
    }

    async fn delete_schema(&self, index: &str) -> Result<()> {
        self.client.delete(&format!("/{index}")).await?;
        debug!(index = %index, "Deleted index");
        Ok(())
    }

    async fn create_schema(&self, index: &str, mapping: &MappingDefinition) -> Result<()> {
        let body = mapping.to_body(self.doc_type.as_deref());
        self.client.put(&format!("/{index}"), body).await?;
        debug!(index = %index, fields = mapping.len(), "Created index");
        Ok(())
    }

    async fn bulk_write(&self, index: &str, records: &[Record]) -> Result<BatchResult> {
        let mut total = BatchResult::default();
        for (chunk_no, chunk) in records.chunks(self.chunk_size).enumerate() {
            let result = match self.bulk_chunk(index, chunk).await {
                Ok(result) => result,
                // Nothing submitted yet: the whole submission failed
                Err(e) if chunk_no == 0 => return Err(e),
                Err(e) => {
                    // Earlier chunks are already committed; count the rest as rejected
                    let remaining = records.len() - total.attempted;
                    warn!(
                        index = %index,
                        chunk = chunk_no,
                        remaining,
                        error = %e,
                        "Bulk submission failed mid-load"
                    );
                    total.merge(BatchResult::rejected(remaining));
                    break;
                }
            };
            if !result.is_complete() {
                warn!(
                    index = %index,
                    chunk = chunk_no,
                    rejected = result.failed(),
                    "Bulk chunk had rejected documents"
                );
            }
            total.merge(result);
        }
        Ok(total)
    }
}
