//! Index sinks
//!
//! An [`IndexSink`] is the document store on the far side of the index
//! path. [`ElasticsearchSink`] speaks the REST API (`HEAD`/`PUT`/`DELETE` on
//! the index, NDJSON over `_bulk`). Unit tests use an in-process sink.

mod elasticsearch;
#[cfg(test)]
mod memory;
mod types;

pub use elasticsearch::{ElasticsearchSink, DEFAULT_CHUNK_SIZE};
#[cfg(test)]
pub(crate) use memory::MemorySink;
pub use types::IndexSink;
