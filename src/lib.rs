// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # sqlsink
//!
//! Loads the result of a SQL query into a search index and/or delimited
//! text files.
//!
//! ## Features
//!
//! - **Query sources**: DuckDB (any database it can attach) or a delimited file
//! - **Canonical timestamps**: taken from a timestamp field or built from date + time fields
//! - **Ordering**: stable sort by timestamp, optional split by a partition key
//! - **Index sink**: keyword mapping, optional recreate, chunked bulk load with per-document accounting
//! - **File sink**: one delimited file per partition, with per-column precision
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sqlsink::config::load_config;
//! use sqlsink::engine::{open_cursor, Pipeline, SinkSelection};
//!
//! #[tokio::main]
//! async fn main() -> sqlsink::Result<()> {
//!     let config = load_config("config/pipeline.yaml")?;
//!     let mut cursor = open_cursor(&config.source)?;
//!
//!     let report = Pipeline::new(config)
//!         .run(cursor.as_mut(), None, SinkSelection::ExportOnly)
//!         .await?;
//!     assert!(report.is_success());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! extract → normalize → sort/partition ─┬→ index sink  (mapping, bulk load)
//!                                       └→ file sink   (one file per key)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Record model and load accounting
pub mod types;

/// Query cursors and the record reader
pub mod extract;

/// Canonical timestamp normalization
pub mod normalize;

/// Sorting and partitioning
pub mod partition;

/// Index mappings and schema creation
pub mod schema;

/// HTTP client
pub mod http;

/// Index sinks
pub mod sink;

/// Bulk loading
pub mod load;

/// Delimited file output
pub mod output;

/// Pipeline configuration
pub mod config;

/// Pipeline engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{load_config, load_config_from_str, PipelineConfig};
pub use engine::{Pipeline, RunReport, SinkSelection};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
