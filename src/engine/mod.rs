//! Pipeline engine module
//!
//! Runs one batch through every stage, in order:
//!
//! 1. extract: query the source cursor
//! 2. normalize: derive the canonical timestamp (when configured)
//! 3. order: stable sort, then optional partitioning
//! 4. index: ensure the schema, then bulk load
//! 5. export: delimited files, one per partition
//!
//! Stages never overlap; each sink call is awaited before the next starts.
//! A failure before the export stage, schema creation included, aborts the
//! run before any file is written.

mod pipeline;
mod types;

pub use pipeline::{open_cursor, Pipeline};
pub use types::{IndexReport, RunReport, SinkSelection, StageTimings};
