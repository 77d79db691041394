//! Bulk loading into the index sink

mod loader;

pub use loader::{stamp_missing, BulkLoader, LOAD_TIME_FORMAT};
