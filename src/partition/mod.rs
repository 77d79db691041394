//! Partition and ordering module
//!
//! Orders records by their canonical timestamp and optionally groups them
//! by a partition key.
//!
//! # Overview
//!
//! - Sorting is stable: records with equal timestamps keep their input order
//! - Grouping keeps the global order inside every group
//! - Groups appear in the order their key was first seen
//! - Null values group apart from any literal value

mod sorter;
mod types;

pub use sorter::{partition_by, sort_by_timestamp, Partitioner};
pub use types::{partition_key_of, OrderedRecords, PartitionKey, Partitions};
