//! Timestamp normalization module
//!
//! Gives every record a single canonical integer timestamp.
//!
//! # Overview
//!
//! The strategy is picked once per batch from the batch's field list:
//! - **Existing**: the canonical field is present and is coerced to an integer
//! - **Synthesize**: the field is built from a date field and a time-of-day
//!   field, parsed as `YYYY-MM-DD HH:MM:SS` in UTC

mod timestamp;

pub use timestamp::{
    coerce_integer, parse_datetime, TimestampConfig, TimestampNormalizer, TimestampStrategy,
    DATETIME_FORMAT,
};
