//! Index schema module
//!
//! Derives a field-type mapping from a batch's field list and makes sure the
//! index sink has it before loading.
//!
//! # Features
//!
//! - **Exact-match defaults**: every extracted field is a keyword
//! - **Reserved instant**: `@timestamp` is added as a date unless the batch carries it
//! - **Delete mode**: an existing index can be dropped and recreated
//! - **Name validation**: index identifiers are checked before any sink call

mod mapper;
mod types;

pub use mapper::{validate_index_name, SchemaMapper};
pub use types::{
    FieldType, MappingDefinition, SchemaOutcome, INSTANT_FORMAT, RESERVED_TIMESTAMP_FIELD,
};
