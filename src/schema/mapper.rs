//! Schema creation against the index sink

use super::types::{MappingDefinition, SchemaOutcome};
use crate::error::{Error, Result};
use crate::sink::IndexSink;
use once_cell::sync::Lazy;
use regex::Regex;

/// Lowercase, no leading `-`, `_` or `+`, none of `\ / * ? " < > | , # :` or spaces
static INDEX_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^[^-_+A-Z\\/*?"<>|,#: ][^A-Z\\/*?"<>|,#: ]*$"#).expect("valid regex"));

/// Check an index identifier before it reaches the sink
pub fn validate_index_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_value("index.name", "cannot be empty"));
    }
    if name == "." || name == ".." {
        return Err(Error::invalid_value("index.name", "cannot be '.' or '..'"));
    }
    if name.len() > 255 {
        return Err(Error::invalid_value(
            "index.name",
            format!("is {} bytes long; the limit is 255", name.len()),
        ));
    }
    if !INDEX_NAME.is_match(name) {
        return Err(Error::invalid_value(
            "index.name",
            format!(
                "'{name}' must be lowercase, must not start with '-', '_' or '+', \
                 and must not contain spaces or any of \\ / * ? \" < > | , # :"
            ),
        ));
    }
    Ok(())
}

/// Ensures an index exists with the expected mapping
pub struct SchemaMapper<'s> {
    sink: &'s dyn IndexSink,
    delete_mode: bool,
}

impl<'s> SchemaMapper<'s> {
    /// Create a mapper over a sink.
    ///
    /// With `delete_mode`, an existing index is dropped before creation.
    pub fn new(sink: &'s dyn IndexSink, delete_mode: bool) -> Self {
        Self { sink, delete_mode }
    }

    /// Make sure `index` exists.
    ///
    /// An existing index is left as-is unless delete mode is on; field
    /// conflicts with an existing index are the sink's concern. Any failure is
    /// reported as [`Error::SchemaCreation`].
    pub async fn ensure(&self, index: &str, mapping: &MappingDefinition) -> Result<SchemaOutcome> {
        validate_index_name(index).map_err(|e| Error::schema_creation(index, e.to_string()))?;

        let exists = self
            .sink
            .exists(index)
            .await
            .map_err(|e| Error::schema_creation(index, e.to_string()))?;

        if exists && !self.delete_mode {
            tracing::info!(index = %index, "Index already exists; keeping it");
            return Ok(SchemaOutcome::Existing);
        }

        if exists {
            tracing::info!(index = %index, "Deleting existing index");
            self.sink
                .delete_schema(index)
                .await
                .map_err(|e| Error::schema_creation(index, format!("delete failed: {e}")))?;
        }

        self.sink
            .create_schema(index, mapping)
            .await
            .map_err(|e| Error::schema_creation(index, e.to_string()))?;

        let outcome = if exists {
            SchemaOutcome::Recreated
        } else {
            SchemaOutcome::Created
        };
        tracing::info!(index = %index, fields = mapping.len(), %outcome, "Index schema ready");
        Ok(outcome)
    }
}
