//! Schema types

use crate::types::JsonValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Field stamped with the load time when a record lacks it
pub const RESERVED_TIMESTAMP_FIELD: &str = "@timestamp";

/// Display format of instant fields (index-side pattern syntax)
pub const INSTANT_FORMAT: &str = "yyyy-MM-dd HH:mm:ss.SSS";

/// Type of one mapped field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// Exact-match string
    Keyword,
    /// Point in time with a display format
    Date {
        /// Index-side format pattern
        format: String,
    },
}

impl FieldType {
    /// Instant type with the default display format
    pub fn instant() -> Self {
        FieldType::Date {
            format: INSTANT_FORMAT.to_string(),
        }
    }

    /// Whether this is an instant type
    pub fn is_instant(&self) -> bool {
        matches!(self, FieldType::Date { .. })
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldType::Keyword => write!(f, "keyword"),
            FieldType::Date { format } => write!(f, "date({format})"),
        }
    }
}

/// Field name to type mapping for one index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDefinition {
    /// Fields in declaration order
    pub properties: IndexMap<String, FieldType>,
}

impl MappingDefinition {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping for a batch's field list.
    ///
    /// Every field is a keyword. `reserved` is appended as an instant unless
    /// the field list already holds it, in which case it stays a keyword.
    pub fn from_fields<S: AsRef<str>>(fields: &[S], reserved: &str) -> Self {
        let mut mapping = Self::new();
        for field in fields {
            mapping.add_field(field.as_ref(), FieldType::Keyword);
        }
        if !mapping.contains(reserved) {
            mapping.add_field(reserved, FieldType::instant());
        }
        mapping
    }

    /// Add or replace a field
    pub fn add_field(&mut self, name: &str, field_type: FieldType) {
        self.properties.insert(name.to_string(), field_type);
    }

    /// Whether a field is mapped
    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Type of a field
    pub fn get(&self, name: &str) -> Option<&FieldType> {
        self.properties.get(name)
    }

    /// Mapped field names in order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether nothing is mapped
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Render the index creation body.
    ///
    /// Legacy servers expect the properties nested under a document type.
    pub fn to_body(&self, doc_type: Option<&str>) -> JsonValue {
        let properties = serde_json::json!({ "properties": &self.properties });
        match doc_type {
            Some(doc_type) => serde_json::json!({ "mappings": { doc_type: properties } }),
            None => serde_json::json!({ "mappings": properties }),
        }
    }
}

/// What ensuring a schema did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaOutcome {
    /// No index existed; it was created
    Created,
    /// An index existed and was dropped and created again
    Recreated,
    /// An index existed and was left untouched
    Existing,
}

impl std::fmt::Display for SchemaOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SchemaOutcome::Created => write!(f, "created"),
            SchemaOutcome::Recreated => write!(f, "recreated"),
            SchemaOutcome::Existing => write!(f, "existing"),
        }
    }
}
