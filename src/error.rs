//! Error types for sqlsink
//!
//! This module defines the error hierarchy for the whole pipeline.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Pipeline-level errors (`Extraction`, `MalformedTimestamp`, `SchemaCreation`)
//! abort a run. `SinkWrite` is scoped to a single output target. A partial
//! bulk load is not an error at all; see [`crate::types::BatchResult`].

use thiserror::Error;

/// The main error type for sqlsink
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Pipeline Errors
    // ============================================================================
    #[error("Extraction failed: {message}")]
    Extraction { message: String },

    #[error("Malformed timestamp in field '{field}': {message}")]
    MalformedTimestamp { field: String, message: String },

    #[error("Failed to ensure schema for index '{index}': {message}")]
    SchemaCreation { index: String, message: String },

    #[error("Failed to write '{target}': {message}")]
    SinkWrite { target: String, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Index sink error: {message}")]
    Sink { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Extraction {
            message: message.into(),
        }
    }

    /// Create a malformed timestamp error
    pub fn malformed_timestamp(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedTimestamp {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a schema creation error
    pub fn schema_creation(index: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaCreation {
            index: index.into(),
            message: message.into(),
        }
    }

    /// Create a sink write error for a single output target
    pub fn sink_write(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SinkWrite {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an index sink error
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Whether this error aborts the whole run.
    ///
    /// `SinkWrite` only fails its own target; sibling partitions keep going.
    pub fn is_run_fatal(&self) -> bool {
        !matches!(self, Error::SinkWrite { .. })
    }
}

/// Result type alias for sqlsink
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("source.sql");
        assert_eq!(err.to_string(), "Missing required config field: source.sql");

        let err = Error::malformed_timestamp("timestamp", "not an integer: 'abc'");
        assert_eq!(
            err.to_string(),
            "Malformed timestamp in field 'timestamp': not an integer: 'abc'"
        );

        let err = Error::schema_creation("metrics", "HTTP 400: resource_already_exists");
        assert_eq!(
            err.to_string(),
            "Failed to ensure schema for index 'metrics': HTTP 400: resource_already_exists"
        );
    }

    #[test]
    fn test_is_run_fatal() {
        assert!(Error::extraction("query failed").is_run_fatal());
        assert!(Error::malformed_timestamp("ts", "bad").is_run_fatal());
        assert!(Error::schema_creation("idx", "conflict").is_run_fatal());
        assert!(!Error::sink_write("out/a.csv", "permission denied").is_run_fatal());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
