//! HTTP client module
//!
//! Thin wrapper over reqwest used by the index sink.
//!
//! # Features
//!
//! - **Base URL**: request paths are joined onto a validated base URL
//! - **Timeouts**: one timeout for every request
//! - **Bodies**: JSON values or raw text (e.g. NDJSON for bulk requests)
//! - **Status mapping**: non-2xx responses become [`Error::HttpStatus`](crate::Error::HttpStatus)
//!
//! Requests are sent once; nothing is retried.

mod client;

pub use client::{HttpClient, HttpClientConfig, RequestBody, RequestConfig};

#[cfg(test)]
mod tests;
