//! Canonical timestamp derivation

use crate::error::{Error, Result};
use crate::types::{JsonValue, Record, RecordSet};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Format of the combined date and time fields
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Field names used to find or build the canonical timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampConfig {
    /// Canonical timestamp field
    #[serde(default = "default_field")]
    pub field: String,

    /// Date field (`YYYY-MM-DD`) used when the canonical field is absent
    #[serde(default = "default_date_field")]
    pub date_field: String,

    /// Time-of-day field (`HH:MM:SS`) used when the canonical field is absent
    #[serde(default = "default_time_field")]
    pub time_field: String,
}

fn default_field() -> String {
    "timestamp".to_string()
}

fn default_date_field() -> String {
    "datex".to_string()
}

fn default_time_field() -> String {
    "time_str".to_string()
}

impl Default for TimestampConfig {
    fn default() -> Self {
        Self {
            field: default_field(),
            date_field: default_date_field(),
            time_field: default_time_field(),
        }
    }
}

/// How a batch gets its canonical timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampStrategy {
    /// Coerce the existing field to an integer
    Existing {
        /// Canonical field
        field: String,
    },
    /// Combine the date and time fields
    Synthesize {
        /// Canonical field to create
        field: String,
        /// Date field
        date_field: String,
        /// Time-of-day field
        time_field: String,
    },
}

impl TimestampStrategy {
    /// Pick the strategy for a batch.
    ///
    /// Fails when the canonical field is absent and the date/time fields
    /// needed to synthesize it are missing too.
    pub fn for_fields(fields: &[String], config: &TimestampConfig) -> Result<Self> {
        let has = |name: &str| fields.iter().any(|f| f == name);

        if has(&config.field) {
            return Ok(Self::Existing {
                field: config.field.clone(),
            });
        }

        for required in [&config.date_field, &config.time_field] {
            if !has(required) {
                return Err(Error::malformed_timestamp(
                    &config.field,
                    format!("field is absent and '{required}' is not available to build it"),
                ));
            }
        }

        Ok(Self::Synthesize {
            field: config.field.clone(),
            date_field: config.date_field.clone(),
            time_field: config.time_field.clone(),
        })
    }

    /// Canonical field this strategy fills
    pub fn field(&self) -> &str {
        match self {
            Self::Existing { field } | Self::Synthesize { field, .. } => field,
        }
    }

    /// Compute the canonical timestamp of one record
    pub fn timestamp_of(&self, record: &Record) -> Result<i64> {
        match self {
            Self::Existing { field } => {
                let value = record.get(field).unwrap_or(&JsonValue::Null);
                coerce_integer(value).ok_or_else(|| {
                    Error::malformed_timestamp(field, format!("not an integer: {value}"))
                })
            }
            Self::Synthesize {
                field,
                date_field,
                time_field,
            } => {
                let date = text_field(record, date_field).ok_or_else(|| {
                    Error::malformed_timestamp(field, format!("'{date_field}' is not text"))
                })?;
                let time = text_field(record, time_field).ok_or_else(|| {
                    Error::malformed_timestamp(field, format!("'{time_field}' is not text"))
                })?;

                parse_datetime(date, time).ok_or_else(|| {
                    Error::malformed_timestamp(
                        field,
                        format!("'{date} {time}' does not match {DATETIME_FORMAT}"),
                    )
                })
            }
        }
    }
}

fn text_field<'r>(record: &'r Record, name: &str) -> Option<&'r str> {
    record.get(name).and_then(JsonValue::as_str)
}

/// Coerce a value to an integer timestamp.
///
/// Accepts integer numbers, floats without a fractional part, and strings
/// holding an integer.
pub fn coerce_integer(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        JsonValue::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Parse `"{date} {time}"` as a UTC wall-clock time and return epoch seconds
pub fn parse_datetime(date: &str, time: &str) -> Option<i64> {
    let combined = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&combined, DATETIME_FORMAT)
        .ok()
        .map(|dt| dt.and_utc().timestamp())
}

/// Normalizes the canonical timestamp of every record in a batch
#[derive(Debug, Clone, Default)]
pub struct TimestampNormalizer {
    config: TimestampConfig,
}

impl TimestampNormalizer {
    /// Create a normalizer
    pub fn new(config: TimestampConfig) -> Self {
        Self { config }
    }

    /// Field names in use
    pub fn config(&self) -> &TimestampConfig {
        &self.config
    }

    /// Return a new batch whose records carry an integer canonical timestamp.
    ///
    /// The first record that cannot be given a timestamp fails the batch.
    pub fn normalize(&self, set: RecordSet) -> Result<RecordSet> {
        if set.is_empty() {
            return Ok(set);
        }

        let strategy = TimestampStrategy::for_fields(set.fields(), &self.config)?;
        tracing::debug!(?strategy, records = set.len(), "Normalizing timestamps");

        let (mut fields, records) = set.into_parts();

        let normalized = records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                let ts = strategy.timestamp_of(&record).map_err(|e| match e {
                    Error::MalformedTimestamp { field, message } => {
                        Error::malformed_timestamp(field, format!("record {idx}: {message}"))
                    }
                    other => other,
                })?;
                let mut out = record;
                out.insert(strategy.field().to_string(), JsonValue::from(ts));
                Ok(out)
            })
            .collect::<Result<Vec<Record>>>()?;

        if let TimestampStrategy::Synthesize { field, .. } = &strategy {
            fields.push(field.clone());
        }

        Ok(RecordSet::new(fields, normalized))
    }
}
