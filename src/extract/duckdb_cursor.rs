//! DuckDB-backed query cursor
//!
//! DuckDB can read Parquet/CSV directly and attach PostgreSQL, MySQL or
//! SQLite through its extensions, so one embedded engine covers most sources.

use super::types::QueryCursor;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use duckdb::types::TimeUnit;
use duckdb::Connection;

/// Query cursor over an embedded DuckDB connection
pub struct DuckDbCursor {
    /// DuckDB connection
    conn: Connection,
    /// Database opened (for logging)
    database: String,
    /// Column names of the last result
    columns: Vec<String>,
    /// Rows of the last result, until fetched
    pending: Option<Vec<Vec<JsonValue>>>,
}

impl DuckDbCursor {
    /// Open a database file, or an in-memory database for `:memory:`
    pub fn open(database: &str) -> Result<Self> {
        let conn = if database == ":memory:" {
            Connection::open_in_memory()
        } else {
            Connection::open(database)
        }
        .map_err(|e| Error::extraction(format!("Failed to open DuckDB '{database}': {e}")))?;

        Ok(Self {
            conn,
            database: database.to_string(),
            columns: Vec::new(),
            pending: None,
        })
    }

    /// Open an in-memory database
    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    /// Run setup statements (INSTALL, LOAD, ATTACH, CREATE ...) before querying
    pub fn run_setup(&self, statements: &[String]) -> Result<()> {
        for statement in statements {
            tracing::debug!("Running setup statement: {}", statement);
            self.conn
                .execute_batch(statement)
                .map_err(|e| Error::extraction(format!("Setup statement failed: {e}")))?;
        }
        Ok(())
    }

    /// Database this cursor was opened on
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl QueryCursor for DuckDbCursor {
    fn execute(&mut self, sql: &str) -> Result<()> {
        tracing::debug!("Executing query: {}", sql);

        let (columns, rows) = {
            let mut stmt = self
                .conn
                .prepare(sql)
                .map_err(|e| Error::extraction(format!("Failed to prepare query: {e}")))?;

            let mut rows = Vec::new();
            {
                let mut result = stmt
                    .query([])
                    .map_err(|e| Error::extraction(format!("Failed to execute query: {e}")))?;

                while let Some(row) = result
                    .next()
                    .map_err(|e| Error::extraction(format!("Failed to fetch row: {e}")))?
                {
                    let width = row.as_ref().column_count();
                    let mut tuple = Vec::with_capacity(width);
                    for idx in 0..width {
                        let value: duckdb::types::Value = row.get(idx).map_err(|e| {
                            Error::extraction(format!("Failed to read column {idx}: {e}"))
                        })?;
                        tuple.push(duckdb_value_to_json(value));
                    }
                    rows.push(tuple);
                }
            }

            (stmt.column_names(), rows)
        };

        self.columns = columns;
        self.pending = Some(rows);
        Ok(())
    }

    fn description(&self) -> &[String] {
        &self.columns
    }

    fn fetch_all(&mut self) -> Result<Vec<Vec<JsonValue>>> {
        self.pending
            .take()
            .ok_or_else(|| Error::extraction("No pending result; execute a query first"))
    }
}

/// Convert DuckDB Value to JSON Value
fn duckdb_value_to_json(value: duckdb::types::Value) -> JsonValue {
    match value {
        duckdb::types::Value::Null => JsonValue::Null,
        duckdb::types::Value::Boolean(b) => JsonValue::Bool(b),
        duckdb::types::Value::TinyInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::SmallInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::Int(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::BigInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::HugeInt(i) => JsonValue::String(i.to_string()),
        duckdb::types::Value::UTinyInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::USmallInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::UInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::UBigInt(i) => JsonValue::Number(i.into()),
        duckdb::types::Value::Float(f) => {
            serde_json::Number::from_f64(f64::from(f)).map_or(JsonValue::Null, JsonValue::Number)
        }
        duckdb::types::Value::Double(f) => {
            serde_json::Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
        }
        duckdb::types::Value::Decimal(d) => JsonValue::String(d.to_string()),
        duckdb::types::Value::Text(s) => JsonValue::String(s),
        duckdb::types::Value::Blob(b) => JsonValue::String(base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            b,
        )),
        duckdb::types::Value::Timestamp(unit, i) => {
            let per_sec = ticks_per_second(unit);
            let secs = i.div_euclid(per_sec);
            let nsecs = (i.rem_euclid(per_sec) * (1_000_000_000 / per_sec)) as u32;
            chrono::DateTime::from_timestamp(secs, nsecs)
                .map(|dt| JsonValue::String(dt.format("%Y-%m-%d %H:%M:%S").to_string()))
                .unwrap_or(JsonValue::Number(i.into()))
        }
        duckdb::types::Value::Date32(d) => {
            // Days since epoch (719163 is the number of days from 1 CE to 1970-01-01)
            chrono::NaiveDate::from_num_days_from_ce_opt(d + 719_163)
                .map(|date| JsonValue::String(date.format("%Y-%m-%d").to_string()))
                .unwrap_or(JsonValue::Number(d.into()))
        }
        duckdb::types::Value::Time64(unit, t) => {
            let secs = t.div_euclid(ticks_per_second(unit));
            JsonValue::String(format!(
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ))
        }
        _ => JsonValue::String(format!("{value:?}")),
    }
}

/// Ticks of `unit` in one second
fn ticks_per_second(unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Second => 1,
        TimeUnit::Millisecond => 1_000,
        TimeUnit::Microsecond => 1_000_000,
        TimeUnit::Nanosecond => 1_000_000_000,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duckdb_value_to_json() {
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::Null),
            JsonValue::Null
        );
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::Boolean(true)),
            JsonValue::Bool(true)
        );
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::BigInt(1_522_825_140)),
            JsonValue::Number(1_522_825_140_i64.into())
        );
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::Text("10.0.0.1".to_string())),
            JsonValue::String("10.0.0.1".to_string())
        );
    }

    #[test]
    fn test_duckdb_date_and_time_render_as_text() {
        // 2018-04-04 is day 17625 after the epoch
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::Date32(17_625)),
            JsonValue::String("2018-04-04".to_string())
        );
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::Time64(
                duckdb::types::TimeUnit::Microsecond,
                55_140_000_000
            )),
            JsonValue::String("15:19:00".to_string())
        );
    }

    #[test]
    fn test_duckdb_timestamp_respects_unit() {
        // 2018-04-04 15:19:00 UTC
        let expected = JsonValue::String("2018-04-04 15:19:00".to_string());
        for (unit, ticks) in [
            (TimeUnit::Second, 1_522_855_140_i64),
            (TimeUnit::Millisecond, 1_522_855_140_000),
            (TimeUnit::Microsecond, 1_522_855_140_000_000),
            (TimeUnit::Nanosecond, 1_522_855_140_000_000_000),
        ] {
            assert_eq!(
                duckdb_value_to_json(duckdb::types::Value::Timestamp(unit, ticks)),
                expected,
                "{unit:?}"
            );
        }
    }

    #[test]
    fn test_duckdb_time_respects_unit() {
        assert_eq!(
            duckdb_value_to_json(duckdb::types::Value::Time64(
                TimeUnit::Nanosecond,
                55_140_000_000_000
            )),
            JsonValue::String("15:19:00".to_string())
        );
    }
}
