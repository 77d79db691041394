//! Tests for output module

use super::*;
use crate::error::Error;
use crate::partition::{PartitionKey, Partitions};
use crate::types::{JsonValue, Record};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;
use tempfile::tempdir;

fn record(value: JsonValue) -> Record {
    match value {
        JsonValue::Object(map) => map,
        _ => panic!("expected object"),
    }
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

// ============================================================================
// Path Tests
// ============================================================================

#[test]
fn test_partition_path_keeps_extension() {
    assert_eq!(
        partition_path(Path::new("out/tczf.csv"), "10.0.0.1"),
        Path::new("out/tczf_10.0.0.1.csv")
    );
}

#[test]
fn test_partition_path_without_extension() {
    assert_eq!(
        partition_path(Path::new("out/tczf"), "NULL"),
        Path::new("out/tczf_NULL")
    );
}

#[test]
fn test_partition_path_sanitizes_key() {
    assert_eq!(
        partition_path(Path::new("tczf.csv"), "fe80::1/64"),
        Path::new("tczf_fe80__1_64.csv")
    );
    assert_eq!(
        partition_path(Path::new("tczf.csv"), "a\\b"),
        Path::new("tczf_a_b.csv")
    );
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn test_config_defaults() {
    let config = DelimitedWriterConfig::default();
    assert_eq!(config.separator, ",");
    assert!(config.header);
    assert_eq!(config.null_placeholder, "NULL");
    assert!(config.columns.is_empty());
}

#[test]
fn test_column_spec_from_yaml() {
    let yaml = r#"
columns:
  - timestamp
  - name: disk
    precision: 2
  - name: host_ip
"#;
    let config: DelimitedWriterConfig = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        config.columns,
        vec![
            ColumnSpec::name("timestamp"),
            ColumnSpec::with_precision("disk", 2),
            ColumnSpec::Detailed {
                name: "host_ip".into(),
                precision: None
            },
        ]
    );
    assert_eq!(config.columns[2].field(), "host_ip");
    assert_eq!(config.columns[2].precision(), None);
}

// ============================================================================
// Write Tests
// ============================================================================

#[test]
fn test_write_file_all_columns_with_header() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.csv");
    let records = vec![
        record(json!({"id": 1, "name": "alpha", "score": 0})),
        record(json!({"id": 2, "name": null, "score": 3.5})),
        record(json!({"id": 3, "name": "", "score": null})),
    ];

    let written = DelimitedWriter::default()
        .write_file(&path, &fields(&["id", "name", "score"]), &records)
        .unwrap();

    assert_eq!(written, 3);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "id,name,score\n1,alpha,0\n2,NULL,3.5\n3,NULL,NULL\n"
    );
}

#[test]
fn test_write_file_without_header_custom_separator() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.tsv");
    let config = DelimitedWriterConfig::default()
        .with_separator("\t")
        .with_header(false)
        .with_null_placeholder("\\N");

    DelimitedWriter::new(config)
        .write_file(
            &path,
            &fields(&["a", "b"]),
            &[record(json!({"a": "x", "b": null}))],
        )
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "x\t\\N\n");
}

#[test]
fn test_write_file_precision_and_selection() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.csv");
    let config = DelimitedWriterConfig::default()
        .with_header(false)
        .with_columns(vec!["host_ip".into(), ColumnSpec::with_precision("disk", 2)]);

    DelimitedWriter::new(config)
        .write_file(
            &path,
            &fields(&["disk", "host_ip", "ignored"]),
            &[
                record(json!({"disk": "12.3456", "host_ip": "10.0.0.1", "ignored": 1})),
                record(json!({"disk": 7, "host_ip": "10.0.0.2", "ignored": 2})),
            ],
        )
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "10.0.0.1,12.35\n10.0.0.2,7.00\n"
    );
}

#[test]
fn test_non_numeric_precision_value_fails_target() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("result.csv");
    let config =
        DelimitedWriterConfig::default().with_columns(vec![ColumnSpec::with_precision("disk", 2)]);

    let result = DelimitedWriter::new(config).write_file(
        &path,
        &fields(&["disk"]),
        &[record(json!({"disk": "full"}))],
    );

    match result {
        Err(Error::SinkWrite { target, message }) => {
            assert!(target.ends_with("result.csv"));
            assert!(message.contains("disk"));
        }
        other => panic!("expected SinkWrite, got {other:?}"),
    }
}

#[test]
fn test_write_file_creates_parent_dirs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/deeper/result.csv");

    DelimitedWriter::default()
        .write_file(&path, &fields(&["a"]), &[record(json!({"a": 1}))])
        .unwrap();

    assert!(path.exists());
}

#[test]
fn test_write_partitions_isolates_failures() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("tczf.csv");

    // A directory squatting on one partition's file name makes that target unwritable
    std::fs::create_dir(dir.path().join("tczf_bad.csv")).unwrap();

    let mut partitions = Partitions::new("host_ip");
    partitions.push("good".into(), record(json!({"host_ip": "good", "v": 1})));
    partitions.push("bad".into(), record(json!({"host_ip": "bad", "v": 2})));
    partitions.push("also".into(), record(json!({"host_ip": "also", "v": 3})));

    let report = DelimitedWriter::default().write_partitions(
        &base,
        &fields(&["host_ip", "v"]),
        &partitions,
    );

    assert!(!report.is_success());
    assert_eq!(report.written.len(), 2);
    assert_eq!(report.records_written(), 2);
    assert_eq!(report.failed.len(), 1);
    assert!(matches!(report.failed[0].1, Error::SinkWrite { .. }));
    assert_eq!(
        std::fs::read_to_string(dir.path().join("tczf_also.csv")).unwrap(),
        "host_ip,v\nalso,3\n"
    );
}

#[test]
fn test_colliding_partition_names_fail_instead_of_overwriting() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("tczf.csv");

    // `a/b` and `a:b` both sanitize to `tczf_a_b.csv`
    let mut partitions = Partitions::new("host_ip");
    partitions.push("a/b".into(), record(json!({"host_ip": "a/b", "v": 1})));
    partitions.push("a:b".into(), record(json!({"host_ip": "a:b", "v": 2})));
    partitions.push("a/b".into(), record(json!({"host_ip": "a/b", "v": 3})));

    let report = DelimitedWriter::default().write_partitions(
        &base,
        &fields(&["host_ip", "v"]),
        &partitions,
    );

    assert!(!report.is_success());
    assert_eq!(report.written, vec![(dir.path().join("tczf_a_b.csv"), 2)]);
    assert_eq!(report.failed.len(), 1);
    match &report.failed[0] {
        (path, Error::SinkWrite { message, .. }) => {
            assert_eq!(path, &dir.path().join("tczf_a_b.csv"));
            assert!(message.contains("'a:b'"));
            assert!(message.contains("'a/b'"));
        }
        other => panic!("expected SinkWrite, got {other:?}"),
    }

    // The first group's file is intact
    assert_eq!(
        std::fs::read_to_string(dir.path().join("tczf_a_b.csv")).unwrap(),
        "host_ip,v\na/b,1\na/b,3\n"
    );
    assert_eq!(
        report.records_written() + 1,
        partitions.total_records()
    );
}

#[test]
fn test_null_group_and_literal_null_do_not_share_a_file() {
    let dir = tempdir().unwrap();
    let base = dir.path().join("tczf.csv");

    let mut partitions = Partitions::new("host_ip");
    partitions.push(PartitionKey::Null, record(json!({"host_ip": null, "v": 1})));
    partitions.push("NULL".into(), record(json!({"host_ip": "NULL", "v": 2})));

    let report = DelimitedWriter::default().write_partitions(
        &base,
        &fields(&["host_ip", "v"]),
        &partitions,
    );

    assert!(!report.is_success());
    assert_eq!(report.written.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("tczf_NULL.csv")).unwrap(),
        "host_ip,v\nNULL,1\n"
    );
}
