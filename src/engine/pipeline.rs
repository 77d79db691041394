//! Pipeline orchestration

use super::types::{IndexReport, RunReport, SinkSelection, StageTimings};
use crate::config::{IndexConfig, OutputConfig, PipelineConfig, SourceConfig};
use crate::error::{Error, Result};
use crate::extract::{DelimitedFileCursor, DuckDbCursor, QueryCursor, RecordReader};
use crate::load::BulkLoader;
use crate::normalize::TimestampNormalizer;
use crate::output::{DelimitedWriter, WriteReport};
use crate::partition::{OrderedRecords, Partitioner};
use crate::schema::{MappingDefinition, SchemaMapper};
use crate::sink::IndexSink;
use crate::types::RecordSet;
use std::time::Instant;
use tracing::{error, info};

/// Open the cursor a source config describes
pub fn open_cursor(source: &SourceConfig) -> Result<Box<dyn QueryCursor>> {
    match source {
        SourceConfig::Duckdb {
            database, setup, ..
        } => {
            let cursor = DuckDbCursor::open(database)?;
            cursor.run_setup(setup)?;
            Ok(Box::new(cursor))
        }
        SourceConfig::Delimited { path, separator } => Ok(Box::new(
            DelimitedFileCursor::with_separator(path, separator.as_str()),
        )),
    }
}

/// Runs a configured batch from source to sinks.
///
/// One run is strictly sequential. Nothing guards against two runs at once:
/// overlapping runs writing the same files, or recreating the same index in
/// delete mode, race with each other.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    /// Create a pipeline from a validated config
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Pipeline configuration
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the configured query and collect the result
    pub fn extract(&self, cursor: &mut dyn QueryCursor) -> Result<RecordSet> {
        let stream = RecordReader::new(cursor).read(self.config.source.sql())?;
        Ok(stream.into_record_set())
    }

    /// Normalize timestamps (when configured), sort, and partition
    pub fn prepare(&self, set: RecordSet) -> Result<OrderedRecords> {
        let mut partitioner = Partitioner::new();

        let set = match &self.config.timestamp {
            Some(ts) => {
                let set = TimestampNormalizer::new(ts.clone()).normalize(set)?;
                partitioner = partitioner.with_timestamp_field(ts.field.as_str());
                set
            }
            None => set,
        };

        if let Some(key) = &self.config.partition_key {
            partitioner = partitioner.with_partition_key(key.as_str());
        }

        partitioner.order(set)
    }

    /// Mapping the index path would create for this field list
    pub fn mapping_for(&self, fields: &[String]) -> Result<MappingDefinition> {
        let index = self.index_config()?;
        Ok(MappingDefinition::from_fields(fields, &index.timestamp_field))
    }

    /// Ensure the schema, then bulk load every record.
    ///
    /// Schema failures are returned; no load is attempted after one. A
    /// partial load is reported, not returned as an error.
    pub async fn index(
        &self,
        sink: &dyn IndexSink,
        ordered: &OrderedRecords,
    ) -> Result<IndexReport> {
        let index = self.index_config()?;
        let mapping = self.mapping_for(ordered.set.fields())?;

        let schema = SchemaMapper::new(sink, index.delete_mode)
            .ensure(&index.name, &mapping)
            .await?;

        let load = BulkLoader::new(sink, index.name.as_str(), index.timestamp_field.as_str())
            .load(ordered.set.records())
            .await?;

        Ok(IndexReport { schema, load })
    }

    /// Write delimited output, one file per partition when partitioned
    pub fn export(&self, ordered: &OrderedRecords) -> Result<WriteReport> {
        let output = self.output_config()?;
        let writer = DelimitedWriter::new(output.writer.clone());
        let fields = ordered.set.fields();

        if let Some(partitions) = &ordered.partitions {
            return Ok(writer.write_partitions(&output.path, fields, partitions));
        }

        let mut report = WriteReport::default();
        match writer.write_file(&output.path, fields, ordered.set.records()) {
            Ok(count) => report.written.push((output.path.clone(), count)),
            Err(e) if !e.is_run_fatal() => {
                error!(error = %e, "Output file failed");
                report.failed.push((output.path.clone(), e));
            }
            Err(e) => return Err(e),
        }
        Ok(report)
    }

    /// Run every selected stage.
    ///
    /// Extraction, timestamp and schema failures abort the run. The index
    /// path runs before the file sink, so a schema failure leaves no files
    /// behind.
    pub async fn run(
        &self,
        cursor: &mut dyn QueryCursor,
        sink: Option<&dyn IndexSink>,
        selection: SinkSelection,
    ) -> Result<RunReport> {
        let run_index = selection.includes_index() && self.config.index.is_some();
        let run_export = selection.includes_export() && self.config.output.is_some();
        if !run_index && !run_export {
            return Err(Error::config("No configured sink matches the selected command"));
        }

        let mut timings = StageTimings::default();

        let started = Instant::now();
        let set = self.extract(cursor)?;
        timings.extract = started.elapsed();
        info!(
            records = set.len(),
            fields = set.fields().len(),
            elapsed_ms = timings.extract.as_millis() as u64,
            "Extraction finished"
        );

        let started = Instant::now();
        let ordered = self.prepare(set)?;
        timings.prepare = started.elapsed();

        let mut report = RunReport {
            records: ordered.set.len(),
            ..RunReport::default()
        };

        if run_index {
            let sink =
                sink.ok_or_else(|| Error::config("Index sink is configured but not provided"))?;
            let started = Instant::now();
            let index = self.index(sink, &ordered).await.map_err(|e| {
                error!(error = %e, "Index path failed; aborting run");
                e
            })?;
            report.index = Some(index);
            let elapsed = started.elapsed();
            info!(elapsed_ms = elapsed.as_millis() as u64, "Index stage finished");
            timings.index = Some(elapsed);
        }

        if run_export {
            let started = Instant::now();
            let files = self.export(&ordered)?;
            let elapsed = started.elapsed();
            info!(
                files = files.written.len(),
                failed = files.failed.len(),
                elapsed_ms = elapsed.as_millis() as u64,
                "Export stage finished"
            );
            report.files = Some(files);
            timings.export = Some(elapsed);
        }

        report.timings = timings;
        Ok(report)
    }

    fn index_config(&self) -> Result<&IndexConfig> {
        self.config
            .index
            .as_ref()
            .ok_or_else(|| Error::missing_field("index"))
    }

    fn output_config(&self) -> Result<&OutputConfig> {
        self.config
            .output
            .as_ref()
            .ok_or_else(|| Error::missing_field("output"))
    }
}
