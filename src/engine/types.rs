//! Engine types
//!
//! Sink selection, per-stage timings, and the report of one run.

use crate::output::WriteReport;
use crate::schema::SchemaOutcome;
use crate::types::{BatchResult, LoadStatus};
use std::time::Duration;

/// Which configured sinks a run feeds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkSelection {
    /// Every configured sink
    #[default]
    All,
    /// Only the index sink
    IndexOnly,
    /// Only the file sink
    ExportOnly,
}

impl SinkSelection {
    /// Whether the index sink runs
    pub fn includes_index(self) -> bool {
        matches!(self, Self::All | Self::IndexOnly)
    }

    /// Whether the file sink runs
    pub fn includes_export(self) -> bool {
        matches!(self, Self::All | Self::ExportOnly)
    }
}

/// Wall time of each stage
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    /// Query and fetch
    pub extract: Duration,
    /// Timestamp normalization, sorting and partitioning
    pub prepare: Duration,
    /// Schema and bulk load
    pub index: Option<Duration>,
    /// File writes
    pub export: Option<Duration>,
}

/// What the index path did
#[derive(Debug, Clone)]
pub struct IndexReport {
    /// Schema step outcome
    pub schema: SchemaOutcome,
    /// Load accounting
    pub load: BatchResult,
}

/// Report of one pipeline run
#[derive(Debug, Default)]
pub struct RunReport {
    /// Records extracted
    pub records: usize,
    /// Index path outcome, when it ran
    pub index: Option<IndexReport>,
    /// File sink outcome, when it ran
    pub files: Option<WriteReport>,
    /// Stage timings
    pub timings: StageTimings,
}

impl RunReport {
    /// Load status of the index path, if it loaded anything
    pub fn load_status(&self) -> Option<LoadStatus> {
        self.index.as_ref().map(|i| i.load.status())
    }

    /// Whether everything that ran fully succeeded
    pub fn is_success(&self) -> bool {
        self.load_status() != Some(LoadStatus::Partial)
            && self.files.as_ref().map_or(true, WriteReport::is_success)
    }
}
