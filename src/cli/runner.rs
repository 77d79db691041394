//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::{load_config, PipelineConfig};
use crate::engine::{open_cursor, Pipeline, RunReport, SinkSelection};
use crate::error::{Result, ResultExt};
use crate::sink::{ElasticsearchSink, IndexSink};
use tracing::{info, warn};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command.
    ///
    /// `Ok(false)` means the run finished but something did not fully
    /// succeed: a partial load or a failed output file.
    pub async fn run(&self) -> Result<bool> {
        match self.cli.command() {
            Commands::Run => self.execute(SinkSelection::All).await,
            Commands::Index => self.execute(SinkSelection::IndexOnly).await,
            Commands::Export => self.execute(SinkSelection::ExportOnly).await,
            Commands::Mapping => self.mapping(),
            Commands::Validate => self.validate(),
        }
    }

    fn load_config(&self) -> Result<PipelineConfig> {
        info!(path = %self.cli.config.display(), "Loading pipeline config");
        load_config(&self.cli.config)
    }

    async fn execute(&self, selection: SinkSelection) -> Result<bool> {
        let config = self.load_config()?;

        let sink = match (&config.index, selection.includes_index()) {
            (Some(index), true) => Some(
                ElasticsearchSink::new(&index.url, index.timeout())?
                    .with_doc_type(index.doc_type.clone())
                    .with_chunk_size(index.chunk_size),
            ),
            _ => None,
        };

        let mut cursor = open_cursor(&config.source).context("Failed to open source")?;
        let pipeline = Pipeline::new(config);

        let report = pipeline
            .run(
                cursor.as_mut(),
                sink.as_ref().map(|s| s as &dyn IndexSink),
                selection,
            )
            .await?;

        summarize(&report);
        Ok(report.is_success())
    }

    /// Print the mapping body without touching the index
    fn mapping(&self) -> Result<bool> {
        let config = self.load_config()?;
        let doc_type = config.index.as_ref().and_then(|i| i.doc_type.clone());

        let mut cursor = open_cursor(&config.source).context("Failed to open source")?;
        let pipeline = Pipeline::new(config);
        let ordered = pipeline.prepare(pipeline.extract(cursor.as_mut())?)?;
        let mapping = pipeline.mapping_for(ordered.set.fields())?;

        let body = serde_json::to_string_pretty(&mapping.to_body(doc_type.as_deref()))
            .context("Failed to render mapping")?;
        println!("{body}");
        Ok(true)
    }

    fn validate(&self) -> Result<bool> {
        let config = self.load_config()?;
        let sinks: Vec<&str> = [
            config.index.as_ref().map(|_| "index"),
            config.output.as_ref().map(|_| "output"),
        ]
        .into_iter()
        .flatten()
        .collect();

        println!(
            "Config '{}' is valid; sinks: {}",
            self.cli.config.display(),
            sinks.join(", ")
        );
        Ok(true)
    }
}

fn summarize(report: &RunReport) {
    if let Some(index) = &report.index {
        info!(
            schema = %index.schema,
            attempted = index.load.attempted,
            succeeded = index.load.succeeded,
            status = %index.load.status(),
            "Index summary"
        );
    }
    if let Some(files) = &report.files {
        for (path, e) in &files.failed {
            warn!(path = %path.display(), error = %e, "Output file not written");
        }
        info!(
            files = files.written.len(),
            records = files.records_written(),
            "Export summary"
        );
    }
    info!(
        records = report.records,
        success = report.is_success(),
        "Run finished"
    );
}
