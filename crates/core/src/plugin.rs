//! Build-completion adapter: one instance per target manifest file.

use assetmap_queue::{QueuedWriter, WriterState, WriterStats};
use tracing::{debug, info};

use crate::builder::AssetMapBuilder;
use crate::config::ManifestConfig;
use crate::error::{ManifestError, Result};
use crate::model::{BuildStats, Manifest};
use crate::output::ManifestFileWriter;

pub struct ManifestPlugin {
    builder: AssetMapBuilder,
    writer: QueuedWriter<Manifest, ManifestFileWriter>,
}

impl ManifestPlugin {
    /// Must be called from within a Tokio runtime.
    pub fn new(config: ManifestConfig) -> Result<Self> {
        config.validate()?;
        let builder = AssetMapBuilder::from_config(&config)?;
        let writer = QueuedWriter::new(ManifestFileWriter::from_config(&config));

        info!(
            "Writing asset manifest to {} ({} hosts)",
            config.output_path().display(),
            config.hosts.len()
        );

        Ok(Self { builder, writer })
    }

    pub fn fragment(&self, stats: &BuildStats) -> Manifest {
        self.builder
            .build(&stats.assets_by_chunk_name, stats.public_path.as_deref())
    }

    /// Hands one build's result to the writer without waiting.
    ///
    /// `done` is called exactly once, with the write error if there was one.
    pub fn after_emit<D>(&self, stats: &BuildStats, done: D)
    where
        D: FnOnce(Option<ManifestError>) + Send + 'static,
    {
        let fragment = self.fragment(stats);
        debug!("Queueing manifest fragment with {} chunks", fragment.len());
        self.writer.enqueue(fragment, move |outcome| done(outcome.err()));
    }

    /// Like [`after_emit`](Self::after_emit), but waits for the write.
    pub async fn emit(&self, stats: &BuildStats) -> Result<()> {
        let fragment = self.fragment(stats);
        self.writer.write(fragment).await
    }

    pub fn state(&self) -> WriterState {
        self.writer.state()
    }

    /// Builds waiting behind the write in flight.
    pub fn pending(&self) -> usize {
        self.writer.pending()
    }

    /// Finishes every queued write and stops the writer task.
    pub async fn shutdown(self) -> Result<WriterStats> {
        Ok(self.writer.shutdown().await?)
    }
}
