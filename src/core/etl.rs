use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting normalization");

        let raw = self.pipeline.extract().await?;
        tracing::debug!("Extracted {} characters", raw.len());

        let transformed = self.pipeline.transform(raw).await?;
        tracing::info!(
            "Normalized {} of {} records",
            transformed.summary.rows_written,
            transformed.summary.rows_read
        );

        let summary = self.pipeline.load(transformed).await?;
        if summary.rows_dropped > 0 {
            tracing::info!("Dropped {} records that failed to parse", summary.rows_dropped);
        }

        Ok(summary)
    }
}
