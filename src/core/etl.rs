use crate::core::{CountryRecord, Pipeline, RunSummary, TransformResult};
use crate::utils::error::Result;

/// Drives a [`Pipeline`] one run at a time.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    /// Fetches, extracts and filters without touching storage.
    pub async fn scrape(&self) -> Result<TransformResult> {
        tracing::info!("Extracting countries...");
        let extraction = self.pipeline.extract().await?;
        let skipped = extraction.skipped;

        tracing::info!("Filtering countries...");
        let result = self.pipeline.transform(extraction).await?;
        tracing::info!(
            "Fetched {} countries data ({} malformed skipped)",
            result.records.len(),
            skipped
        );
        Ok(result)
    }

    pub async fn insert(&self, records: Vec<CountryRecord>, reference_area: f64) -> Result<usize> {
        let result = TransformResult {
            records,
            reference_area,
            below_reference: 0,
        };
        self.pipeline.load(result).await
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting countries crawl...");

        let extraction = self.pipeline.extract().await?;
        let skipped = extraction.skipped;

        let result = self.pipeline.transform(extraction).await?;
        let scraped = result.records.len();
        let reference_area = result.reference_area;

        let inserted = self.pipeline.load(result).await?;
        tracing::info!("Stored {} of {} countries", inserted, scraped);

        Ok(RunSummary {
            scraped,
            inserted,
            skipped,
            reference_area,
        })
    }
}
