use crate::adapters::extractor::CountryExtractor;
use crate::adapters::http::save_snapshot;
use crate::core::filter;
use crate::core::{CountrySink, Extraction, PageSource, Pipeline, TransformResult};
use crate::utils::error::Result;
use std::path::PathBuf;

/// Fetch → extract → filter → persist for the countries page.
pub struct CountriesPipeline<F: PageSource, S: CountrySink> {
    pub(crate) source: F,
    pub(crate) extractor: CountryExtractor,
    pub(crate) sink: S,
    pub(crate) snapshot_path: Option<PathBuf>,
}

impl<F: PageSource, S: CountrySink> CountriesPipeline<F, S> {
    pub fn new(source: F, extractor: CountryExtractor, sink: S) -> Self {
        Self {
            source,
            extractor,
            sink,
            snapshot_path: None,
        }
    }

    /// Also write every fetched page to `path`.
    pub fn with_snapshot(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = Some(path.into());
        self
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

#[async_trait::async_trait]
impl<F: PageSource, S: CountrySink> Pipeline for CountriesPipeline<F, S> {
    async fn extract(&self) -> Result<Extraction> {
        let html = self.source.fetch_html().await?;

        if let Some(path) = &self.snapshot_path {
            save_snapshot(&html, path).await?;
        }

        let extraction = self.extractor.extract(&html)?;
        tracing::info!(
            "📊 Extracted {} countries ({} skipped), reference area {}",
            extraction.candidates.len(),
            extraction.skipped,
            extraction.reference_area
        );
        Ok(extraction)
    }

    async fn transform(&self, data: Extraction) -> Result<TransformResult> {
        let result = filter::transform(data);

        tracing::info!(
            "🔧 Kept {} countries larger than {} ({} dropped)",
            result.records.len(),
            result.reference_area,
            result.below_reference
        );
        tracing::debug!("First countries: {:?}", &result.records[..result.records.len().min(10)]);
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<usize> {
        tracing::info!("💾 Loading {} countries into storage", result.records.len());
        self.sink.insert_countries(&result.records).await
    }
}
