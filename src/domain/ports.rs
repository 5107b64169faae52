use crate::domain::model::{CountryRecord, Extraction, StoredCountry, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

/// Where the listing page comes from.
pub trait PageSource: Send + Sync {
    fn fetch_html(&self) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Append-only persistence for scraped countries, plus the reads the table view needs.
pub trait CountrySink: Send + Sync {
    fn insert_countries(
        &self,
        records: &[CountryRecord],
    ) -> impl std::future::Future<Output = Result<usize>> + Send;
    fn select_all(&self) -> impl std::future::Future<Output = Result<Vec<StoredCountry>>> + Send;
    fn column_names(&self) -> impl std::future::Future<Output = Result<Vec<String>>> + Send;
    fn last_updated(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<NaiveDateTime>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target_url(&self) -> &str;
    fn database_path(&self) -> &str;
    fn user_agent(&self) -> &str;
    fn timeout_seconds(&self) -> u64;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Extraction>;
    async fn transform(&self, data: Extraction) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<usize>;
}
