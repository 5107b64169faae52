pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{extractor::CountryExtractor, http::HttpFetcher, storage::SqliteSink};
pub use app::table::TableView;
pub use config::CrawlerConfig;
pub use core::{etl::EtlEngine, pipeline::CountriesPipeline};
pub use domain::model::{CountryRecord, RunSummary, StoredCountry};
pub use utils::error::{CrawlerError, Result};
