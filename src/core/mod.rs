pub mod etl;
pub mod filter;
pub mod pipeline;

pub use crate::domain::model::{CountryRecord, Extraction, RunSummary, StoredCountry, TransformResult};
pub use crate::domain::ports::{ConfigProvider, CountrySink, PageSource, Pipeline};
pub use crate::utils::error::Result;
