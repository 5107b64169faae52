use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One country as scraped from the listing page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub capital: String,
    pub population: String,
    pub area: f64,
}

/// Extractor output: every well-formed record plus the threshold read from the page.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub reference_area: f64,
    pub candidates: Vec<CountryRecord>,
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<CountryRecord>,
    pub reference_area: f64,
    pub below_reference: usize,
}

/// A row read back from the `countries` table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCountry {
    pub id: i64,
    pub name: String,
    pub capital: String,
    pub population: String,
    pub area: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl StoredCountry {
    pub fn record(&self) -> CountryRecord {
        CountryRecord {
            name: self.name.clone(),
            capital: self.capital.clone(),
            population: self.population.clone(),
            area: self.area,
        }
    }

    /// Cell values in table column order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.capital.clone(),
            self.population.clone(),
            self.area.to_string(),
            self.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            self.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub scraped: usize,
    pub inserted: usize,
    pub skipped: usize,
    pub reference_area: f64,
}
