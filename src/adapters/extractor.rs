//! CSS-selector extraction of country rows from the listing page.
//!
//! The page is parsed with the `scraper` crate. Every record element is
//! turned into a [`CountryRecord`], and the reference area is read either by
//! a fixed structural path or from the record carrying the reference
//! country's name. A record with a missing or malformed field is logged and
//! skipped; it never aborts the batch. A missing reference is fatal.

use crate::config::toml_config::ExtractConfig;
use crate::core::{CountryRecord, Extraction};
use crate::utils::error::{CrawlerError, Result};
use crate::utils::validation::parse_selector;
use scraper::{ElementRef, Html, Selector};

/// How the threshold area is located on the page.
#[derive(Debug, Clone)]
pub enum ReferenceLocator {
    /// A selector resolving to the element holding the reference area.
    Selector(Selector),
    /// The area of the extracted record with this name (case-insensitive).
    CountryName(String),
}

#[derive(Debug, Clone)]
pub struct CountryExtractor {
    reference: ReferenceLocator,
    record: Selector,
    name: Selector,
    capital: Selector,
    population: Selector,
    area: Selector,
}

impl CountryExtractor {
    pub fn from_config(config: &ExtractConfig) -> Result<Self> {
        let reference = match &config.reference_country {
            Some(country) => ReferenceLocator::CountryName(country.trim().to_string()),
            None => ReferenceLocator::Selector(parse_selector(
                "extract.reference_selector",
                config.reference_selector(),
            )?),
        };

        Ok(Self {
            reference,
            record: parse_selector("extract.record_selector", config.record_selector())?,
            name: parse_selector("extract.name_selector", config.name_selector())?,
            capital: parse_selector("extract.capital_selector", config.capital_selector())?,
            population: parse_selector(
                "extract.population_selector",
                config.population_selector(),
            )?,
            area: parse_selector("extract.area_selector", config.area_selector())?,
        })
    }

    pub fn extract(&self, html: &str) -> Result<Extraction> {
        let document = Html::parse_document(html);

        let mut candidates = Vec::new();
        let mut skipped = 0;

        for element in document.select(&self.record) {
            match self.extract_record(element) {
                Ok(record) => {
                    tracing::debug!(
                        name = %record.name,
                        capital = %record.capital,
                        population = %record.population,
                        area = record.area,
                        "country extracted"
                    );
                    candidates.push(record);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::error!("Skipping malformed country: {}", e);
                }
            }
        }

        let reference_area = match &self.reference {
            ReferenceLocator::Selector(selector) => {
                extract_float(document.root_element(), selector, "reference area")?
            }
            ReferenceLocator::CountryName(country) => candidates
                .iter()
                .find(|record| record.name.eq_ignore_ascii_case(country))
                .map(|record| record.area)
                .ok_or_else(|| {
                    CrawlerError::extraction(format!(
                        "Reference country '{}' not found on the page",
                        country
                    ))
                })?,
        };

        tracing::debug!("Reference area: {}", reference_area);

        Ok(Extraction {
            reference_area,
            candidates,
            skipped,
        })
    }

    fn extract_record(&self, element: ElementRef<'_>) -> Result<CountryRecord> {
        Ok(CountryRecord {
            name: extract_text(element, &self.name, "name")?,
            capital: extract_text(element, &self.capital, "capital")?,
            population: extract_text(element, &self.population, "population")?,
            area: extract_float(element, &self.area, "area")?,
        })
    }
}

/// Trimmed text of the first match of `selector` under `element`.
fn extract_text(element: ElementRef<'_>, selector: &Selector, field: &str) -> Result<String> {
    let target = element.select(selector).next().ok_or_else(|| {
        CrawlerError::extraction(format!(
            "Cannot find {} element in <{}>",
            field,
            describe(element)
        ))
    })?;

    let text = target.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        return Err(CrawlerError::extraction(format!(
            "Empty {} in <{}>",
            field,
            describe(element)
        )));
    }

    Ok(text)
}

fn extract_float(element: ElementRef<'_>, selector: &Selector, field: &str) -> Result<f64> {
    let text = extract_text(element, selector, field)?;
    let value: f64 = text.parse().map_err(|_| {
        CrawlerError::extraction(format!("Cannot extract float {} from: {}", field, text))
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(CrawlerError::extraction(format!(
            "{} must be a non-negative number, got {}",
            field, text
        )));
    }

    Ok(value)
}

fn describe(element: ElementRef<'_>) -> String {
    let value = element.value();
    match value.attr("class") {
        Some(class) => format!("{} class=\"{}\"", value.name(), class),
        None => value.name().to_string(),
    }
}
