use crate::core::{CountryRecord, CountrySink, StoredCountry};
use crate::utils::error::{CrawlerError, Result};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use regex::RegexBuilder;

const CAPTION_FORMAT: &str = "%d.%m.%y, %H:%M:%S";

/// Snapshot of the `countries` table prepared for display.
#[derive(Debug, Clone)]
pub struct TableView {
    columns: Vec<String>,
    rows: Vec<StoredCountry>,
    last_updated: Option<NaiveDateTime>,
}

impl TableView {
    pub async fn load<S: CountrySink>(sink: &S) -> Result<Self> {
        let columns = sink.column_names().await?;
        let rows = sink.select_all().await?;
        let last_updated = sink.last_updated().await?;
        Ok(Self::new(columns, rows, last_updated))
    }

    /// Rows are kept sorted by their first column (`id`).
    pub fn new(
        columns: Vec<String>,
        mut rows: Vec<StoredCountry>,
        last_updated: Option<NaiveDateTime>,
    ) -> Self {
        rows.sort_by_key(|row| row.id);
        Self {
            columns,
            rows,
            last_updated,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[StoredCountry] {
        &self.rows
    }

    /// Caption shown above the table; falls back to now when nothing is stored.
    pub fn caption(&self) -> String {
        let when = match self.last_updated {
            Some(naive) => DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc).with_timezone(&Local),
            None => Local::now(),
        };
        format!("Countries crawled on {}", when.format(CAPTION_FORMAT))
    }

    /// Rows whose `column` matches `pattern` as a case-insensitive regex.
    pub fn filter(&self, column: &str, pattern: &str) -> Result<Vec<&StoredCountry>> {
        let index = self
            .columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .ok_or_else(|| CrawlerError::InvalidConfigValueError {
                field: "filter_column".to_string(),
                value: column.to_string(),
                reason: format!("Unknown column. Columns: {}", self.columns.join(", ")),
            })?;

        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| CrawlerError::InvalidConfigValueError {
                field: "pattern".to_string(),
                value: pattern.to_string(),
                reason: e.to_string(),
            })?;

        Ok(self
            .rows
            .iter()
            .filter(|row| {
                row.cells()
                    .get(index)
                    .is_some_and(|cell| regex.is_match(cell))
            })
            .collect())
    }

    pub fn render(&self, rows: &[&StoredCountry]) -> String {
        let cells: Vec<Vec<String>> = rows.iter().map(|row| row.cells()).collect();
        render_grid(&self.columns, &cells)
    }
}

/// Renders scraped (not yet stored) records with the four record columns.
pub fn render_records(records: &[CountryRecord]) -> String {
    let headers = ["name", "capital", "population", "area"].map(String::from);
    let cells: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.capital.clone(),
                r.population.clone(),
                r.area.to_string(),
            ]
        })
        .collect();
    render_grid(&headers, &cells)
}

fn render_grid(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(format_row(headers));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    lines.extend(rows.iter().map(|row| format_row(row)));
    lines.join("\n")
}
