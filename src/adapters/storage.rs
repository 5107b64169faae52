use crate::core::{CountryRecord, CountrySink, StoredCountry};
use crate::utils::error::{CrawlerError, Result};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};

const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";

const CREATE_COUNTRIES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS countries (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL CHECK (length(name) > 0),
        capital TEXT NOT NULL CHECK (length(capital) > 0),
        population TEXT NOT NULL CHECK (length(population) > 0),
        area REAL NOT NULL CHECK (area >= 0),
        created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TRIGGER IF NOT EXISTS countries_touch_updated_at
    AFTER UPDATE OF name, capital, population, area ON countries
    BEGIN
        UPDATE countries SET updated_at = CURRENT_TIMESTAMP WHERE id = NEW.id;
    END;
"#;

const INSERT_COUNTRY: &str =
    "INSERT INTO countries (name, capital, population, area) VALUES (?1, ?2, ?3, ?4)";
const SELECT_ALL: &str = "SELECT id, name, capital, population, area, created_at, updated_at \
                          FROM countries ORDER BY id";
const SELECT_LAST_UPDATED: &str = "SELECT MAX(updated_at) FROM countries";

/// SQLite-backed `countries` table.
#[derive(Debug, Clone)]
pub struct SqliteSink {
    db_path: PathBuf,
}

impl SqliteSink {
    /// Points at `db_path` without touching the filesystem.
    pub fn new(db_path: impl AsRef<Path>) -> Self {
        Self {
            db_path: db_path.as_ref().to_path_buf(),
        }
    }

    /// Opens (creating if needed) the database and makes sure the table exists.
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self> {
        let sink = Self::new(db_path);
        sink.create_countries_table()?;
        tracing::info!("🗄️ Using SQLite database '{}'", sink.db_path.display());
        Ok(sink)
    }

    pub fn create_countries_table(&self) -> Result<()> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = self.connect()?;
        conn.execute_batch(CREATE_COUNTRIES_TABLE)
            .map_err(|e| log_failure("CREATE TABLE countries", e))
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(|e| {
            tracing::error!(
                "Failed to connect to SQLite database '{}': {}",
                self.db_path.display(),
                e
            );
            CrawlerError::StorageError(e)
        })
    }

    fn insert_batch(&self, records: &[CountryRecord]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(INSERT_COUNTRY)?;
            for record in records {
                stmt.execute(params![
                    record.name,
                    record.capital,
                    record.population,
                    record.area
                ])?;
            }
        }
        tx.commit()?;
        Ok(records.len())
    }

    fn read_all(&self) -> Result<Vec<StoredCountry>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, f64>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut countries = Vec::new();
        for row in rows {
            let (id, name, capital, population, area, created_at, updated_at) = row?;
            countries.push(StoredCountry {
                id,
                name,
                capital,
                population,
                area,
                created_at: parse_timestamp(&created_at)?,
                updated_at: parse_timestamp(&updated_at)?,
            });
        }
        Ok(countries)
    }

    fn read_column_names(&self) -> Result<Vec<String>> {
        let conn = self.connect()?;
        let stmt = conn.prepare("SELECT * FROM countries LIMIT 1")?;
        Ok(stmt.column_names().into_iter().map(String::from).collect())
    }

    fn read_last_updated(&self) -> Result<Option<NaiveDateTime>> {
        let conn = self.connect()?;
        let max: Option<String> = conn.query_row(SELECT_LAST_UPDATED, [], |row| row.get(0))?;
        max.as_deref().map(parse_timestamp).transpose()
    }
}

impl CountrySink for SqliteSink {
    async fn insert_countries(&self, records: &[CountryRecord]) -> Result<usize> {
        if records.is_empty() {
            tracing::info!("Nothing to insert");
            return Ok(0);
        }

        match self.insert_batch(records) {
            Ok(inserted) => {
                tracing::info!("Successfully inserted: {} rows.", inserted);
                Ok(inserted)
            }
            Err(e) => {
                tracing::error!("Error executing [{}]: {} (batch rolled back)", INSERT_COUNTRY, e);
                Err(e)
            }
        }
    }

    async fn select_all(&self) -> Result<Vec<StoredCountry>> {
        let rows = self
            .read_all()
            .inspect_err(|e| tracing::error!("Error executing [{}]: {}", SELECT_ALL, e))?;
        tracing::info!("Successfully retrieved all: {} rows.", rows.len());
        tracing::debug!("First rows: {:?}", &rows[..rows.len().min(10)]);
        Ok(rows)
    }

    async fn column_names(&self) -> Result<Vec<String>> {
        let columns = self
            .read_column_names()
            .inspect_err(|e| tracing::error!("Error reading column names: {}", e))?;
        tracing::debug!("Column names: {:?}", columns);
        Ok(columns)
    }

    async fn last_updated(&self) -> Result<Option<NaiveDateTime>> {
        self.read_last_updated()
            .inspect_err(|e| tracing::error!("Error executing [{}]: {}", SELECT_LAST_UPDATED, e))
    }
}

fn log_failure(statement: &str, e: rusqlite::Error) -> CrawlerError {
    tracing::error!("Error executing [{}]: {}", statement, e);
    CrawlerError::StorageError(e)
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, SQLITE_TIMESTAMP).map_err(|e| {
        CrawlerError::StorageError(rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(e),
        ))
    })
}
