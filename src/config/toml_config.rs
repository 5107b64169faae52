use crate::core::ConfigProvider;
use crate::utils::error::{CrawlerError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_USER_AGENT: &str = "A scrapper for learning";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 5;

pub const DEFAULT_REFERENCE_SELECTOR: &str =
    "#countries > div > div:nth-child(11) > div:nth-child(1) > div > span.country-area";
pub const DEFAULT_RECORD_SELECTOR: &str = "#countries div.country";
pub const DEFAULT_NAME_SELECTOR: &str = "h3";
pub const DEFAULT_CAPITAL_SELECTOR: &str = ".country-capital";
pub const DEFAULT_POPULATION_SELECTOR: &str = ".country-population";
pub const DEFAULT_AREA_SELECTOR: &str = ".country-area";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    pub data_processing: DataProcessingConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataProcessingConfig {
    pub target_url: String,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub reference_selector: Option<String>,
    /// Takes precedence over `reference_selector` when set.
    pub reference_country: Option<String>,
    pub record_selector: Option<String>,
    pub name_selector: Option<String>,
    pub capital_selector: Option<String>,
    pub population_selector: Option<String>,
    pub area_selector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
}

impl ExtractConfig {
    pub fn reference_selector(&self) -> &str {
        self.reference_selector
            .as_deref()
            .unwrap_or(DEFAULT_REFERENCE_SELECTOR)
    }

    pub fn record_selector(&self) -> &str {
        self.record_selector
            .as_deref()
            .unwrap_or(DEFAULT_RECORD_SELECTOR)
    }

    pub fn name_selector(&self) -> &str {
        self.name_selector.as_deref().unwrap_or(DEFAULT_NAME_SELECTOR)
    }

    pub fn capital_selector(&self) -> &str {
        self.capital_selector
            .as_deref()
            .unwrap_or(DEFAULT_CAPITAL_SELECTOR)
    }

    pub fn population_selector(&self) -> &str {
        self.population_selector
            .as_deref()
            .unwrap_or(DEFAULT_POPULATION_SELECTOR)
    }

    pub fn area_selector(&self) -> &str {
        self.area_selector.as_deref().unwrap_or(DEFAULT_AREA_SELECTOR)
    }
}

impl CrawlerConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            let message = format!("Cannot read configuration file '{}': {}", path.display(), e);
            tracing::error!("{}", message);
            CrawlerError::config(message)
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| {
            let message = format!("TOML parsing error: {}", e);
            tracing::error!("{}", message);
            CrawlerError::config(message)
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| CrawlerError::config(format!("Bad substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("data_processing.target_url", &self.data_processing.target_url)?;
        validation::validate_path("database.path", &self.database.path)?;
        validation::validate_non_empty_string("data_processing.user_agent", self.user_agent())?;
        validation::validate_range(
            "data_processing.timeout_seconds",
            self.timeout_seconds(),
            1,
            300,
        )?;

        if let Some(snapshot) = &self.data_processing.snapshot_path {
            validation::validate_path("data_processing.snapshot_path", snapshot)?;
        }
        if let Some(country) = &self.extract.reference_country {
            validation::validate_non_empty_string("extract.reference_country", country)?;
        }

        let selectors = [
            ("extract.reference_selector", self.extract.reference_selector()),
            ("extract.record_selector", self.extract.record_selector()),
            ("extract.name_selector", self.extract.name_selector()),
            ("extract.capital_selector", self.extract.capital_selector()),
            ("extract.population_selector", self.extract.population_selector()),
            ("extract.area_selector", self.extract.area_selector()),
        ];
        for (field, css) in selectors {
            validation::parse_selector(field, css)?;
        }

        Ok(())
    }

    pub fn snapshot_path(&self) -> Option<&str> {
        self.data_processing.snapshot_path.as_deref()
    }
}

impl ConfigProvider for CrawlerConfig {
    fn target_url(&self) -> &str {
        &self.data_processing.target_url
    }

    fn database_path(&self) -> &str {
        &self.database.path
    }

    fn user_agent(&self) -> &str {
        self.data_processing
            .user_agent
            .as_deref()
            .unwrap_or(DEFAULT_USER_AGENT)
    }

    fn timeout_seconds(&self) -> u64 {
        self.data_processing
            .timeout_seconds
            .unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl Validate for CrawlerConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
