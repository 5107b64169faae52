use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlerError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Extraction error: {message}")]
    ExtractionError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Storage error: {0}")]
    StorageError(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV export error: {0}")]
    CsvError(#[from] csv::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Extraction,
    Configuration,
    Storage,
    FileSystem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CrawlerError {
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::ExtractionError {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkError(_) => ErrorCategory::Network,
            Self::ExtractionError { .. } => ErrorCategory::Extraction,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::StorageError(_) => ErrorCategory::Storage,
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                ErrorCategory::FileSystem
            }
        }
    }

    /// Drives the CLI exit code (Medium = 2, High = 1, Critical = 3).
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Extraction | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::FileSystem => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NetworkError(e) if e.is_timeout() => {
                "The server did not answer in time; raise timeout_seconds or try again later"
            }
            Self::NetworkError(e) if e.is_status() => {
                "The server rejected the request; check that target_url still points at the countries page"
            }
            Self::NetworkError(_) => "Check your network connection and the target_url setting",
            Self::ExtractionError { .. } => {
                "The page layout may have changed; review the selectors in the [extract] section"
            }
            Self::ConfigError { .. } => "Make sure the config file exists and is valid TOML",
            Self::InvalidConfigValueError { .. } => "Correct the value in the config file",
            Self::StorageError(_) => {
                "Check that the database path is writable and the file is a valid SQLite database"
            }
            Self::IoError(_) | Self::SerializationError(_) | Self::CsvError(_) => {
                "Check file permissions and free disk space"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not download the countries page: {}", self),
            ErrorCategory::Extraction => format!("Could not read the countries page: {}", self),
            ErrorCategory::Configuration => format!("Bad configuration: {}", self),
            ErrorCategory::Storage => format!("Database failure: {}", self),
            ErrorCategory::FileSystem => format!("File operation failed: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_and_severity() {
        let err = CrawlerError::extraction("no area");
        assert_eq!(err.category(), ErrorCategory::Extraction);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = CrawlerError::config("TOML parsing error: missing field `database`");
        assert_eq!(err.category(), ErrorCategory::Configuration);
        assert!(err.user_friendly_message().starts_with("Bad configuration"));

        let err = CrawlerError::StorageError(rusqlite::Error::InvalidQuery);
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_display_messages() {
        let err = CrawlerError::InvalidConfigValueError {
            field: "database.path".to_string(),
            value: "".to_string(),
            reason: "Path cannot be empty".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value '' for database.path: Path cannot be empty"
        );
    }
}
