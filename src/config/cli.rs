use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "countries-crawler")]
#[command(about = "Scrapes the countries listing, keeps the ones larger than Bulgaria and stores them")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, global = true, default_value = "crawler.toml")]
    pub config: PathBuf,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Scrape the page and append the filtered countries to the database
    Run(SourceOverrides),
    /// Scrape and print the filtered countries without writing anything
    Scrape {
        #[command(flatten)]
        overrides: SourceOverrides,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the stored countries
    Show {
        #[arg(long)]
        db: Option<String>,

        /// Column to filter on (defaults to `name`)
        #[arg(long, requires = "pattern")]
        filter_column: Option<String>,

        /// Case-insensitive regular expression matched against the filter column
        #[arg(long)]
        pattern: Option<String>,
    },
    /// Write the stored countries to a CSV file
    Export {
        #[arg(long)]
        db: Option<String>,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct SourceOverrides {
    /// Override data_processing.target_url
    #[arg(long)]
    pub url: Option<String>,

    /// Override database.path
    #[arg(long)]
    pub db: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_overrides() {
        let args = CliArgs::parse_from([
            "countries-crawler",
            "--config",
            "other.toml",
            "run",
            "--url",
            "http://localhost:9000/simple/",
        ]);
        assert_eq!(args.config, PathBuf::from("other.toml"));
        match args.command {
            Command::Run(overrides) => {
                assert_eq!(overrides.url.as_deref(), Some("http://localhost:9000/simple/"));
                assert!(overrides.db.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_filter_column_requires_pattern() {
        let result = CliArgs::try_parse_from([
            "countries-crawler",
            "show",
            "--filter-column",
            "capital",
        ]);
        assert!(result.is_err());
    }
}
