use clap::Parser;
use countries_crawler::app::export::export_csv;
use countries_crawler::app::table::{render_records, TableView};
use countries_crawler::config::cli::{Command, SourceOverrides};
use countries_crawler::utils::error::ErrorSeverity;
use countries_crawler::utils::{logger, validation::Validate};
use countries_crawler::{
    CliArgs, CountriesPipeline, CountryExtractor, CrawlerConfig, CrawlerError, EtlEngine,
    HttpFetcher, SqliteSink,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    if args.log_json {
        logger::init_json_logger(args.verbose);
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("Starting countries-crawler");
    tracing::debug!("CLI args: {:?}", args);

    if let Err(e) = execute(args).await {
        tracing::error!(
            "❌ Crawl failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn execute(args: CliArgs) -> countries_crawler::Result<()> {
    let mut config = CrawlerConfig::from_file(&args.config)?;

    match args.command {
        Command::Run(overrides) => {
            apply_overrides(&mut config, &overrides);
            config.validate()?;

            let engine = build_engine(&config, SqliteSink::open(&config.database.path)?)?;
            let summary = engine.run().await?;

            println!(
                "✅ Stored {} countries larger than {} km² ({} malformed entries skipped)",
                summary.inserted, summary.reference_area, summary.skipped
            );
        }
        Command::Scrape { overrides, json } => {
            apply_overrides(&mut config, &overrides);
            config.validate()?;

            // Never opened: scraping does not write.
            let engine = build_engine(&config, SqliteSink::new(&config.database.path))?;
            let result = engine.scrape().await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result.records)?);
            } else {
                println!("Countries larger than {} km²", result.reference_area);
                println!("{}", render_records(&result.records));
            }
        }
        Command::Show {
            db,
            filter_column,
            pattern,
        } => {
            let sink = SqliteSink::open(db.as_deref().unwrap_or(&config.database.path))?;
            let view = TableView::load(&sink).await?;

            let rows = match pattern {
                Some(pattern) => {
                    view.filter(filter_column.as_deref().unwrap_or("name"), &pattern)?
                }
                None => view.rows().iter().collect(),
            };

            println!("{}", view.caption());
            println!("{}", view.render(&rows));
        }
        Command::Export { db, output } => {
            let sink = SqliteSink::open(db.as_deref().unwrap_or(&config.database.path))?;
            let view = TableView::load(&sink).await?;
            let written = export_csv(&view, &output)?;
            println!("📁 Exported {} rows to {}", written, output.display());
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut CrawlerConfig, overrides: &SourceOverrides) {
    if let Some(url) = &overrides.url {
        tracing::info!("🔧 target_url overridden to: {}", url);
        config.data_processing.target_url = url.clone();
    }
    if let Some(db) = &overrides.db {
        tracing::info!("🔧 database.path overridden to: {}", db);
        config.database.path = db.clone();
    }
}

fn build_engine(
    config: &CrawlerConfig,
    sink: SqliteSink,
) -> Result<EtlEngine<CountriesPipeline<HttpFetcher, SqliteSink>>, CrawlerError> {
    let fetcher = HttpFetcher::from_config(config)?;
    let extractor = CountryExtractor::from_config(&config.extract)?;

    let mut pipeline = CountriesPipeline::new(fetcher, extractor, sink);
    if let Some(path) = config.snapshot_path() {
        pipeline = pipeline.with_snapshot(path);
    }

    Ok(EtlEngine::new(pipeline))
}
