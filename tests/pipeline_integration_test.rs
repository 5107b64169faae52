use countries_crawler::config::toml_config::ExtractConfig;
use countries_crawler::core::CountrySink;
use countries_crawler::{
    CountriesPipeline, CountryExtractor, CrawlerConfig, CrawlerError, EtlEngine, HttpFetcher,
    SqliteSink, TableView,
};
use httpmock::prelude::*;
use std::time::Duration;
use tempfile::TempDir;

const FIXTURE: &str = include_str!("fixtures/countries.html");

fn engine_for(
    url: String,
    db_path: &std::path::Path,
    extract: &ExtractConfig,
) -> EtlEngine<CountriesPipeline<HttpFetcher, SqliteSink>> {
    let fetcher = HttpFetcher::new(url, "A scrapper for learning", Duration::from_secs(5)).unwrap();
    let extractor = CountryExtractor::from_config(extract).unwrap();
    let sink = SqliteSink::open(db_path).unwrap();
    EtlEngine::new(CountriesPipeline::new(fetcher, extractor, sink))
}

#[tokio::test]
async fn test_end_to_end_run_stores_countries_larger_than_bulgaria() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("countries.db");

    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/pages/simple/")
            .header("User-Agent", "A scrapper for learning");
        then.status(200)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(FIXTURE);
    });

    let engine = engine_for(server.url("/pages/simple/"), &db_path, &ExtractConfig::default());
    let summary = engine.run().await.unwrap();

    page_mock.assert();
    assert_eq!(summary.reference_area, 110994.0);
    assert_eq!(summary.scraped, 6);
    assert_eq!(summary.inserted, 6);
    assert_eq!(summary.skipped, 2);

    let stored = engine.pipeline().sink().select_all().await.unwrap();
    assert_eq!(stored.len(), 6);
    assert!(stored.iter().all(|c| c.area > summary.reference_area));
    assert!(stored.iter().any(|c| c.name == "Germany" && c.capital == "Berlin"));
    assert!(stored.iter().all(|c| c.name != "Bulgaria" && c.name != "Cuba"));
}

#[tokio::test]
async fn test_http_404_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("countries.db");

    let server = MockServer::start();
    let page_mock = server.mock(|when, then| {
        when.method(GET).path("/pages/simple/");
        then.status(404);
    });

    let engine = engine_for(server.url("/pages/simple/"), &db_path, &ExtractConfig::default());
    let result = engine.run().await;

    page_mock.assert();
    assert!(matches!(result, Err(CrawlerError::NetworkError(_))));

    let sink = SqliteSink::open(&db_path).unwrap();
    assert!(sink.select_all().await.unwrap().is_empty());
    assert_eq!(sink.last_updated().await.unwrap(), None);
}

#[tokio::test]
async fn test_scrape_does_not_persist() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("countries.db");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pages/simple/");
        then.status(200).body(FIXTURE);
    });

    let engine = engine_for(server.url("/pages/simple/"), &db_path, &ExtractConfig::default());
    let result = engine.scrape().await.unwrap();

    assert_eq!(result.records.len(), 6);
    assert_eq!(result.below_reference, 7);
    assert!(engine.pipeline().sink().select_all().await.unwrap().is_empty());

    // Inserting the scraped batch afterwards behaves like a full run.
    let inserted = engine
        .insert(result.records.clone(), result.reference_area)
        .await
        .unwrap();
    assert_eq!(inserted, 6);
}

#[tokio::test]
async fn test_zero_reference_keeps_every_wellformed_country() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("countries.db");
    let page = FIXTURE.replace(
        r#"<span class="country-area">110994.0</span>"#,
        r#"<span class="country-area">0</span>"#,
    );

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pages/simple/");
        then.status(200).body(page);
    });

    let engine = engine_for(server.url("/pages/simple/"), &db_path, &ExtractConfig::default());
    let summary = engine.run().await.unwrap();

    // Bulgaria itself now has area 0 and is the only one not strictly above it.
    assert_eq!(summary.reference_area, 0.0);
    assert_eq!(summary.inserted, 12);
    assert_eq!(summary.skipped, 2);
}

#[tokio::test]
async fn test_runs_append_and_table_view_reads_back() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("nested").join("countries.db");

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pages/simple/");
        then.status(200).body(FIXTURE);
    });

    let extract = ExtractConfig {
        reference_country: Some("Bulgaria".to_string()),
        ..ExtractConfig::default()
    };
    let engine = engine_for(server.url("/pages/simple/"), &db_path, &extract);
    engine.run().await.unwrap();
    engine.run().await.unwrap();

    let view = TableView::load(engine.pipeline().sink()).await.unwrap();
    assert_eq!(view.rows().len(), 12);
    assert_eq!(view.columns()[0], "id");
    assert_eq!(view.filter("name", "^ger").unwrap().len(), 2);
    assert!(view.caption().starts_with("Countries crawled on "));
}

#[tokio::test]
async fn test_config_file_drives_the_run() {
    let temp_dir = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/pages/simple/");
        then.status(200).body(FIXTURE);
    });

    let db_path = temp_dir.path().join("countries.db");
    let snapshot_path = temp_dir.path().join("data").join("content.html");
    let config_content = format!(
        r#"
[data_processing]
target_url = "{}"
timeout_seconds = 3
snapshot_path = "{}"

[database]
path = "{}"
"#,
        server.url("/pages/simple/"),
        snapshot_path.display().to_string().replace('\\', "/"),
        db_path.display().to_string().replace('\\', "/"),
    );
    let config_path = temp_dir.path().join("crawler.toml");
    tokio::fs::write(&config_path, config_content).await.unwrap();

    let config = CrawlerConfig::from_file(&config_path).unwrap();
    config.validate_config().unwrap();

    let fetcher = HttpFetcher::from_config(&config).unwrap();
    let extractor = CountryExtractor::from_config(&config.extract).unwrap();
    let sink = SqliteSink::open(&config.database.path).unwrap();
    let pipeline = CountriesPipeline::new(fetcher, extractor, sink)
        .with_snapshot(config.snapshot_path().unwrap());

    let summary = EtlEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.inserted, 6);
    assert!(snapshot_path.exists());
}
