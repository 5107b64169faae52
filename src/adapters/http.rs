use crate::core::{ConfigProvider, PageSource};
use crate::utils::error::Result;
use reqwest::Client;
use std::path::Path;
use std::time::Duration;

/// Downloads the countries page with a fixed user agent and timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    target_url: String,
}

impl HttpFetcher {
    pub fn new(target_url: impl Into<String>, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            target_url: target_url.into(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Self::new(
            config.target_url(),
            config.user_agent(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn target_url(&self) -> &str {
        &self.target_url
    }

    async fn get_html(&self) -> Result<String> {
        let response = self.client.get(&self.target_url).send().await?;
        tracing::debug!("Response status: {}", response.status());

        let response = response.error_for_status()?;
        let body = response.bytes().await?;

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

impl PageSource for HttpFetcher {
    async fn fetch_html(&self) -> Result<String> {
        tracing::debug!("GET {}", self.target_url);

        match self.get_html().await {
            Ok(html) => {
                tracing::info!("🌐 HTML retrieved ({} bytes)", html.len());
                Ok(html)
            }
            Err(e) => {
                tracing::error!("Failed to retrieve HTML from {}: {}", self.target_url, e);
                Err(e)
            }
        }
    }
}

/// Writes the fetched page to disk, creating parent directories as needed.
pub async fn save_snapshot(html: &str, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, html).await?;
    tracing::debug!("HTML snapshot written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::CrawlerError;
    use httpmock::prelude::*;

    fn fetcher(url: String) -> HttpFetcher {
        HttpFetcher::new(url, "A scrapper for learning", Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_user_agent() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/pages/simple/")
                .header("User-Agent", "A scrapper for learning");
            then.status(200)
                .header("Content-Type", "text/html; charset=utf-8")
                .body("<html><body>Åland</body></html>");
        });

        let html = fetcher(server.url("/pages/simple/")).fetch_html().await.unwrap();

        page_mock.assert();
        assert!(html.contains("Åland"));
    }

    #[tokio::test]
    async fn test_fetch_404_is_network_error() {
        let server = MockServer::start();
        let page_mock = server.mock(|when, then| {
            when.method(GET).path("/missing");
            then.status(404);
        });

        let err = fetcher(server.url("/missing")).fetch_html().await.unwrap_err();

        page_mock.assert();
        match err {
            CrawlerError::NetworkError(e) => assert!(e.is_status()),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_network_error() {
        // Nothing listens on port 9 on test machines.
        let err = fetcher("http://127.0.0.1:9/".to_string())
            .fetch_html()
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlerError::NetworkError(_)));
    }

    #[test]
    fn test_save_snapshot_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("data").join("content.html");

        tokio_test::block_on(save_snapshot("<html></html>", &path)).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<html></html>");
    }
}
