use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

use crate::error::{RecipeEngineError, Result};
use crate::proxy::{FetchedImage, ImageFetcher, PROXY_USER_AGENT};

/// Fetches images over HTTP with reqwest
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    /// Create new fetcher with a 10s timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(10))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedImage> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, PROXY_USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(RecipeEngineError::Upstream {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = response.bytes().await?.to_vec();

        tracing::debug!("Fetched {} bytes from {}", bytes.len(), url);
        Ok(FetchedImage { content_type, bytes })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetcher_creation() {
        let fetcher = HttpImageFetcher::new().unwrap();
        assert_eq!(fetcher.name(), "http");
    }

    #[tokio::test]
    async fn test_invalid_url_is_error() {
        let fetcher = HttpImageFetcher::new().unwrap();
        let result = fetcher.fetch("not a url").await;
        assert!(matches!(result, Err(RecipeEngineError::HttpRequest(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_fetch_remote_image() {
        let fetcher = HttpImageFetcher::new().unwrap();
        let image = fetcher
            .fetch("https://www.rust-lang.org/static/images/rust-logo-blk.svg")
            .await
            .unwrap();

        assert!(!image.bytes.is_empty());
        assert!(image.content_type.is_some());
    }
}
