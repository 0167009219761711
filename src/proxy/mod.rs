pub mod http;

use async_trait::async_trait;

use crate::error::Result;

pub use http::HttpImageFetcher;

/// User agent sent to image hosts
pub const PROXY_USER_AGENT: &str = "Mozilla/5.0 (compatible; RecipeAPI/1.0)";

/// Image bytes fetched from an upstream host
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedImage {
    /// Upstream `Content-Type`, if it sent one
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Trait for upstream image sources behind the `/img` passthrough
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch an image. Non-success upstream statuses are errors.
    async fn fetch(&self, url: &str) -> Result<FetchedImage>;

    /// Get fetcher name for logging
    fn name(&self) -> &str;
}

/// Route an image reference through the proxy: `<prefix><percent-encoded url>`
pub fn rewrite_image_url(prefix: &str, original: &str) -> String {
    format!("{}{}", prefix, urlencoding::encode(original))
}
