pub mod http_fetcher;

pub use http_fetcher::{HttpConfig, HttpFetcher};

use async_trait::async_trait;

use crate::app::Result;

/// Plain (non-rendering) page download
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
