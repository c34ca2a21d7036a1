use std::path::Path;
use std::sync::Arc;

use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::media::MediaExtractor;
use crate::query::{DocumentQuery, HtmlQuery};

/// Wires together the pieces every command needs.
///
/// The browser is not launched here; only `crawl` pays for Chrome.
pub struct AppContext {
    pub config: Config,
    pub fetcher: Arc<dyn PageFetcher>,
    pub query: Arc<dyn DocumentQuery>,
    pub media: MediaExtractor,
}

impl AppContext {
    /// Build a context from the config at `config_path`, or the default location.
    pub fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Self::with_config(config)
    }

    pub fn with_config(config: Config) -> Result<Self> {
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(&config.http)?);
        let query: Arc<dyn DocumentQuery> = Arc::new(HtmlQuery);
        let media = MediaExtractor::new(query.clone());

        Ok(Self {
            config,
            fetcher,
            query,
            media,
        })
    }
}
