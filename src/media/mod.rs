//! Media-manifest discovery on video pages.
//!
//! Video hosts commonly hide the stream URL inside a packed `<script>`.
//! The extractor picks out every packed script on a page and unpacks it.
//!
//! ```text
//! page HTML → <script> bodies → detect → unpacker::decode → .m3u8 URLs
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info};

use crate::app::Result;
use crate::fetcher::PageFetcher;
use crate::query::DocumentQuery;
use crate::unpacker;

/// Finds `.m3u8` URLs in packed scripts embedded in a page
#[derive(Clone)]
pub struct MediaExtractor {
    query: Arc<dyn DocumentQuery>,
}

impl MediaExtractor {
    pub fn new(query: Arc<dyn DocumentQuery>) -> Self {
        Self { query }
    }

    /// Unique media URLs from all packed scripts in `markup`, sorted
    pub fn extract(&self, markup: &str) -> Vec<String> {
        let scripts = self.query.script_bodies(markup);
        let packed: Vec<&String> = scripts.iter().filter(|s| unpacker::detect(s)).collect();
        debug!(
            "{} of {} scripts look packed",
            packed.len(),
            scripts.len()
        );

        packed
            .into_iter()
            .flat_map(|script| unpacker::decode(script))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Download `url` and extract its media URLs
    pub async fn scrape<F>(&self, fetcher: &F, url: &str) -> Result<Vec<String>>
    where
        F: PageFetcher + ?Sized,
    {
        let markup = fetcher.fetch_text(url).await?;
        let urls = self.extract(&markup);
        info!("Found {} media URLs on {}", urls.len(), url);
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::EddyError;
    use crate::query::HtmlQuery;
    use async_trait::async_trait;

    const VIDEO_PAGE: &str = r#"<html><head>
<script>var analytics = "https://stats.example.com/track.m3u8";</script>
<script type="text/javascript">eval(function(p,a,c,k,e,d){while(c--)if(k[c])p=p.replace(new RegExp('\\b'+c.toString(a)+'\\b','g'),k[c]);return p}('0 1={2:"3://4.5/6.7"};',36,8,'var|player|file|https|stream|tv|live|m3u8'.split('|'),0,{}))</script>
</head><body>
<script>eval(function(p,a,c,k,e,d){return p}('0 1={2:"3://4.5/6.7"};',36,8,'var|player|file|https|stream|tv|live|m3u8'.split('|'),0,{}))</script>
<script>eval(function(p,a,c,k,e,d){return p}('0("1")',36,2,'alert|hello'.split('|'),0,{}))</script>
</body></html>"#;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch_text(&self, _url: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl PageFetcher for FailingFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            Err(EddyError::Other(format!("refused: {}", url)))
        }
    }

    fn extractor() -> MediaExtractor {
        MediaExtractor::new(Arc::new(HtmlQuery))
    }

    #[test]
    fn test_extracts_unique_urls_from_packed_scripts() {
        let urls = extractor().extract(VIDEO_PAGE);
        assert_eq!(urls, vec!["https://stream.tv/live.m3u8"]);
    }

    #[test]
    fn test_page_without_packed_scripts() {
        let page = r#"<html><script>var src = "https://a.b/c.m3u8";</script></html>"#;
        assert!(extractor().extract(page).is_empty());
    }

    #[tokio::test]
    async fn test_scrape_fetches_then_extracts() {
        let urls = extractor()
            .scrape(&StaticFetcher(VIDEO_PAGE), "https://video.example.com/v/1")
            .await
            .unwrap();
        assert_eq!(urls, vec!["https://stream.tv/live.m3u8"]);
    }

    #[tokio::test]
    async fn test_scrape_propagates_fetch_errors() {
        let result = extractor()
            .scrape(&FailingFetcher, "https://video.example.com/v/1")
            .await;
        assert!(result.is_err());
    }
}
