use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the scroll crawler
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Whether to run the browser in headless mode (default: true)
    pub headless: bool,

    /// Navigation timeout in seconds (default: 30)
    pub timeout_secs: u64,

    /// Wait after the seed page loads, in milliseconds (default: 5000)
    pub settle_delay_ms: u64,

    /// Wait after each scroll for lazy content, in milliseconds (default: 2000)
    pub scroll_delay_ms: u64,

    /// Substring an anchor's href must contain to be collected (default: "/a/")
    pub link_marker: String,

    /// Number of parallel workers (default: 2)
    pub workers: usize,

    /// Distinct links a worker collects before it stops (default: 50)
    pub per_worker_target: usize,

    /// Hard cap on scroll passes per worker (default: 300)
    pub max_scroll_passes: usize,

    /// Whole-crawl deadline in seconds (default: 600)
    pub deadline_secs: u64,

    /// Stop every worker once the shared set holds this many links
    pub global_target: Option<usize>,

    /// User agent string to use
    pub user_agent: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            headless: true,
            timeout_secs: 30,
            settle_delay_ms: 5000,
            scroll_delay_ms: 2000,
            link_marker: "/a/".to_string(),
            workers: 2,
            per_worker_target: 50,
            max_scroll_passes: 300,
            deadline_secs: 600,
            global_target: None,
            user_agent: Some(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                    .to_string(),
            ),
        }
    }
}

impl CrawlerConfig {
    /// Get the navigation timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get the post-navigation settle delay as a Duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Get the post-scroll delay as a Duration
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    /// Get the crawl deadline as a Duration
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}
