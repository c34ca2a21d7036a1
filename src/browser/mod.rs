//! Browser sessions used by the crawler.
//!
//! A [`SessionLauncher`] hands out fresh sessions; each [`BrowserSession`] is
//! owned by exactly one crawl worker for its whole life.
//!
//! ```text
//! SessionLauncher::open → goto(seed) → { scroll_to_bottom → page_markup }* → close
//! ```

mod chrome;

pub use chrome::{ChromeLauncher, ChromeSession};

use async_trait::async_trait;

use crate::app::Result;

/// A single rendered page driven by one worker
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate to `url` and wait for the load to finish
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// Scroll the viewport to the current bottom of the document
    async fn scroll_to_bottom(&mut self) -> Result<()>;

    /// Full scrollable height of the document
    async fn scroll_height(&mut self) -> Result<u64>;

    /// Viewport height plus the current vertical scroll offset
    async fn scroll_position(&mut self) -> Result<u64>;

    /// Snapshot of the rendered markup
    async fn page_markup(&mut self) -> Result<String>;

    /// Release the session. Calling it twice is a no-op.
    async fn close(&mut self) -> Result<()>;
}

/// Source of fresh browser sessions
#[async_trait]
pub trait SessionLauncher: Send + Sync {
    async fn open(&self) -> Result<Box<dyn BrowserSession>>;
}
