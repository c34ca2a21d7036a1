//! # Eddy
//!
//! Harvests links from lazily loaded listing pages and recovers media URLs
//! hidden in packed JavaScript.
//!
//! ## Architecture
//!
//! Two independent pipelines share the document-query layer:
//!
//! ```text
//! crawl: Crawler → N × BrowserSession (scroll) → DocumentQuery → CrawlState
//! media: PageFetcher → DocumentQuery (<script>) → Unpacker → .m3u8 URLs
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! # Crawl a listing with 4 workers, 100 links each
//! eddy crawl https://blog.example.com/c/rust -w 4 -t 100
//!
//! # Find the stream behind a video page
//! eddy media https://video.example.com/watch/123
//!
//! # Unpack a saved script
//! eddy unpack player.js --raw
//! ```
//!
//! ## Modules
//!
//! - [`app`]: Application context and error types
//! - [`browser`]: Browser session traits and the Chrome implementation
//! - [`cli`]: Command-line interface definitions
//! - [`config`]: TOML configuration
//! - [`crawler`]: Concurrent incremental-scroll crawler
//! - [`domain`]: Crawl and worker reports
//! - [`fetcher`]: Plain HTTP page downloads
//! - [`media`]: Media-manifest discovery on video pages
//! - [`query`]: HTML queries
//! - [`unpacker`]: "p,a,c,k,e,d" script unpacking

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together config,
/// fetcher, document query and media extractor.
pub mod app;

/// Browser sessions.
///
/// - [`BrowserSession`](browser::BrowserSession): one page owned by one worker
/// - [`SessionLauncher`](browser::SessionLauncher): hands out fresh sessions
/// - [`ChromeLauncher`](browser::ChromeLauncher): headless Chrome via chromiumoxide
pub mod browser;

/// Command-line interface using clap.
///
/// - `crawl <url>` - Scroll-crawl a listing page
/// - `media <url>` - Extract .m3u8 URLs from a video page
/// - `unpack [file]` - Unpack a packed script
pub mod cli;

/// Configuration loaded from `~/.config/eddy/config.toml`.
pub mod config;

/// Concurrent incremental-scroll crawler.
pub mod crawler;

/// Crawl results.
///
/// - [`CrawlReport`](domain::CrawlReport): deduplicated links plus per-worker outcomes
/// - [`WorkerReport`](domain::WorkerReport): how one worker ended
pub mod domain;

/// Plain HTTP fetching.
pub mod fetcher;

pub mod media;

pub mod query;

/// Recovery of media URLs from packed JavaScript.
pub mod unpacker;
