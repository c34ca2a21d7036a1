//! Concurrent incremental-scroll crawler.
//!
//! Several workers open the same seed page in their own browser sessions,
//! scroll it to trigger lazy loading, and push every anchor whose href
//! contains the link marker into one shared, deduplicated set.
//!
//! # Architecture
//!
//! ```text
//!            ┌─ Worker 0: open → goto → scroll* → close ─┐
//! Crawler ───┼─ Worker 1: open → goto → scroll* → close ─┼──► CrawlState (set) ──► CrawlReport
//!            └─ Worker N: ...                           ─┘
//! ```
//!
//! Workers overlap on purpose; the shared set merges what they find. Each
//! worker stops on its own once it has seen `per_worker_target` distinct
//! links, the page height stops growing, it runs out of scroll passes, or
//! the crawl deadline passes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use eddy::browser::ChromeLauncher;
//! use eddy::crawler::{Crawler, CrawlerConfig};
//! use eddy::query::HtmlQuery;
//!
//! let config = CrawlerConfig::default();
//! let launcher = Arc::new(ChromeLauncher::launch(config.clone()).await?);
//! let crawler = Crawler::new(launcher, Arc::new(HtmlQuery), config);
//! let report = crawler.crawl("https://blog.example.com/c/rust", 2, 50).await?;
//! ```

mod config;
mod state;
mod worker;

#[cfg(test)]
mod fake;

pub use config::CrawlerConfig;
pub use state::{CrawlState, LinkSink};

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::app::{EddyError, Result};
use crate::browser::SessionLauncher;
use crate::domain::{CrawlReport, WorkerExit, WorkerReport};
use crate::query::DocumentQuery;
use worker::Worker;

/// How long past the deadline a worker may take to close its session
/// before its task is aborted
const CLOSE_GRACE: Duration = Duration::from_secs(10);

/// Stand-in for deadlines too far away to represent as an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `start + after`, capped instead of overflowing
fn instant_after(start: Instant, after: Duration) -> Instant {
    start
        .checked_add(after)
        .unwrap_or_else(|| start + FAR_FUTURE.min(after))
}

/// Orchestrates a pool of scroll workers over one seed URL
pub struct Crawler {
    launcher: Arc<dyn SessionLauncher>,
    query: Arc<dyn DocumentQuery>,
    config: Arc<CrawlerConfig>,
}

impl Crawler {
    pub fn new(
        launcher: Arc<dyn SessionLauncher>,
        query: Arc<dyn DocumentQuery>,
        config: CrawlerConfig,
    ) -> Self {
        Self {
            launcher,
            query,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Crawl with the worker count and per-worker target from the config
    pub async fn crawl_with_defaults(&self, seed: &str) -> Result<CrawlReport> {
        self.crawl(seed, self.config.workers, self.config.per_worker_target)
            .await
    }

    /// Run `worker_count` workers against `seed` and wait for all of them.
    ///
    /// Individual worker failures only truncate that worker's contribution.
    /// The crawl fails only when no worker could get a browser session.
    pub async fn crawl(
        &self,
        seed: &str,
        worker_count: usize,
        per_worker_target: usize,
    ) -> Result<CrawlReport> {
        if worker_count == 0 {
            return Err(EddyError::Crawl("worker count must be at least 1".to_string()));
        }

        let started_at = Utc::now();
        let deadline = instant_after(Instant::now(), self.config.deadline());
        let state = CrawlState::new(self.config.global_target);

        info!(
            "Crawling {} with {} workers, {} links each",
            seed, worker_count, per_worker_target
        );

        let mut handles = Vec::with_capacity(worker_count);
        for id in 0..worker_count {
            let worker = Worker {
                id,
                launcher: self.launcher.clone(),
                query: self.query.clone(),
                sink: state.sink(),
                config: self.config.clone(),
                target: per_worker_target,
                deadline,
            };
            handles.push(tokio::spawn(worker.run(seed.to_string())));
        }

        let mut reports: Vec<WorkerReport> = Vec::with_capacity(worker_count);
        for (id, mut handle) in handles.into_iter().enumerate() {
            match tokio::time::timeout_at(instant_after(deadline, CLOSE_GRACE), &mut handle).await {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(e)) => {
                    error!("Worker {} task join error: {}", id, e);
                    reports.push(WorkerReport::new(
                        id,
                        WorkerExit::Crashed {
                            error: e.to_string(),
                        },
                    ));
                }
                Err(_) => {
                    warn!("Worker {} did not shut down in time, aborting", id);
                    handle.abort();
                    // Resolves once the task is dropped, which releases its session
                    if let Err(e) = handle.await {
                        debug!("Worker {} aborted: {}", id, e);
                    }
                    reports.push(WorkerReport::new(id, WorkerExit::DeadlineElapsed));
                }
            }
        }

        let links = state.finish().await;

        if reports
            .iter()
            .all(|r| matches!(r.exit, WorkerExit::NoSession { .. }))
        {
            return Err(EddyError::Crawl(format!(
                "none of the {} workers could open a browser session",
                worker_count
            )));
        }

        let report = CrawlReport::new(seed, started_at, reports, links);
        info!(
            "Crawl of {} finished: {} unique links, {} failed workers",
            seed,
            report.links.len(),
            report.failed_workers()
        );

        Ok(report)
    }
}
