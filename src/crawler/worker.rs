use std::collections::HashSet;
use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::app::Result;
use crate::browser::{BrowserSession, SessionLauncher};
use crate::crawler::config::CrawlerConfig;
use crate::crawler::state::LinkSink;
use crate::domain::{WorkerExit, WorkerPhase, WorkerReport};
use crate::query::DocumentQuery;

/// One crawl worker: a private browser session scrolling the seed page
pub(crate) struct Worker {
    pub id: usize,
    pub launcher: Arc<dyn SessionLauncher>,
    pub query: Arc<dyn DocumentQuery>,
    pub sink: LinkSink,
    pub config: Arc<CrawlerConfig>,
    pub target: usize,
    pub deadline: Instant,
}

/// Worker-local bookkeeping, kept outside the scroll future so partial
/// results survive errors and the deadline.
#[derive(Debug, Default)]
struct Progress {
    phase: Option<WorkerPhase>,
    passes: usize,
    last_height: Option<u64>,
    seen: HashSet<String>,
    contributed: usize,
}

impl Progress {
    fn phase(&self) -> WorkerPhase {
        self.phase.unwrap_or(WorkerPhase::Init)
    }

    /// Called once the session is closed, whatever the exit
    fn finish(&mut self) {
        self.phase = Some(WorkerPhase::Done);
    }
}

impl Worker {
    /// Run to completion. Never fails: every outcome is folded into the report.
    pub async fn run(self, seed: String) -> WorkerReport {
        let mut session = match self.launcher.open().await {
            Ok(session) => session,
            Err(e) => {
                warn!("Worker {} could not acquire a browser session: {}", self.id, e);
                return WorkerReport::new(self.id, WorkerExit::NoSession { error: e.to_string() });
            }
        };

        let mut progress = Progress::default();
        let outcome = tokio::time::timeout_at(
            self.deadline,
            self.drive(session.as_mut(), &seed, &mut progress),
        )
        .await;

        let exit = match outcome {
            Ok(Ok(exit)) => exit,
            Ok(Err(e)) => {
                warn!(
                    "Worker {} stopped during {} after {} passes: {}",
                    self.id,
                    progress.phase(),
                    progress.passes,
                    e
                );
                WorkerExit::Failed {
                    phase: progress.phase(),
                    error: e.to_string(),
                }
            }
            Err(_) => {
                warn!(
                    "Worker {} hit the crawl deadline during {}",
                    self.id,
                    progress.phase()
                );
                WorkerExit::DeadlineElapsed
            }
        };

        if let Err(e) = session.close().await {
            warn!("Worker {} failed to close its session: {}", self.id, e);
        }
        progress.finish();

        info!(
            "Worker {} {} ({:?}): {} passes, {} links seen, {} new",
            self.id,
            progress.phase(),
            exit,
            progress.passes,
            progress.seen.len(),
            progress.contributed
        );

        WorkerReport {
            worker: self.id,
            exit,
            passes: progress.passes,
            links_seen: progress.seen.len(),
            links_contributed: progress.contributed,
            last_height: progress.last_height,
        }
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        seed: &str,
        progress: &mut Progress,
    ) -> Result<WorkerExit> {
        progress.phase = Some(WorkerPhase::Navigate);
        session.goto(seed).await?;
        tokio::time::sleep(self.config.settle_delay()).await;
        progress.last_height = Some(session.scroll_height().await?);

        progress.phase = Some(WorkerPhase::ScrollLoop);
        loop {
            if progress.passes >= self.config.max_scroll_passes {
                return Ok(WorkerExit::PassLimit);
            }

            session.scroll_to_bottom().await?;
            tokio::time::sleep(self.config.scroll_delay()).await;

            let markup = session.page_markup().await?;
            let fresh: Vec<String> = self
                .query
                .hrefs_containing(&markup, &self.config.link_marker)
                .into_iter()
                .filter(|link| progress.seen.insert(link.clone()))
                .collect();
            let found = fresh.len();
            progress.contributed += self.sink.insert_all(fresh).await;
            progress.passes += 1;

            let height = session.scroll_height().await?;
            let position = session.scroll_position().await?;
            let grew = progress.last_height.map_or(true, |last| height > last);
            progress.last_height = Some(height);

            debug!(
                "Worker {} pass {}: {} new links, at {}/{}px",
                self.id, progress.passes, found, position, height
            );

            if progress.seen.len() >= self.target {
                return Ok(WorkerExit::TargetReached);
            }
            if self.sink.is_saturated().await {
                return Ok(WorkerExit::GlobalTargetReached);
            }
            if !grew {
                return Ok(WorkerExit::Exhausted);
            }
        }
    }
}
