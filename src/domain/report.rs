use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a crawl worker is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerPhase {
    Init,
    Navigate,
    ScrollLoop,
    Done,
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerPhase::Init => "init",
            WorkerPhase::Navigate => "navigate",
            WorkerPhase::ScrollLoop => "scroll",
            WorkerPhase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Why a worker stopped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum WorkerExit {
    /// Collected its own target of distinct links
    TargetReached,
    /// The shared set reached the global target
    GlobalTargetReached,
    /// Page height stopped growing
    Exhausted,
    /// Hit the scroll pass cap
    PassLimit,
    /// The crawl deadline passed
    DeadlineElapsed,
    /// Navigation or extraction failed
    Failed { phase: WorkerPhase, error: String },
    /// Could not acquire a browser session
    NoSession { error: String },
    /// The worker task panicked or was cancelled
    Crashed { error: String },
}

impl WorkerExit {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            WorkerExit::Failed { .. } | WorkerExit::NoSession { .. } | WorkerExit::Crashed { .. }
        )
    }
}

/// Outcome of a single worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerReport {
    pub worker: usize,
    pub exit: WorkerExit,
    /// Scroll passes completed
    pub passes: usize,
    /// Distinct links this worker saw
    pub links_seen: usize,
    /// Links this worker added to the shared set first
    pub links_contributed: usize,
    /// Last measured scroll height
    pub last_height: Option<u64>,
}

impl WorkerReport {
    pub fn new(worker: usize, exit: WorkerExit) -> Self {
        Self {
            worker,
            exit,
            passes: 0,
            links_seen: 0,
            links_contributed: 0,
            last_height: None,
        }
    }
}

/// Result of a full crawl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub workers: Vec<WorkerReport>,
    /// Deduplicated links, sorted
    pub links: Vec<String>,
}

impl CrawlReport {
    pub fn new(
        seed: &str,
        started_at: DateTime<Utc>,
        workers: Vec<WorkerReport>,
        links: HashSet<String>,
    ) -> Self {
        let mut links: Vec<String> = links.into_iter().collect();
        links.sort();

        Self {
            seed: seed.to_string(),
            started_at,
            finished_at: Utc::now(),
            workers,
            links,
        }
    }

    /// The discovered links as a set
    pub fn link_set(&self) -> HashSet<String> {
        self.links.iter().cloned().collect()
    }

    pub fn failed_workers(&self) -> usize {
        self.workers.iter().filter(|w| w.exit.is_failure()).count()
    }
}
