use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Mutex;

/// Shared state of one crawl session.
///
/// Owned by the orchestrator. Workers only ever see a [`LinkSink`], which
/// can insert but not remove or iterate.
#[derive(Debug)]
pub struct CrawlState {
    links: Arc<Mutex<HashSet<String>>>,
    closed: Arc<AtomicBool>,
    global_target: Option<usize>,
}

impl CrawlState {
    pub fn new(global_target: Option<usize>) -> Self {
        Self {
            links: Arc::new(Mutex::new(HashSet::new())),
            closed: Arc::new(AtomicBool::new(false)),
            global_target,
        }
    }

    /// Insert-only handle for a worker
    pub fn sink(&self) -> LinkSink {
        LinkSink {
            links: self.links.clone(),
            closed: self.closed.clone(),
            global_target: self.global_target,
        }
    }

    /// Freeze the set and take its contents. Later inserts through any
    /// outstanding sink are dropped.
    pub async fn finish(self) -> HashSet<String> {
        self.closed.store(true, Ordering::SeqCst);
        let mut links = self.links.lock().await;
        std::mem::take(&mut *links)
    }
}

/// Insert capability into a [`CrawlState`]
#[derive(Debug, Clone)]
pub struct LinkSink {
    links: Arc<Mutex<HashSet<String>>>,
    closed: Arc<AtomicBool>,
    global_target: Option<usize>,
}

impl LinkSink {
    /// Insert links, returning how many were new to the shared set.
    /// Duplicates collapse.
    pub async fn insert_all<I>(&self, links: I) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let mut set = self.links.lock().await;
        if self.closed.load(Ordering::SeqCst) {
            return 0;
        }
        links.into_iter().filter(|link| set.insert(link.clone())).count()
    }

    /// Whether the global target, if any, has been met
    pub async fn is_saturated(&self) -> bool {
        match self.global_target {
            Some(target) => self.links.lock().await.len() >= target,
            None => false,
        }
    }
}
