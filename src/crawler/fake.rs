//! Scripted in-memory browser used by the crawler tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::app::{EddyError, Result};
use crate::browser::{BrowserSession, SessionLauncher};

#[derive(Debug, Clone)]
pub enum Behavior {
    Scroll,
    FailOpen,
    FailGoto,
    /// Markup reads fail once this many scrolls have happened
    FailMarkupAfter(usize),
    /// Navigation never completes
    Hang,
    /// Neither navigation nor close ever completes
    Stuck,
}

/// What one session renders: frame 0 after navigation, frame n after the
/// n-th scroll. The last frame repeats.
#[derive(Debug, Clone)]
pub struct Script {
    pub behavior: Behavior,
    pub frames: Vec<(u64, String)>,
}

impl Script {
    pub fn scrolling(frames: Vec<(u64, String)>) -> Self {
        Self {
            behavior: Behavior::Scroll,
            frames,
        }
    }

    pub fn with(behavior: Behavior, frames: Vec<(u64, String)>) -> Self {
        Self { behavior, frames }
    }
}

/// A frame of the given height listing anchors for `hrefs`
pub fn frame(height: u64, hrefs: &[&str]) -> (u64, String) {
    let anchors: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">post</a>"#, href))
        .collect();
    (height, format!("<html><body>{}</body></html>", anchors))
}

/// Hands out one scripted session per `open`, in order
pub struct FakeLauncher {
    scripts: Mutex<VecDeque<Script>>,
    closed: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            closed: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of sessions that have been closed
    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of sessions that have been dropped, closed or not
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionLauncher for FakeLauncher {
    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| EddyError::Browser("no scripted session left".into()))?;

        if matches!(script.behavior, Behavior::FailOpen) {
            return Err(EddyError::Browser("chrome crashed on startup".into()));
        }

        Ok(Box::new(FakeSession {
            script,
            scrolls: 0,
            closed: self.closed.clone(),
            released: self.released.clone(),
            is_closed: false,
        }))
    }
}

struct FakeSession {
    script: Script,
    scrolls: usize,
    closed: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    is_closed: bool,
}

impl Drop for FakeSession {
    fn drop(&mut self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

impl FakeSession {
    fn current(&self) -> &(u64, String) {
        let last = self.script.frames.len() - 1;
        &self.script.frames[self.scrolls.min(last)]
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, _url: &str) -> Result<()> {
        match self.script.behavior {
            Behavior::FailGoto => Err(EddyError::Browser("net::ERR_CONNECTION_RESET".into())),
            Behavior::Hang | Behavior::Stuck => {
                std::future::pending::<()>().await;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.scrolls += 1;
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64> {
        Ok(self.current().0)
    }

    async fn scroll_position(&mut self) -> Result<u64> {
        Ok(self.current().0)
    }

    async fn page_markup(&mut self) -> Result<String> {
        if let Behavior::FailMarkupAfter(n) = self.script.behavior {
            if self.scrolls > n {
                return Err(EddyError::Browser("node is detached from document".into()));
            }
        }
        Ok(self.current().1.clone())
    }

    async fn close(&mut self) -> Result<()> {
        if matches!(self.script.behavior, Behavior::Stuck) {
            std::future::pending::<()>().await;
        }
        if !self.is_closed {
            self.is_closed = true;
            self.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
