use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;

use crate::app::{EddyError, Result};
use crate::browser::{BrowserSession, SessionLauncher};
use crate::crawler::CrawlerConfig;

const SCROLL_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight)";
const HEIGHT_SCRIPT: &str =
    "Math.max(document.body.scrollHeight, document.documentElement.scrollHeight)";
const POSITION_SCRIPT: &str = "window.innerHeight + window.scrollY";

/// Chrome-backed session launcher using chromiumoxide
///
/// One Chrome process is launched; every session is its own page (target).
pub struct ChromeLauncher {
    browser: Browser,
    handler: JoinHandle<()>,
    config: CrawlerConfig,
}

impl ChromeLauncher {
    /// Launch Chrome with the given configuration
    pub async fn launch(config: CrawlerConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-software-rasterizer");

        if !config.headless {
            builder = builder.with_head();
        }

        let browser_config = builder
            .build()
            .map_err(|e| EddyError::Browser(format!("Failed to build browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await.map_err(|e| {
            EddyError::Browser(format!(
                "Failed to launch browser: {}. Is Chrome or Chromium installed and in PATH?",
                e
            ))
        })?;

        // Spawn the browser handler
        let handler = tokio::spawn(async move {
            while let Some(_event) = handler.next().await {
                // Handle browser events
            }
        });

        Ok(Self {
            browser,
            handler,
            config,
        })
    }

    /// Close the browser process
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
    }
}

#[async_trait]
impl SessionLauncher for ChromeLauncher {
    async fn open(&self) -> Result<Box<dyn BrowserSession>> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| EddyError::Browser(format!("Failed to create page: {}", e)))?;

        if let Some(ref ua) = self.config.user_agent {
            page.set_user_agent(ua)
                .await
                .map_err(|e| EddyError::Browser(format!("Failed to set user agent: {}", e)))?;
        }

        Ok(Box::new(ChromeSession {
            page: Some(page),
            timeout: self.config.timeout(),
        }))
    }
}

/// One Chrome page owned by a single worker
pub struct ChromeSession {
    page: Option<Page>,
    timeout: Duration,
}

impl ChromeSession {
    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| EddyError::Browser("Session already closed".to_string()))
    }

    async fn evaluate_number(&self, script: &str) -> Result<u64> {
        let value: f64 = self
            .page()?
            .evaluate(script.to_string())
            .await
            .map_err(|e| EddyError::Browser(format!("Script execution failed: {}", e)))?
            .into_value()
            .map_err(|e| EddyError::Browser(format!("Failed to parse result: {:?}", e)))?;

        Ok(value.max(0.0).round() as u64)
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // Sessions dropped without close (aborted workers) still release their page
        let Some(page) = self.page.take() else {
            return;
        };
        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            handle.spawn(async move {
                if let Err(e) = page.close().await {
                    tracing::debug!("Failed to close dropped page: {}", e);
                }
            });
        }
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn goto(&mut self, url: &str) -> Result<()> {
        let page = self.page()?;
        match tokio::time::timeout(self.timeout, page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(EddyError::Browser(format!("Navigation failed: {}", e))),
            Err(_) => Err(EddyError::Browser(format!(
                "Navigation timed out after {}s",
                self.timeout.as_secs()
            ))),
        }
    }

    async fn scroll_to_bottom(&mut self) -> Result<()> {
        self.page()?
            .evaluate(SCROLL_SCRIPT.to_string())
            .await
            .map_err(|e| EddyError::Browser(format!("Scroll failed: {}", e)))?;
        Ok(())
    }

    async fn scroll_height(&mut self) -> Result<u64> {
        self.evaluate_number(HEIGHT_SCRIPT).await
    }

    async fn scroll_position(&mut self) -> Result<u64> {
        self.evaluate_number(POSITION_SCRIPT).await
    }

    async fn page_markup(&mut self) -> Result<String> {
        self.page()?
            .content()
            .await
            .map_err(|e| EddyError::Browser(format!("Failed to read page content: {}", e)))
    }

    async fn close(&mut self) -> Result<()> {
        let Some(page) = self.page.take() else {
            return Ok(());
        };
        page.close()
            .await
            .map_err(|e| EddyError::Browser(format!("Failed to close page: {}", e)))
    }
}
