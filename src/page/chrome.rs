//! Chrome-backed page implementation
//!
//! Drives a headless Chrome/Chromium instance over the DevTools
//! protocol. The session owns the browser process and the event-handler
//! task; pages are created per scenario and closed on every exit path.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpBrowserConfig};
use futures_util::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::common::config::BrowserConfig;
use crate::common::{Error, Result};

use super::Page;

/// A running browser process and its event-handler task
pub struct BrowserSession {
    browser: Browser,
    driver: Option<JoinHandle<()>>,
}

impl BrowserSession {
    /// Launch a browser according to the given configuration
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = CdpBrowserConfig::builder();
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.executable {
            builder = builder.chrome_executable(executable);
        }
        let cdp_config = builder.build().map_err(Error::Browser)?;

        let (browser, mut handler) = Browser::launch(cdp_config)
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;

        // The handler stream must be polled for the CDP connection to
        // make progress; it ends when the browser goes away.
        let driver = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!("browser handler stopped: {e}");
                    break;
                }
            }
        });

        debug!("browser launched (headless: {})", config.headless);
        Ok(Self {
            browser,
            driver: Some(driver),
        })
    }

    /// Open a fresh tab
    pub async fn new_page(&self) -> Result<ChromePage> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;
        Ok(ChromePage { page })
    }

    /// Close the browser and stop the handler task
    pub async fn close(mut self) -> Result<()> {
        self.browser
            .close()
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;
        if let Some(driver) = self.driver.take() {
            let _ = driver.await;
        }
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        // `close` consumes the session; this only covers early-exit
        // paths where the handler task would otherwise linger.
        if let Some(driver) = &self.driver {
            driver.abort();
        }
    }
}

/// One browser tab, driven over CDP
pub struct ChromePage {
    page: chromiumoxide::Page,
}

impl ChromePage {
    /// Close the underlying tab
    pub async fn close(self) -> Result<()> {
        self.page
            .close()
            .await
            .map_err(|e| Error::Browser(e.to_string()))
    }
}

#[async_trait]
impl Page for ChromePage {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| Error::navigation(url, e.to_string()))?;
        Ok(())
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;
        // Statements evaluate to undefined; treat that as null.
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }

    async fn wait_for_navigation(&mut self) -> Result<()> {
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| Error::Browser(e.to_string()))?;
        Ok(())
    }
}
