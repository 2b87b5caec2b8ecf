//! Shared browser session owned by the run loop.
//!
//! One Chrome process and one tab are reused for every URL in the run.
//! The CDP event handler must be polled for the whole lifetime of the
//! browser, so it is spawned as a tracked task and aborted on close.

use chromiumoxide::browser::Browser;
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{create_browser_config, CaptureConfig};
use crate::error::CaptureError;

/// A live browser-control session: the Chrome process, its event
/// handler task, and the single page all captures run in.
///
/// The run loop owns the session exclusively and must call
/// [`BrowserSession::close`] exactly once on every exit path.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launch Chrome and open the page the run will reuse.
    pub async fn launch(config: &CaptureConfig) -> Result<Self, CaptureError> {
        let browser_config = create_browser_config(config)?;

        info!(
            "Launching {} browser session",
            if config.headless { "headless" } else { "headful" }
        );

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| CaptureError::BrowserLaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
            debug!("Browser event stream ended");
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| CaptureError::BrowserLaunchFailed(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler: handler_task,
        })
    }

    /// The tab shared by every capture in this run.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser and stop the handler task.
    ///
    /// Consumes the session so it cannot be closed twice. Waiting for
    /// the Chrome process before aborting the handler lets it release
    /// its profile directory cleanly.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {e}");
        }
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
        }
        self.handler.abort();
        info!("Browser session closed");
    }
}
