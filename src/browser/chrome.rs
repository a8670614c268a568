use super::{AdvanceControl, DriverResult, PageDriver};
use crate::config::BrowserConfig as BrowserSettings;
use crate::error::DriverError;
pub use crate::{log_debug, log_warn};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::{Page, ScreenshotParams};
use futures::StreamExt;
use std::path::Path;
use tokio::task::JoinHandle;

/// Candidate controls: buttons plus anything marked up to act as one.
const CONTROL_SELECTOR: &str = "button, a[role='button']";

pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

impl ChromeDriver {
    /// Launch headless Chrome and open a blank page. This is the one fatal
    /// failure point: if the browser cannot start there is no session.
    pub async fn launch(settings: &BrowserSettings) -> DriverResult<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-dev-shm-usage")
            .window_size(settings.window_width, settings.window_height);

        if !settings.headless {
            builder = builder.with_head();
        }

        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        // The handler stream must be pumped for the lifetime of the browser.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| DriverError::Launch(e.to_string()))?;

        Ok(Self {
            browser,
            page,
            handler_task,
        })
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    type Control = ChromeControl;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| DriverError::Navigation(e.to_string()))?;
        Ok(())
    }

    async fn region_html(&self, selector: &str) -> DriverResult<Option<String>> {
        // The region is expected to be transiently absent while the page
        // re-renders, so lookup failures are "not there right now."
        let element = match self.page.find_element(selector).await {
            Ok(element) => element,
            Err(e) => {
                log_debug!("[browser] Region '{}' not present: {}", selector, e);
                return Ok(None);
            }
        };

        match element.inner_html().await {
            Ok(html) => Ok(html),
            Err(e) => {
                // Element went stale between lookup and read.
                log_debug!("[browser] Region '{}' read failed: {}", selector, e);
                Ok(None)
            }
        }
    }

    async fn advance_controls(&self) -> DriverResult<Vec<ChromeControl>> {
        match self.page.find_elements(CONTROL_SELECTOR).await {
            Ok(elements) => Ok(elements.into_iter().map(ChromeControl::new).collect()),
            Err(e) => {
                log_debug!("[browser] Control lookup failed: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn screenshot(&self, path: &Path) -> DriverResult<()> {
        self.page
            .save_screenshot(ScreenshotParams::builder().full_page(true).build(), path)
            .await
            .map_err(|e| DriverError::Screenshot(e.to_string()))?;
        Ok(())
    }

    async fn close(&mut self) -> DriverResult<()> {
        if let Err(e) = self.browser.close().await {
            log_warn!("[browser] Browser close reported: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        Ok(())
    }
}

pub struct ChromeControl {
    element: Element,
}

impl ChromeControl {
    fn new(element: Element) -> Self {
        Self { element }
    }
}

#[async_trait]
impl AdvanceControl for ChromeControl {
    async fn label(&self) -> DriverResult<String> {
        let text = self
            .element
            .inner_text()
            .await
            .map_err(|e| DriverError::Command(e.to_string()))?;
        Ok(text.unwrap_or_default())
    }

    async fn is_clickable(&self) -> DriverResult<bool> {
        if let Ok(Some(_)) = self.element.attribute("disabled").await {
            return Ok(false);
        }
        // No clickable point means hidden, zero-sized, or off-screen.
        Ok(self.element.clickable_point().await.is_ok())
    }

    async fn click(&self) -> DriverResult<()> {
        self.element
            .click()
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Command(e.to_string()))
    }

    async fn click_programmatic(&self) -> DriverResult<()> {
        self.element
            .call_js_fn("function() { this.click(); }", false)
            .await
            .map(|_| ())
            .map_err(|e| DriverError::Command(e.to_string()))
    }
}
