use super::change::wait_for_change;
use super::paginate::{Advance, Paginator};
use crate::browser::PageDriver;
use crate::config::Config;
use crate::error::FetchError;
pub use crate::{log_info, log_warn};
use std::path::PathBuf;
use std::time::Duration;

/// Everything one acquisition session needs to know up front.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub region_selector: String,
    pub advance_label: String,
    pub bootstrap_wait: Duration,
    pub first_content_wait: Duration,
    pub page_change_wait: Duration,
    pub advance_wait: Duration,
    pub poll_interval: Duration,
    pub max_pages: usize,
    /// Where the failure screenshot lands if the session fails.
    pub diagnostics_path: PathBuf,
}

impl FetchSettings {
    pub fn from_config(config: &Config, diagnostics_path: PathBuf) -> Self {
        Self {
            region_selector: config.selectors.region.clone(),
            advance_label: config.selectors.advance_label.clone(),
            bootstrap_wait: config.timeouts.bootstrap_wait(),
            first_content_wait: config.timeouts.first_content_wait(),
            page_change_wait: config.timeouts.page_change_wait(),
            advance_wait: config.timeouts.advance_wait(),
            poll_interval: config.timeouts.poll_interval(),
            max_pages: config.max_pages,
            diagnostics_path,
        }
    }
}

/// One acquisition session: a browser page bound to one target URL, the
/// running baseline of the observed region, and the snapshots captured so
/// far. All session state lives here; nothing is shared between sessions.
pub struct Session<P: PageDriver> {
    page: P,
    settings: FetchSettings,
    baseline: Option<String>,
    snapshots: Vec<String>,
    next_control: Option<P::Control>,
}

impl<P: PageDriver> Session<P> {
    pub fn new(page: P, settings: FetchSettings) -> Self {
        Self {
            page,
            settings,
            baseline: None,
            snapshots: Vec::new(),
            next_control: None,
        }
    }

    /// Run the session to completion and release the driver.
    ///
    /// Returns the ordered snapshot sequence on normal termination (which may
    /// have length 1 if pagination never applied) or the loop-level failure.
    /// On failure a diagnostic screenshot is captured first. The driver is
    /// closed on every exit path, exactly once.
    pub async fn run(mut self, url: &str) -> Result<Vec<String>, FetchError> {
        let outcome = self.drive(url).await;

        if let Err(error) = &outcome {
            self.capture_diagnostic(error).await;
        }

        if let Err(e) = self.page.close().await {
            log_warn!("[fetch] Driver close reported: {}", e);
        }

        outcome.map(|_| self.snapshots)
    }

    /// The state machine: open the page, wait for first content, then
    /// alternate wait-for-change / capture / advance until no further advance
    /// is possible.
    async fn drive(&mut self, url: &str) -> Result<(), FetchError> {
        log_info!("[fetch] Opening {}", url);
        self.page.navigate(url).await?;

        // AWAIT_FIRST_CONTENT: no baseline yet, so the first markup the
        // region renders is accepted. It becomes the running baseline but is
        // not captured; placeholder content ("No items yet") is not data.
        let selector = self.settings.region_selector.clone();
        let initial = wait_for_change(
            &self.page,
            &selector,
            None,
            self.settings.bootstrap_wait,
            self.settings.poll_interval,
        )
        .await
        .ok_or_else(|| FetchError::RegionNotFound {
            selector: selector.clone(),
            waited_secs: self.settings.bootstrap_wait.as_secs(),
        })?;

        log_info!(
            "[fetch] Observed region rendered ({} bytes), watching for content",
            initial.len()
        );
        self.baseline = Some(initial);

        let paginator = Paginator::new(
            self.settings.advance_label.clone(),
            self.settings.advance_wait,
            self.settings.poll_interval,
        );

        // First change gets the (typically longer) first-content wait; every
        // change after an advance gets the inter-page wait.
        let mut change_wait = self.settings.first_content_wait;

        loop {
            // AWAIT_CHANGE: a stalled load is a failure, not a normal end.
            let markup = wait_for_change(
                &self.page,
                &selector,
                self.baseline.as_deref(),
                change_wait,
                self.settings.poll_interval,
            )
            .await
            .ok_or(FetchError::ChangeTimeout {
                waited_secs: change_wait.as_secs(),
            })?;

            // CAPTURED: the detector guarantees this differs from the
            // previous snapshot, so consecutive duplicates cannot occur.
            self.snapshots.push(markup.clone());
            self.baseline = Some(markup);
            log_info!(
                "[fetch] Captured snapshot {} ({} bytes)",
                self.snapshots.len(),
                self.baseline.as_deref().map(str::len).unwrap_or(0)
            );

            change_wait = self.settings.page_change_wait;

            if self.snapshots.len() >= self.settings.max_pages {
                log_warn!(
                    "[fetch] Reached max_pages ({}), ending session",
                    self.settings.max_pages
                );
                return Ok(());
            }

            // ADVANCING: "no control" is the expected, normal termination.
            match paginator.advance(&self.page, &mut self.next_control).await {
                Advance::Advanced => {
                    log_info!("[fetch] Advanced to next page");
                }
                Advance::Unavailable => {
                    log_info!(
                        "[fetch] No further pages; session complete with {} snapshot(s)",
                        self.snapshots.len()
                    );
                    return Ok(());
                }
            }
        }
    }

    async fn capture_diagnostic(&self, error: &FetchError) {
        let path = &self.settings.diagnostics_path;
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log_warn!("[fetch] Could not create diagnostics directory: {}", e);
            }
        }
        match self.page.screenshot(path).await {
            Ok(()) => log_info!("[fetch] Session failed ({}), screenshot at {:?}", error, path),
            Err(e) => log_warn!("[fetch] Could not capture failure screenshot: {}", e),
        }
    }
}
