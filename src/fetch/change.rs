use super::wait::{wait_until, PollResult};
use crate::browser::PageDriver;
pub use crate::log_debug;
use std::time::Duration;

/// Outcome of one detector poll: the region's new markup, or nothing yet.
pub enum ContentPoll {
    Changed(String),
    NotYet,
}

/// Watches one region of the page for its markup to differ from a known
/// baseline. Any byte difference counts; there is no semantic diffing.
pub struct ChangeDetector<'a> {
    selector: &'a str,
    baseline: Option<&'a str>,
}

impl<'a> ChangeDetector<'a> {
    /// An empty or absent baseline means bootstrap: the first observed
    /// content is accepted as the change.
    pub fn new(selector: &'a str, baseline: Option<&'a str>) -> Self {
        Self {
            selector,
            baseline: baseline.filter(|b| !b.is_empty()),
        }
    }

    /// One poll of the observed region. Lookup failures are `NotYet`, not
    /// errors: the region is expected to be transiently absent while the
    /// page re-renders.
    pub async fn poll<P: PageDriver>(&self, page: &P) -> ContentPoll {
        let markup = match page.region_html(self.selector).await {
            Ok(Some(markup)) => markup,
            Ok(None) => return ContentPoll::NotYet,
            Err(e) => {
                log_debug!("[change] Region lookup failed, treating as not yet: {}", e);
                return ContentPoll::NotYet;
            }
        };

        match self.baseline {
            Some(baseline) if baseline == markup => ContentPoll::NotYet,
            _ => ContentPoll::Changed(markup),
        }
    }
}

/// Poll the region until its markup differs from `baseline` or `timeout`
/// elapses. `None` is the explicit "no new content" outcome.
pub async fn wait_for_change<P: PageDriver>(
    page: &P,
    selector: &str,
    baseline: Option<&str>,
    timeout: Duration,
    interval: Duration,
) -> Option<String> {
    let detector = ChangeDetector::new(selector, baseline);
    wait_until(timeout, interval, || async {
        match detector.poll(page).await {
            ContentPoll::Changed(markup) => PollResult::Ready(markup),
            ContentPoll::NotYet => PollResult::Pending,
        }
    })
    .await
}
