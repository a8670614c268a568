use super::wait::{wait_until, PollResult};
use crate::browser::{AdvanceControl, PageDriver};
pub use crate::{log_debug, log_info, log_warn};
use std::time::Duration;

/// Outcome of one advance attempt. `Unavailable` is the normal end of
/// pagination, never an error: a missing, mislabeled, dead, or unactivatable
/// control all land here.
#[derive(Debug, PartialEq, Eq)]
pub enum Advance {
    Advanced,
    Unavailable,
}

/// Locates and activates the advance control ("Next" / "Load more").
pub struct Paginator {
    label: String,
    search_timeout: Duration,
    poll_interval: Duration,
}

impl Paginator {
    pub fn new(label: impl Into<String>, search_timeout: Duration, poll_interval: Duration) -> Self {
        Self {
            label: label.into(),
            search_timeout,
            poll_interval,
        }
    }

    /// Resolve the advance control, preferring a cached reference, and
    /// activate it. The cached reference is revalidated first: the page has
    /// mutated since it was taken, and a stale handle means "absent," so the
    /// search runs again instead of failing the session.
    pub async fn advance<P: PageDriver>(
        &self,
        page: &P,
        cached: &mut Option<P::Control>,
    ) -> Advance {
        if let Some(control) = cached.take() {
            if matches!(control.is_clickable().await, Ok(true)) {
                *cached = Some(control);
            } else {
                log_debug!("[paginate] Cached control is stale, re-searching");
            }
        }

        let control = match cached {
            Some(control) => control,
            None => match self.find_control(page).await {
                Some(control) => cached.insert(control),
                None => {
                    log_info!(
                        "[paginate] No control labeled '{}' found within {:?}",
                        self.label,
                        self.search_timeout
                    );
                    return Advance::Unavailable;
                }
            },
        };

        if !matches!(control.is_clickable().await, Ok(true)) {
            log_info!(
                "[paginate] Control '{}' is present but not clickable",
                self.label
            );
            *cached = None;
            return Advance::Unavailable;
        }

        // Prefer the simulated user click; overlays and animation timing make
        // it fail on controls that are still logically actionable, so fall
        // back to programmatic activation of the same reference.
        match control.click().await {
            Ok(()) => {
                log_debug!("[paginate] Advanced via click");
                return Advance::Advanced;
            }
            Err(e) => {
                log_warn!(
                    "[paginate] Click on '{}' failed ({}), trying programmatic activation",
                    self.label,
                    e
                );
            }
        }

        match control.click_programmatic().await {
            Ok(()) => {
                log_debug!("[paginate] Advanced via programmatic click");
                Advance::Advanced
            }
            Err(e) => {
                log_warn!(
                    "[paginate] Both activation strategies failed for '{}': {}",
                    self.label,
                    e
                );
                *cached = None;
                Advance::Unavailable
            }
        }
    }

    /// Bounded search for a control whose visible label exactly matches the
    /// target. Exact-string means exact: casing or whitespace differences are
    /// a silent no-match.
    async fn find_control<P: PageDriver>(&self, page: &P) -> Option<P::Control> {
        wait_until(self.search_timeout, self.poll_interval, || async {
            match self.matching_control(page).await {
                Some(control) => PollResult::Ready(control),
                None => PollResult::Pending,
            }
        })
        .await
    }

    async fn matching_control<P: PageDriver>(&self, page: &P) -> Option<P::Control> {
        let controls = page.advance_controls().await.ok()?;
        for control in controls {
            if matches!(control.label().await, Ok(label) if label == self.label) {
                return Some(control);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testutil::{control, FakeDriver, FakePage};

    fn paginator() -> Paginator {
        Paginator::new(
            "Next",
            Duration::from_millis(200),
            Duration::from_millis(50),
        )
    }

    fn two_pages(first_controls: Vec<crate::fetch::testutil::FakeControlSpec>) -> FakeDriver {
        FakeDriver::new(vec![
            FakePage::steady("<li>page one</li>", first_controls),
            FakePage::steady("<li>page two</li>", vec![]),
        ])
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn advances_on_exact_label_match() {
        let driver = two_pages(vec![control("Next")]);
        let mut cached = None;
        assert_eq!(paginator().advance(&driver, &mut cached).await, Advance::Advanced);
        assert_eq!(driver.current_page(), 1);
        assert!(cached.is_some());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn label_mismatch_is_unavailable_not_error() {
        for label in ["next", "Next ", " Next", "NEXT", "Load more"] {
            let driver = two_pages(vec![control(label)]);
            let mut cached = None;
            assert_eq!(
                paginator().advance(&driver, &mut cached).await,
                Advance::Unavailable
            );
            assert_eq!(driver.current_page(), 0);
        }
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn no_controls_is_unavailable() {
        let driver = two_pages(vec![]);
        let mut cached = None;
        assert_eq!(
            paginator().advance(&driver, &mut cached).await,
            Advance::Unavailable
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn unclickable_control_is_unavailable() {
        let mut spec = control("Next");
        spec.clickable = false;
        let driver = two_pages(vec![spec]);
        let mut cached = None;
        assert_eq!(
            paginator().advance(&driver, &mut cached).await,
            Advance::Unavailable
        );
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn falls_back_to_programmatic_click() {
        let mut spec = control("Next");
        spec.natural_click_fails = true;
        let driver = two_pages(vec![spec]);
        let mut cached = None;
        assert_eq!(paginator().advance(&driver, &mut cached).await, Advance::Advanced);
        assert_eq!(driver.current_page(), 1);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn both_strategies_failing_degrades_to_unavailable() {
        let mut spec = control("Next");
        spec.natural_click_fails = true;
        spec.js_click_fails = true;
        let driver = two_pages(vec![spec]);
        let mut cached = None;
        assert_eq!(
            paginator().advance(&driver, &mut cached).await,
            Advance::Unavailable
        );
        assert!(cached.is_none());
        assert_eq!(driver.current_page(), 0);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn stale_cached_control_triggers_research() {
        let driver = FakeDriver::new(vec![
            FakePage::steady("<li>one</li>", vec![control("Next")]),
            FakePage::steady("<li>two</li>", vec![control("Next")]),
            FakePage::steady("<li>three</li>", vec![]),
        ]);
        let pager = paginator();
        let mut cached = None;

        // First advance caches the page-one control; the page mutation under
        // the second advance makes that handle stale and forces a re-search.
        assert_eq!(pager.advance(&driver, &mut cached).await, Advance::Advanced);
        assert_eq!(pager.advance(&driver, &mut cached).await, Advance::Advanced);
        assert_eq!(driver.current_page(), 2);

        // Page three has no control at all.
        assert_eq!(
            pager.advance(&driver, &mut cached).await,
            Advance::Unavailable
        );
    }
}
