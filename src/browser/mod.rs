mod chrome;

pub use chrome::ChromeDriver;

use crate::error::DriverError;
use async_trait::async_trait;
use std::path::Path;

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// One candidate advance control ("Next" / "Load more") on the live page.
///
/// Handles are weak: the page re-renders underneath them, so every method may
/// fail on a stale element. Callers treat such failures as "control absent,"
/// never as session errors.
#[async_trait]
pub trait AdvanceControl: Send + Sync {
    /// Visible label, as rendered. Not trimmed or case-folded; matching
    /// against the configured label is exact.
    async fn label(&self) -> DriverResult<String>;

    /// Whether the control is currently actionable (visible, enabled, has a
    /// point that can receive a click).
    async fn is_clickable(&self) -> DriverResult<bool>;

    /// Simulated user click.
    async fn click(&self) -> DriverResult<()>;

    /// Programmatic activation of the same control, used as a fallback when
    /// the simulated click fails (overlays and animations routinely obstruct
    /// a logically actionable control).
    async fn click_programmatic(&self) -> DriverResult<()>;
}

/// The capability surface the acquisition loop needs from a browser page.
///
/// The production implementation drives headless Chrome; tests drive a
/// scripted fake.
#[async_trait]
pub trait PageDriver: Send + Sync {
    type Control: AdvanceControl + Send + Sync;

    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// Current innerHTML of the observed region, or `None` while the region
    /// is absent (expected mid-re-render).
    async fn region_html(&self, selector: &str) -> DriverResult<Option<String>>;

    /// All candidate advance controls currently on the page.
    async fn advance_controls(&self) -> DriverResult<Vec<Self::Control>>;

    /// Full-page screenshot for post-mortem diagnostics.
    async fn screenshot(&self, path: &Path) -> DriverResult<()>;

    /// Release the underlying browser resource. Called exactly once, on
    /// every session exit path.
    async fn close(&mut self) -> DriverResult<()>;
}
