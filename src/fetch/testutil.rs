//! Scripted page driver for exercising the acquisition loop without a
//! browser. Each `FakePage` describes one rendered state of the target as a
//! timeline of region polls; a successful click moves to the next page, and
//! control handles taken before a page mutation go stale like real element
//! references do.

use crate::browser::{AdvanceControl, DriverResult, PageDriver};
use crate::error::DriverError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct FakeControlSpec {
    pub label: String,
    pub clickable: bool,
    pub natural_click_fails: bool,
    pub js_click_fails: bool,
}

/// A clickable control with the given label.
pub fn control(label: &str) -> FakeControlSpec {
    FakeControlSpec {
        label: label.to_string(),
        clickable: true,
        natural_click_fails: false,
        js_click_fails: false,
    }
}

pub struct FakePage {
    /// Region markup returned by successive polls; the last entry repeats
    /// forever. `None` entries model an absent region (mid-render or never
    /// materializing).
    pub timeline: Vec<Option<String>>,
    pub controls: Vec<FakeControlSpec>,
}

impl FakePage {
    /// A page whose region always shows the same markup.
    pub fn steady(markup: &str, controls: Vec<FakeControlSpec>) -> Self {
        Self {
            timeline: vec![Some(markup.to_string())],
            controls,
        }
    }

    /// A page whose region never renders.
    pub fn region_absent() -> Self {
        Self {
            timeline: vec![None],
            controls: vec![],
        }
    }
}

struct State {
    pages: Vec<FakePage>,
    current: usize,
    region_polls: usize,
    close_count: u32,
    screenshots: Vec<PathBuf>,
    navigations: Vec<String>,
}

#[derive(Clone)]
pub struct FakeDriver {
    state: Arc<Mutex<State>>,
}

impl FakeDriver {
    pub fn new(pages: Vec<FakePage>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                pages,
                current: 0,
                region_polls: 0,
                close_count: 0,
                screenshots: Vec::new(),
                navigations: Vec::new(),
            })),
        }
    }

    pub fn current_page(&self) -> usize {
        self.state.lock().unwrap().current
    }

    pub fn close_count(&self) -> u32 {
        self.state.lock().unwrap().close_count
    }

    pub fn screenshots(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().screenshots.clone()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }
}

fn turn_page(state: &mut State) {
    if state.current + 1 < state.pages.len() {
        state.current += 1;
        state.region_polls = 0;
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    type Control = FakeControl;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        self.state.lock().unwrap().navigations.push(url.to_string());
        Ok(())
    }

    async fn region_html(&self, _selector: &str) -> DriverResult<Option<String>> {
        let mut state = self.state.lock().unwrap();
        let current = state.current;
        let timeline = &state.pages[current].timeline;
        if timeline.is_empty() {
            return Ok(None);
        }
        let index = state.region_polls.min(timeline.len() - 1);
        let markup = timeline[index].clone();
        state.region_polls += 1;
        Ok(markup)
    }

    async fn advance_controls(&self) -> DriverResult<Vec<FakeControl>> {
        let state = self.state.lock().unwrap();
        let current = state.current;
        Ok(state.pages[current]
            .controls
            .iter()
            .map(|spec| FakeControl {
                state: Arc::clone(&self.state),
                page_index: current,
                spec: spec.clone(),
            })
            .collect())
    }

    async fn screenshot(&self, path: &Path) -> DriverResult<()> {
        self.state
            .lock()
            .unwrap()
            .screenshots
            .push(path.to_path_buf());
        Ok(())
    }

    async fn close(&mut self) -> DriverResult<()> {
        self.state.lock().unwrap().close_count += 1;
        Ok(())
    }
}

pub struct FakeControl {
    state: Arc<Mutex<State>>,
    page_index: usize,
    spec: FakeControlSpec,
}

impl FakeControl {
    fn stale(&self) -> bool {
        self.state.lock().unwrap().current != self.page_index
    }
}

#[async_trait]
impl AdvanceControl for FakeControl {
    async fn label(&self) -> DriverResult<String> {
        if self.stale() {
            return Err(DriverError::Command("stale element reference".to_string()));
        }
        Ok(self.spec.label.clone())
    }

    async fn is_clickable(&self) -> DriverResult<bool> {
        if self.stale() {
            return Err(DriverError::Command("stale element reference".to_string()));
        }
        Ok(self.spec.clickable)
    }

    async fn click(&self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.current != self.page_index {
            return Err(DriverError::Command("stale element reference".to_string()));
        }
        if !self.spec.clickable {
            return Err(DriverError::Command("element not interactable".to_string()));
        }
        if self.spec.natural_click_fails {
            return Err(DriverError::Command("element click intercepted".to_string()));
        }
        turn_page(&mut state);
        Ok(())
    }

    async fn click_programmatic(&self) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.current != self.page_index {
            return Err(DriverError::Command("stale element reference".to_string()));
        }
        if self.spec.js_click_fails {
            return Err(DriverError::Command("script click failed".to_string()));
        }
        turn_page(&mut state);
        Ok(())
    }
}
