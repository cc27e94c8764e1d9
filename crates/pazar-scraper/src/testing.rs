//! In-memory [`Browser`] for tests.
//!
//! Pages are keyed by URL; each page maps a locator's display form to the
//! elements it matches. Elements can carry children (for grid-scoped link
//! lookups) and can reveal further elements when clicked (for tabs).

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pazar_core::Locator;
use serde_json::Value;

use crate::browser::{Browser, ElementRef};
use crate::error::ScraperError;

/// Document height reported to the scroll loop. Constant, so scrolling settles
/// after a single round.
const FAKE_SCROLL_HEIGHT: u64 = 1000;

#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    text: String,
    properties: HashMap<String, String>,
    hidden: bool,
    children: HashMap<String, Vec<FakeElement>>,
    reveals: Vec<(String, Vec<FakeElement>)>,
    click_fails: bool,
}

impl FakeElement {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    #[must_use]
    pub fn prop(mut self, name: &str, value: &str) -> Self {
        self.properties.insert(name.to_string(), value.to_string());
        self
    }

    /// Shorthand for an anchor with an absolute or relative `href`.
    #[must_use]
    pub fn link(href: &str) -> Self {
        Self::new().prop("href", href)
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    #[must_use]
    pub fn child(mut self, locator: &Locator, elements: Vec<FakeElement>) -> Self {
        self.children.insert(locator.to_string(), elements);
        self
    }

    /// Clicking replaces the page's matches for `locator` with `elements`.
    #[must_use]
    pub fn reveals(mut self, locator: &Locator, elements: Vec<FakeElement>) -> Self {
        self.reveals.push((locator.to_string(), elements));
        self
    }

    #[must_use]
    pub fn failing_click(mut self) -> Self {
        self.click_fails = true;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    elements: HashMap<String, Vec<FakeElement>>,
}

impl FakePage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, locator: &Locator, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(locator.to_string(), elements);
        self
    }
}

#[derive(Debug, Default)]
struct State {
    pages: HashMap<String, FakePage>,
    redirects: HashMap<String, String>,
    failing: HashSet<String>,
    current_url: String,
    live: HashMap<String, Vec<FakeElement>>,
    registry: Vec<FakeElement>,
    visits: Vec<String>,
    quit: bool,
}

impl State {
    fn register(&mut self, elements: Vec<FakeElement>) -> Vec<ElementRef> {
        elements
            .into_iter()
            .map(|element| {
                self.registry.push(element);
                ElementRef(self.registry.len() - 1)
            })
            .collect()
    }

    fn element(&self, element: &ElementRef) -> Result<&FakeElement, ScraperError> {
        self.registry
            .get(element.0)
            .ok_or_else(|| ScraperError::WebDriver {
                command: "element lookup".to_string(),
                message: format!("stale element reference: unknown element {}", element.0),
            })
    }

    fn ensure_open(&self) -> Result<(), ScraperError> {
        if self.quit {
            return Err(ScraperError::WebDriver {
                command: "any".to_string(),
                message: "invalid session id: session already closed".to_string(),
            });
        }
        Ok(())
    }
}

/// Scripted browser. Unknown URLs render as empty pages.
#[derive(Debug, Default)]
pub struct FakeBrowser {
    state: Mutex<State>,
}

impl FakeBrowser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn page(self, url: &str, page: FakePage) -> Self {
        self.lock().pages.insert(url.to_string(), page);
        self
    }

    /// Navigating to `from` lands on `to`.
    #[must_use]
    pub fn redirect(self, from: &str, to: &str) -> Self {
        self.lock()
            .redirects
            .insert(from.to_string(), to.to_string());
        self
    }

    /// Navigating to `url` fails.
    #[must_use]
    pub fn failing(self, url: &str) -> Self {
        self.lock().failing.insert(url.to_string());
        self
    }

    /// Every URL passed to `goto`, in order.
    #[must_use]
    pub fn visits(&self) -> Vec<String> {
        self.lock().visits.clone()
    }

    #[must_use]
    pub fn was_quit(&self) -> bool {
        self.lock().quit
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.visits.push(url.to_string());
        if state.failing.contains(url) {
            return Err(ScraperError::Navigation {
                url: url.to_string(),
                reason: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        let resolved = state
            .redirects
            .get(url)
            .cloned()
            .unwrap_or_else(|| url.to_string());
        let live = state
            .pages
            .get(&resolved)
            .map(|page| page.elements.clone())
            .unwrap_or_default();
        state.live = live;
        state.current_url = resolved;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, ScraperError> {
        let state = self.lock();
        state.ensure_open()?;
        Ok(state.current_url.clone())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, ScraperError> {
        let mut state = self.lock();
        state.ensure_open()?;
        let matches = state
            .live
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default();
        Ok(state.register(matches))
    }

    async fn find_all_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, ScraperError> {
        let mut state = self.lock();
        state.ensure_open()?;
        let matches = state
            .element(parent)?
            .children
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default();
        Ok(state.register(matches))
    }

    async fn text(&self, element: &ElementRef) -> Result<String, ScraperError> {
        let state = self.lock();
        Ok(state.element(element)?.text.clone())
    }

    async fn property(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        let state = self.lock();
        Ok(state.element(element)?.properties.get(name).cloned())
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, ScraperError> {
        let state = self.lock();
        Ok(!state.element(element)?.hidden)
    }

    async fn click(&self, element: &ElementRef) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.ensure_open()?;
        let target = state.element(element)?.clone();
        if target.click_fails {
            return Err(ScraperError::WebDriver {
                command: "element click".to_string(),
                message: "element click intercepted: another element would receive the click"
                    .to_string(),
            });
        }
        for (key, elements) in target.reveals {
            state.live.insert(key, elements);
        }
        Ok(())
    }

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), ScraperError> {
        let state = self.lock();
        state.ensure_open()?;
        state.element(element).map(|_| ())
    }

    async fn execute(&self, script: &str, _args: Vec<Value>) -> Result<Value, ScraperError> {
        let state = self.lock();
        state.ensure_open()?;
        if script.trim_start().starts_with("return") && script.contains("scrollHeight") {
            return Ok(Value::from(FAKE_SCROLL_HEIGHT));
        }
        Ok(Value::Null)
    }

    async fn quit(&self) -> Result<(), ScraperError> {
        let mut state = self.lock();
        state.ensure_open()?;
        state.quit = true;
        Ok(())
    }
}
