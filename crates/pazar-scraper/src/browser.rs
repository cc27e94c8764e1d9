//! The browser seam: render a page, query its DOM, click.
//!
//! Everything above this trait (extraction, pagination, the run loop) is
//! written against `Browser`, so it can be driven by a live WebDriver session
//! or by an in-memory fake.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use pazar_core::Locator;
use serde_json::Value;

use crate::error::ScraperError;

/// Opaque handle to an element found since the last navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef(pub usize);

#[async_trait]
pub trait Browser: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), ScraperError>;

    async fn current_url(&self) -> Result<String, ScraperError>;

    /// All elements on the page matching `locator`, in document order.
    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, ScraperError>;

    /// Elements matching `locator` beneath `parent`.
    async fn find_all_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, ScraperError>;

    async fn text(&self, element: &ElementRef) -> Result<String, ScraperError>;

    /// A DOM property such as `href` or `src`; `None` when unset.
    async fn property(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, ScraperError>;

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, ScraperError>;

    async fn click(&self, element: &ElementRef) -> Result<(), ScraperError>;

    /// Scrolls `element` to the centre of the viewport.
    async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), ScraperError>;

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, ScraperError>;

    /// Ends the session. Further calls fail.
    async fn quit(&self) -> Result<(), ScraperError>;

    async fn find_first(&self, locator: &Locator) -> Result<Option<ElementRef>, ScraperError> {
        Ok(self.find_all(locator).await?.into_iter().next())
    }

    /// Polls until `locator` matches at least one element or `timeout` elapses.
    ///
    /// Returns an empty `Vec` on timeout. Lookup errors while polling count as
    /// "not yet present".
    async fn wait_for(
        &self,
        locator: &Locator,
        timeout: Duration,
        poll: Duration,
    ) -> Result<Vec<ElementRef>, ScraperError> {
        let start = Instant::now();
        loop {
            if let Ok(elements) = self.find_all(locator).await {
                if !elements.is_empty() {
                    return Ok(elements);
                }
            }
            if start.elapsed() >= timeout {
                return Ok(Vec::new());
            }
            tokio::time::sleep(poll).await;
        }
    }
}
