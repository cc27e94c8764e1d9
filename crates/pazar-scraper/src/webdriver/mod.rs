//! [`Browser`] over a live `thirtyfour` session.
//!
//! `thirtyfour` hands out [`WebElement`]s that borrow nothing, so the session
//! keeps the ones found since the last navigation in a registry and gives out
//! their positions as [`ElementRef`]s.

mod capabilities;

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use pazar_core::Locator;
use serde_json::Value;
use thirtyfour::error::{WebDriverError, WebDriverErrorInner};
use thirtyfour::prelude::*;

use crate::browser::{Browser, ElementRef};
use crate::error::ScraperError;

pub use capabilities::BrowserKind;

/// Elements found since the last `goto`. Refs handed out before a navigation
/// fall below `offset` and are reported stale.
#[derive(Default)]
struct Registry {
    offset: usize,
    elements: Vec<WebElement>,
}

impl Registry {
    fn register(&mut self, found: Vec<WebElement>) -> Vec<ElementRef> {
        found
            .into_iter()
            .map(|element| {
                self.elements.push(element);
                ElementRef(self.offset + self.elements.len() - 1)
            })
            .collect()
    }

    fn reset(&mut self) {
        self.offset += self.elements.len();
        self.elements.clear();
    }
}

/// A live session on a WebDriver endpoint (`chromedriver`, `geckodriver`,
/// `msedgedriver`, or a Selenium grid).
pub struct WebDriverSession {
    driver: WebDriver,
    registry: Mutex<Registry>,
}

impl WebDriverSession {
    /// Opens a new browser session.
    ///
    /// `timeout_secs` becomes the browser's page-load timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::WebDriver`] if the endpoint is unreachable or
    /// the driver refuses the session.
    pub async fn start(
        endpoint: &str,
        kind: BrowserKind,
        headless: bool,
        timeout_secs: u64,
    ) -> Result<Self, ScraperError> {
        let caps = capabilities::capabilities(kind, headless, timeout_secs.saturating_mul(1000))
            .map_err(driver_error("new session"))?;
        let driver = WebDriver::new(endpoint, caps)
            .await
            .map_err(driver_error("new session"))?;

        tracing::info!(browser = %kind, endpoint, "webdriver session started");

        Ok(Self {
            driver,
            registry: Mutex::new(Registry::default()),
        })
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn element(&self, element: &ElementRef) -> Result<WebElement, ScraperError> {
        let registry = self.registry();
        element
            .0
            .checked_sub(registry.offset)
            .and_then(|i| registry.elements.get(i))
            .cloned()
            .ok_or_else(|| ScraperError::WebDriver {
                command: "element lookup".to_string(),
                message: format!(
                    "stale element reference: element {} predates the current page",
                    element.0
                ),
            })
    }
}

fn by(locator: &Locator) -> By {
    match locator.strategy() {
        ("xpath", xpath) => By::XPath(xpath),
        (_, css) => By::Css(css),
    }
}

/// Keeps the W3C error code in the message, so session loss stays detectable.
fn driver_error(command: &'static str) -> impl Fn(WebDriverError) -> ScraperError {
    move |e| {
        let message = if matches!(e.as_inner(), WebDriverErrorInner::InvalidSessionId(..)) {
            format!("invalid session id: {e}")
        } else {
            e.to_string()
        };
        ScraperError::WebDriver {
            command: command.to_string(),
            message,
        }
    }
}

#[async_trait]
impl Browser for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), ScraperError> {
        self.registry().reset();
        self.driver
            .goto(url)
            .await
            .map_err(driver_error("navigate"))
            .map_err(|e| ScraperError::Navigation {
                url: url.to_string(),
                reason: e.to_string(),
            })
    }

    async fn current_url(&self) -> Result<String, ScraperError> {
        let url = self
            .driver
            .current_url()
            .await
            .map_err(driver_error("get current url"))?;
        Ok(url.to_string())
    }

    async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, ScraperError> {
        let found = self
            .driver
            .find_all(by(locator))
            .await
            .map_err(driver_error("find elements"))?;
        Ok(self.registry().register(found))
    }

    async fn find_all_in(
        &self,
        parent: &ElementRef,
        locator: &Locator,
    ) -> Result<Vec<ElementRef>, ScraperError> {
        let found = self
            .element(parent)?
            .find_all(by(locator))
            .await
            .map_err(driver_error("find elements from element"))?;
        Ok(self.registry().register(found))
    }

    async fn text(&self, element: &ElementRef) -> Result<String, ScraperError> {
        self.element(element)?
            .text()
            .await
            .map_err(driver_error("get element text"))
    }

    async fn property(
        &self,
        element: &ElementRef,
        name: &str,
    ) -> Result<Option<String>, ScraperError> {
        self.element(element)?
            .prop(name)
            .await
            .map_err(driver_error("get element property"))
    }

    async fn is_displayed(&self, element: &ElementRef) -> Result<bool, ScraperError> {
        self.element(element)?
            .is_displayed()
            .await
            .map_err(driver_error("is element displayed"))
    }

    async fn click(&self, element: &ElementRef) -> Result<(), ScraperError> {
        self.element(element)?
            .click()
            .await
            .map_err(driver_error("element click"))
    }

    async fn scroll_into_view(&self, element: &ElementRef) -> Result<(), ScraperError> {
        self.element(element)?
            .scroll_into_view()
            .await
            .map_err(driver_error("scroll into view"))
    }

    async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, ScraperError> {
        let ret = self
            .driver
            .execute(script, args)
            .await
            .map_err(driver_error("execute script"))?;
        Ok(ret.json().clone())
    }

    async fn quit(&self) -> Result<(), ScraperError> {
        self.registry().reset();
        self.driver
            .clone()
            .quit()
            .await
            .map_err(driver_error("delete session"))?;
        tracing::info!("webdriver session closed");
        Ok(())
    }
}
