//! Listing pagination over `?page=N` URLs.
//!
//! The walk ends when a rendered page has no grid container, when the browser
//! lands on the same URL as the previous page (the site ignored the page
//! parameter), or at the configured page bound.

use std::collections::HashSet;

use pazar_core::SelectorProfile;
use url::Url;

use crate::browser::Browser;
use crate::error::ScraperError;
use crate::settings::ScrapeSettings;

/// Consecutive listing-page failures after which a category is abandoned.
const MAX_CONSECUTIVE_FAILURES: u32 = 3;

const SCROLL_HEIGHT_SCRIPT: &str = "return document.body.scrollHeight;";
const SCROLL_TO_BOTTOM_SCRIPT: &str = "window.scrollTo(0, document.body.scrollHeight);";

/// Product links harvested from one rendered listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub number: usize,
    /// URL the browser reported after navigation.
    pub url: String,
    pub links: Vec<String>,
}

enum Rendered {
    Page(ListingPage),
    End,
}

/// Lazily renders successive listing pages of one category.
pub struct ListingWalker<'a, B: ?Sized> {
    browser: &'a B,
    profile: &'a SelectorProfile,
    settings: &'a ScrapeSettings,
    base_url: Url,
    page: usize,
    previous_url: Option<String>,
    consecutive_failures: u32,
    finished: bool,
}

impl<'a, B> ListingWalker<'a, B>
where
    B: Browser + ?Sized,
{
    /// # Errors
    ///
    /// Returns [`ScraperError::InvalidUrl`] if `base_url` is not an absolute
    /// http(s) URL.
    pub fn new(
        browser: &'a B,
        profile: &'a SelectorProfile,
        settings: &'a ScrapeSettings,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let base_url = parse_http_url(base_url)?;
        Ok(Self {
            browser,
            profile,
            settings,
            base_url,
            page: 0,
            previous_url: None,
            consecutive_failures: 0,
            finished: false,
        })
    }

    /// Renders the next listing page.
    ///
    /// Returns `None` once the walk has ended. A page that fails to load is
    /// returned as `Some(Err(_))` and the walk continues with the next page
    /// number, until too many fail in a row.
    pub async fn next_page(&mut self) -> Option<Result<ListingPage, ScraperError>> {
        if self.finished {
            return None;
        }
        if self.page >= self.settings.max_pages {
            tracing::warn!(
                url = %self.base_url,
                max_pages = self.settings.max_pages,
                "page limit reached; stopping pagination"
            );
            self.finished = true;
            return None;
        }

        self.page += 1;
        let url = page_url(&self.base_url, &self.profile.page_param, self.page);

        match self.render(&url).await {
            Ok(Rendered::Page(page)) => {
                self.consecutive_failures = 0;
                Some(Ok(page))
            }
            Ok(Rendered::End) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.consecutive_failures += 1;
                if self.consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    tracing::warn!(
                        url = %self.base_url,
                        failures = self.consecutive_failures,
                        "too many consecutive listing failures; stopping pagination"
                    );
                    self.finished = true;
                }
                Some(Err(e))
            }
        }
    }

    async fn render(&mut self, url: &Url) -> Result<Rendered, ScraperError> {
        self.browser.goto(url.as_str()).await?;
        tokio::time::sleep(self.settings.page_load_delay).await;

        let resolved = self.browser.current_url().await?;
        if self.previous_url.as_deref() == Some(resolved.as_str()) {
            tracing::info!(page = self.page, url = %resolved, "page resolved to previous URL; last page reached");
            return Ok(Rendered::End);
        }
        self.previous_url = Some(resolved.clone());

        self.settle_scroll().await?;

        let grids = self.browser.find_all(&self.profile.grid).await?;
        if grids.is_empty() {
            tracing::info!(page = self.page, url = %resolved, "no product grid; last page reached");
            return Ok(Rendered::End);
        }

        let page_base = Url::parse(&resolved).unwrap_or_else(|_| url.clone());
        let link_locator = self.profile.link_locator();
        let mut seen = HashSet::new();
        let mut links = Vec::new();

        for grid in &grids {
            for anchor in self.browser.find_all_in(grid, &link_locator).await? {
                if !self.browser.is_displayed(&anchor).await.unwrap_or(false) {
                    continue;
                }
                let Some(href) = self.browser.property(&anchor, "href").await? else {
                    continue;
                };
                match normalize_link(&page_base, &href) {
                    Ok(link) => {
                        if seen.insert(link.clone()) {
                            links.push(link);
                        }
                    }
                    Err(e) => tracing::warn!(href = %href, error = %e, "skipping malformed product link"),
                }
            }
        }

        tracing::info!(
            page = self.page,
            grids = grids.len(),
            links = links.len(),
            url = %resolved,
            "listing page collected"
        );

        Ok(Rendered::Page(ListingPage {
            number: self.page,
            url: resolved,
            links,
        }))
    }

    /// Scrolls to the bottom until the document stops growing.
    async fn settle_scroll(&self) -> Result<(), ScraperError> {
        let mut last_height = self.scroll_height().await?;
        for _ in 0..self.settings.max_scroll_rounds {
            self.browser
                .execute(SCROLL_TO_BOTTOM_SCRIPT, Vec::new())
                .await?;
            tokio::time::sleep(self.settings.scroll_pause).await;
            let height = self.scroll_height().await?;
            if height == last_height {
                break;
            }
            last_height = height;
        }
        Ok(())
    }

    async fn scroll_height(&self) -> Result<serde_json::Value, ScraperError> {
        self.browser
            .execute(SCROLL_HEIGHT_SCRIPT, Vec::new())
            .await
    }
}

/// `base` with `param` set to `page`, replacing any existing value.
#[must_use]
pub fn page_url(base: &Url, param: &str, page: usize) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| &**key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(param, &page.to_string());
    }
    url
}

/// Resolves `href` against `page` and checks it is an http(s) URL with a host.
///
/// The fragment is dropped.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUrl`] for unparseable or non-web links.
pub fn normalize_link(page: &Url, href: &str) -> Result<String, ScraperError> {
    let href = href.trim();
    let invalid = |reason: &str| ScraperError::InvalidUrl {
        url: href.to_string(),
        reason: reason.to_string(),
    };
    if href.is_empty() {
        return Err(invalid("empty href"));
    }
    let mut url = page.join(href).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("not an http(s) link"));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }
    url.set_fragment(None);
    Ok(url.to_string())
}

fn parse_http_url(raw: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(raw.trim()).map_err(|e| ScraperError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ScraperError::InvalidUrl {
            url: raw.to_string(),
            reason: "expected an absolute http(s) URL".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "pagination_test.rs"]
mod tests;
