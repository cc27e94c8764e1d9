//! Depth-first walk of a category subtree on a single browser session.
//!
//! Nodes are visited in pre-order following the tree's stored child order.
//! A node without a listing URL for the marketplace is skipped on its own;
//! its children are still visited. Only a lost browser session aborts the
//! walk.

use pazar_core::{CategoryNode, ResolvedCategory, ResultSet, SelectorProfile, CATEGORY_SEPARATOR};
use pazar_scraper::{extract_record, Browser, ListingWalker, ScrapeSettings, ScraperError};

/// Runs [`scrape_subtree`] and then closes the browser, whatever the outcome.
///
/// # Errors
///
/// Returns the error that aborted the walk. A failure to close the session is
/// only logged.
pub(super) async fn scrape_then_quit<B>(
    browser: &B,
    profile: &SelectorProfile,
    root: &ResolvedCategory<'_>,
    settings: &ScrapeSettings,
) -> anyhow::Result<ResultSet>
where
    B: Browser + ?Sized,
{
    let outcome = scrape_subtree(browser, profile, root, settings).await;
    if let Err(e) = browser.quit().await {
        tracing::warn!(error = %e, "failed to close browser session");
    }
    Ok(outcome?)
}

/// Scrapes `root` and every descendant, accumulating records in visit order.
///
/// # Errors
///
/// Returns the first error for which [`ScraperError::is_session_lost`] holds.
pub(super) async fn scrape_subtree<B>(
    browser: &B,
    profile: &SelectorProfile,
    root: &ResolvedCategory<'_>,
    settings: &ScrapeSettings,
) -> Result<ResultSet, ScraperError>
where
    B: Browser + ?Sized,
{
    let mut results = ResultSet::new();
    let mut stack: Vec<(&CategoryNode, Vec<String>)> = vec![(root.node, root.path.clone())];

    while let Some((node, path)) = stack.pop() {
        for child in node.children.iter().rev() {
            let mut child_path = path.clone();
            child_path.push(child.name.clone());
            stack.push((child, child_path));
        }

        let label = path.join(CATEGORY_SEPARATOR);
        let Some(url) = node.url_for(&profile.name) else {
            tracing::warn!(
                category = %label,
                marketplace = %profile.name,
                "no listing URL for marketplace; skipping category"
            );
            continue;
        };

        tracing::info!(category = %label, url, "category started");
        let before = results.len();
        results.extend(scrape_category(browser, profile, url, &path, settings).await?);
        tracing::info!(
            category = %label,
            records = results.len() - before,
            "category finished"
        );
    }

    Ok(results)
}

/// Collects every product link of one listing, then extracts each product.
async fn scrape_category<B>(
    browser: &B,
    profile: &SelectorProfile,
    url: &str,
    path: &[String],
    settings: &ScrapeSettings,
) -> Result<ResultSet, ScraperError>
where
    B: Browser + ?Sized,
{
    let mut results = ResultSet::new();
    let mut walker = match ListingWalker::new(browser, profile, settings, url) {
        Ok(walker) => walker,
        Err(e) => {
            tracing::warn!(url, error = %e, "skipping category with unusable listing URL");
            return Ok(results);
        }
    };

    let mut links = Vec::new();
    while let Some(page) = walker.next_page().await {
        match page {
            Ok(page) => links.extend(page.links),
            Err(e) if e.is_session_lost() => return Err(e),
            Err(e) => tracing::warn!(url, error = %e, "skipping listing page"),
        }
    }

    let total = links.len();
    for (i, link) in links.iter().enumerate() {
        tracing::info!(product = i + 1, total, url = %link, "scraping product");
        match scrape_product(browser, profile, link, path, settings).await {
            Ok(record) => results.push(record),
            Err(e) if e.is_session_lost() => return Err(e),
            Err(e) => tracing::warn!(url = %link, error = %e, "skipping product"),
        }
    }

    Ok(results)
}

async fn scrape_product<B>(
    browser: &B,
    profile: &SelectorProfile,
    link: &str,
    path: &[String],
    settings: &ScrapeSettings,
) -> Result<pazar_core::ProductRecord, ScraperError>
where
    B: Browser + ?Sized,
{
    browser.goto(link).await?;
    tokio::time::sleep(settings.page_load_delay).await;
    extract_record(browser, profile, path, settings).await
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
