//! Record extraction from a rendered product detail page.
//!
//! `image`, `product_name` and `current_price` (primary or fallback) are
//! mandatory: a miss is [`ScraperError::MissingField`] and the caller skips
//! the record. Every other field degrades to [`Scraped::Missing`].

use chrono::Local;
use pazar_core::{
    Description, DescriptionTab, Field, Locator, Prices, ProductRecord, Scraped, SelectorProfile,
    TabSelectors,
};

use crate::browser::{Browser, ElementRef};
use crate::error::ScraperError;
use crate::settings::ScrapeSettings;

/// Extracts one product from the page the browser is currently showing.
///
/// Does not navigate.
///
/// # Errors
///
/// - [`ScraperError::MissingField`] when a mandatory field is absent.
/// - Any browser error raised while reading a mandatory field.
pub async fn extract_record<B>(
    browser: &B,
    profile: &SelectorProfile,
    category_path: &[String],
    settings: &ScrapeSettings,
) -> Result<ProductRecord, ScraperError>
where
    B: Browser + ?Sized,
{
    let selectors = &profile.selectors;
    let source_url = browser.current_url().await?;
    let missing = |field: &'static str| ScraperError::MissingField {
        field,
        url: source_url.clone(),
    };

    let image = browser
        .find_first(&selectors.image)
        .await?
        .ok_or_else(|| missing("image"))?;
    let image_url = browser
        .property(&image, "src")
        .await?
        .filter(|src| !src.trim().is_empty())
        .ok_or_else(|| missing("image"))?;

    let name_element = browser
        .find_first(&selectors.product_name)
        .await?
        .ok_or_else(|| missing("product_name"))?;
    let product_name = browser.text(&name_element).await?.trim().to_string();

    let price_element = match browser.find_first(&selectors.current_price).await? {
        Some(element) => element,
        None => browser
            .find_first(&selectors.current_price_fallback)
            .await?
            .ok_or_else(|| missing("current_price"))?,
    };
    let current_price = Scraped::from_text(Some(&browser.text(&price_element).await?));

    let brand = optional_field(browser, profile, Field::Brand, &source_url).await;
    let product_code = optional_field(browser, profile, Field::ProductCode, &source_url)
        .await
        .map(strip_code_label);
    let old_price = optional_field(browser, profile, Field::OldPrice, &source_url)
        .await
        .unwrap_or(Scraped::Missing);
    let description = description(browser, profile, &source_url, settings).await;

    Ok(ProductRecord {
        market: profile.name.clone(),
        category_path: category_path.to_vec(),
        source_url,
        scraped_at: Local::now().naive_local(),
        image_url,
        product_name,
        brand,
        product_code,
        prices: Prices::from_scraped(current_price, old_price),
        description,
    })
}

/// `None` when the profile does not configure `field`; suppressed fields are
/// always the sentinel.
async fn optional_field<B>(
    browser: &B,
    profile: &SelectorProfile,
    field: Field,
    url: &str,
) -> Option<Scraped>
where
    B: Browser + ?Sized,
{
    if profile.is_suppressed(field) {
        return Some(Scraped::Missing);
    }
    let locator = profile.selectors.optional(field)?;
    match first_text(browser, locator).await {
        Ok(text) => Some(Scraped::from_text(text.as_deref())),
        Err(e) => {
            tracing::warn!(%field, url, error = %e, "optional field lookup failed");
            Some(Scraped::Missing)
        }
    }
}

async fn first_text<B>(browser: &B, locator: &Locator) -> Result<Option<String>, ScraperError>
where
    B: Browser + ?Sized,
{
    match browser.find_first(locator).await? {
        Some(element) => browser.text(&element).await.map(Some),
        None => Ok(None),
    }
}

/// `"Ürün Kodu: 26002233"` → `"26002233"`.
fn strip_code_label(code: Scraped) -> Scraped {
    match code {
        Scraped::Found(text) => match text.split_once(": ") {
            Some((_, value)) => Scraped::from_text(Some(value)),
            None => Scraped::Found(text),
        },
        Scraped::Missing => Scraped::Missing,
    }
}

async fn description<B>(
    browser: &B,
    profile: &SelectorProfile,
    url: &str,
    settings: &ScrapeSettings,
) -> Option<Description>
where
    B: Browser + ?Sized,
{
    if profile.is_suppressed(Field::Description) {
        return Some(Description::Missing);
    }
    if let Some(tabs) = &profile.selectors.description_tabs {
        return Some(match description_tabs(browser, tabs, url, settings).await {
            Ok(captured) if !captured.is_empty() => Description::Tabs(captured),
            Ok(_) => Description::Missing,
            Err(e) => {
                tracing::warn!(url, error = %e, "description tabs not readable");
                Description::Missing
            }
        });
    }
    optional_field(browser, profile, Field::Description, url)
        .await
        .map(|text| match text {
            Scraped::Found(text) => Description::Text(text),
            Scraped::Missing => Description::Missing,
        })
}

/// Activates each tab header in document order and captures its content.
///
/// A tab that cannot be activated, or whose content never appears, is skipped.
async fn description_tabs<B>(
    browser: &B,
    tabs: &TabSelectors,
    url: &str,
    settings: &ScrapeSettings,
) -> Result<Vec<DescriptionTab>, ScraperError>
where
    B: Browser + ?Sized,
{
    let headers = browser.find_all(&tabs.header).await?;
    let mut captured = Vec::with_capacity(headers.len());

    for (index, header) in headers.iter().enumerate() {
        let label = browser
            .text(header)
            .await
            .map(|t| t.trim().to_string())
            .unwrap_or_default();

        match capture_tab(browser, header, &label, tabs, settings).await {
            Ok(content) => captured.push(DescriptionTab {
                index,
                label,
                content,
            }),
            Err(e) => {
                tracing::warn!(url, tab = index, label = %label, error = %e, "skipping description tab");
            }
        }
    }

    Ok(captured)
}

async fn capture_tab<B>(
    browser: &B,
    header: &ElementRef,
    label: &str,
    tabs: &TabSelectors,
    settings: &ScrapeSettings,
) -> Result<String, ScraperError>
where
    B: Browser + ?Sized,
{
    browser.scroll_into_view(header).await?;
    browser.click(header).await?;

    let regions = browser
        .wait_for(&tabs.content, settings.tab_wait, settings.tab_poll)
        .await?;
    if regions.is_empty() {
        return Err(ScraperError::TabTimeout {
            label: label.to_string(),
            timeout_secs: settings.tab_wait.as_secs(),
        });
    }

    // The active panel is the displayed one; fall back to the first match.
    let mut chosen = &regions[0];
    for region in &regions {
        if browser.is_displayed(region).await.unwrap_or(false) {
            chosen = region;
            break;
        }
    }
    Ok(browser.text(chosen).await?.trim().to_string())
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
