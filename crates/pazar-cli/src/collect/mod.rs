//! The `run` command: scrape one category subtree from one marketplace.
//!
//! Configuration misses that only affect the requested category are logged
//! and end the run without output. Per-page and per-product failures are
//! logged and skipped inside the runner.

mod runner;
mod sink;

use pazar_core::AppConfig;
use pazar_scraper::{BrowserKind, ScrapeSettings, WebDriverSession};

/// Arguments of one `pazar run` invocation.
#[derive(Debug)]
pub(crate) struct RunRequest<'a> {
    pub category: &'a str,
    pub marketplace: &'a str,
    pub browser: BrowserKind,
    pub subcategory: &'a [String],
}

/// Scrape the requested category subtree and write the deduplicated batch.
///
/// The marketplace is looked up before any browser is launched. The browser
/// session is closed on every path once it has been opened.
///
/// # Errors
///
/// Returns an error if the profile or category files cannot be loaded, the
/// marketplace is unknown, the WebDriver session cannot be opened, the
/// session is lost mid-run, or the output file cannot be written.
pub(crate) async fn run_scrape(config: &AppConfig, request: &RunRequest<'_>) -> anyhow::Result<()> {
    let profiles = pazar_core::load_profiles(&config.profiles_path)?;
    let profile = profiles.get(request.marketplace)?;
    let tree = pazar_core::load_categories(&config.categories_path)?;

    let resolved = match tree.resolve(request.category, request.subcategory) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(
                category = request.category,
                subcategory = ?request.subcategory,
                error = %e,
                "category not found; nothing to scrape"
            );
            return Ok(());
        }
    };

    tracing::info!(
        marketplace = %profile.name,
        browser = %request.browser,
        category = %resolved.path.join(pazar_core::CATEGORY_SEPARATOR),
        "starting scrape run"
    );

    let started = chrono::Local::now().naive_local();
    let settings = ScrapeSettings::from_app_config(config);
    let session = WebDriverSession::start(
        &config.webdriver_url,
        request.browser,
        config.headless,
        config.webdriver_timeout_secs,
    )
    .await?;

    let results = runner::scrape_then_quit(&session, profile, &resolved, &settings).await?;

    let path = sink::output_path(&config.output_dir, &profile.name, &profile.output_sink, started);
    let written = sink::write_results(&path, &results)?;

    println!("wrote {written} products to {}", path.display());
    Ok(())
}
