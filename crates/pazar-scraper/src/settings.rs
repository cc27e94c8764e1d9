use std::time::Duration;

use pazar_core::AppConfig;

/// Timing and bounds shared by the walker and the extractor.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub page_load_delay: Duration,
    pub scroll_pause: Duration,
    pub max_scroll_rounds: u32,
    pub tab_wait: Duration,
    pub tab_poll: Duration,
    pub max_pages: usize,
}

impl ScrapeSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            page_load_delay: Duration::from_millis(config.page_load_delay_ms),
            scroll_pause: Duration::from_millis(config.scroll_pause_ms),
            max_scroll_rounds: config.max_scroll_rounds,
            tab_wait: Duration::from_secs(config.tab_wait_secs),
            tab_poll: Duration::from_millis(250),
            max_pages: config.max_pages,
        }
    }

    /// No waits at all; for driving a fake browser.
    #[cfg(any(test, feature = "test-support"))]
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            page_load_delay: Duration::ZERO,
            scroll_pause: Duration::ZERO,
            max_scroll_rounds: 3,
            tab_wait: Duration::ZERO,
            tab_poll: Duration::ZERO,
            max_pages: 20,
        }
    }
}
