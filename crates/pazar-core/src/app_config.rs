use std::path::PathBuf;

/// Process-wide settings resolved from the environment at start-up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub profiles_path: PathBuf,
    pub categories_path: PathBuf,
    /// Root under which `{marketplace}/{sink}_{timestamp}.csv` files are written.
    pub output_dir: PathBuf,
    pub webdriver_url: String,
    pub headless: bool,
    pub webdriver_timeout_secs: u64,
    /// Fixed settle delay after every navigation.
    pub page_load_delay_ms: u64,
    /// Settle interval between scroll-to-bottom rounds on listing pages.
    pub scroll_pause_ms: u64,
    pub max_scroll_rounds: u32,
    /// Upper bound on waiting for a description tab's content to appear.
    pub tab_wait_secs: u64,
    pub max_pages: usize,
}
