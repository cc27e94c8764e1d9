use crate::app_config::AppConfig;
use crate::ConfigError;

/// Longest a single description tab may be waited on.
const MAX_TAB_WAIT_SECS: u64 = 10;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("PAZAR_LOG_LEVEL", "info");
    let profiles_path = PathBuf::from(or_default("PAZAR_PROFILES_PATH", "./config/profiles.yaml"));
    let categories_path =
        PathBuf::from(or_default("PAZAR_CATEGORIES_PATH", "./config/categories.yaml"));
    let output_dir = PathBuf::from(or_default("PAZAR_OUTPUT_DIR", "."));
    let webdriver_url = or_default("PAZAR_WEBDRIVER_URL", "http://localhost:4444");
    let headless = parse_bool("PAZAR_HEADLESS", &or_default("PAZAR_HEADLESS", "false"))?;

    let webdriver_timeout_secs = parse_u64("PAZAR_WEBDRIVER_TIMEOUT_SECS", "60")?;
    let page_load_delay_ms = parse_u64("PAZAR_PAGE_LOAD_DELAY_MS", "2000")?;
    let scroll_pause_ms = parse_u64("PAZAR_SCROLL_PAUSE_MS", "2000")?;
    let max_scroll_rounds = parse_u32("PAZAR_MAX_SCROLL_ROUNDS", "50")?;
    let tab_wait_secs = parse_u64("PAZAR_TAB_WAIT_SECS", "10")?;
    let max_pages = parse_usize("PAZAR_MAX_PAGES", "200")?;

    if tab_wait_secs > MAX_TAB_WAIT_SECS {
        return Err(invalid(
            "PAZAR_TAB_WAIT_SECS",
            format!("must be at most {MAX_TAB_WAIT_SECS}, got {tab_wait_secs}"),
        ));
    }
    if max_pages == 0 {
        return Err(invalid("PAZAR_MAX_PAGES", "must be at least 1".to_string()));
    }

    Ok(AppConfig {
        log_level,
        profiles_path,
        categories_path,
        output_dir,
        webdriver_url,
        headless,
        webdriver_timeout_secs,
        page_load_delay_ms,
        scroll_pause_ms,
        max_scroll_rounds,
        tab_wait_secs,
        max_pages,
    })
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("unrecognized value '{other}'; expected true/false"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
