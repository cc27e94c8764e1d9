use std::fmt;

use serde_json::json;
use thirtyfour::prelude::*;
use thirtyfour::{Capabilities, CapabilitiesHelper, ChromiumLikeCapabilities};

/// Browsers a WebDriver session can be opened with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowserKind {
    Chrome,
    Firefox,
    Edge,
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserKind::Chrome => write!(f, "chrome"),
            BrowserKind::Firefox => write!(f, "firefox"),
            BrowserKind::Edge => write!(f, "edge"),
        }
    }
}

const CHROMIUM_ARGS: [&str; 7] = [
    "--ignore-certificate-errors",
    "--ignore-ssl-errors",
    "--window-size=1400,1200",
    "--disable-gpu",
    "--disable-dev-shm-usage",
    "--no-first-run",
    "--no-default-browser-check",
];

/// New-session capabilities. Certificate errors are always ignored.
pub(crate) fn capabilities(
    kind: BrowserKind,
    headless: bool,
    page_load_timeout_ms: u64,
) -> WebDriverResult<Capabilities> {
    match kind {
        BrowserKind::Chrome => {
            let mut caps = DesiredCapabilities::chrome();
            chromium(&mut caps, headless)?;
            common(&mut caps, page_load_timeout_ms)?;
            Ok(caps.into())
        }
        BrowserKind::Edge => {
            let mut caps = DesiredCapabilities::edge();
            chromium(&mut caps, headless)?;
            common(&mut caps, page_load_timeout_ms)?;
            Ok(caps.into())
        }
        BrowserKind::Firefox => {
            let mut caps = DesiredCapabilities::firefox();
            if headless {
                caps.set_headless()?;
            }
            common(&mut caps, page_load_timeout_ms)?;
            Ok(caps.into())
        }
    }
}

fn chromium<C: ChromiumLikeCapabilities>(caps: &mut C, headless: bool) -> WebDriverResult<()> {
    for arg in CHROMIUM_ARGS {
        caps.add_arg(arg)?;
    }
    if headless {
        caps.add_arg("--headless=new")?;
    }
    Ok(())
}

fn common<C: CapabilitiesHelper>(caps: &mut C, page_load_timeout_ms: u64) -> WebDriverResult<()> {
    caps.set_base_capability("acceptInsecureCerts", true)?;
    caps.set_base_capability("timeouts", json!({ "pageLoad": page_load_timeout_ms }))
}
