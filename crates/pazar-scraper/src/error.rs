use thiserror::Error;

/// W3C error code reported once a session was closed or crashed.
const INVALID_SESSION: &str = "invalid session id";

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("webdriver command '{command}' failed: {message}")]
    WebDriver { command: String, message: String },

    #[error("mandatory field '{field}' not found on {url}")]
    MissingField { field: &'static str, url: String },

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("invalid URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("content for tab '{label}' did not appear within {timeout_secs}s")]
    TabTimeout { label: String, timeout_secs: u64 },

    #[error("CSV error for {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ScraperError {
    /// Whether the browser session itself is gone, so no later command on it
    /// can succeed.
    #[must_use]
    pub fn is_session_lost(&self) -> bool {
        match self {
            Self::WebDriver { message, .. } => mentions_invalid_session(message),
            Self::Navigation { reason, .. } => mentions_invalid_session(reason),
            _ => false,
        }
    }
}

fn mentions_invalid_session(text: &str) -> bool {
    text.to_lowercase().contains(INVALID_SESSION)
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("input table has no '{0}' column")]
    MissingColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn webdriver(message: &str) -> ScraperError {
        ScraperError::WebDriver {
            command: "navigate".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn closed_session_is_lost() {
        assert!(webdriver("Invalid session id: session deleted because of page crash").is_session_lost());
        assert!(ScraperError::Navigation {
            url: "https://www.sokmarket.com.tr/".to_string(),
            reason: "webdriver command 'navigate' failed: invalid session id: gone".to_string(),
        }
        .is_session_lost());
    }

    #[test]
    fn page_level_failures_are_not_session_loss() {
        assert!(!webdriver("no such element: Unable to locate element").is_session_lost());
        assert!(!ScraperError::MissingField {
            field: "image",
            url: "https://www.migros.com.tr/ayran-p-1".to_string(),
        }
        .is_session_lost());
    }
}
