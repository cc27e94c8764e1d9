pub mod browser;
pub mod error;
pub mod extract;
pub mod normalize;
pub mod pagination;
pub mod parse;
pub mod settings;
pub mod table;
pub mod webdriver;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use browser::{Browser, ElementRef};
pub use error::{NormalizeError, ScraperError};
pub use extract::extract_record;
pub use normalize::{normalize_table, DEFAULT_KEYWORDS};
pub use pagination::{ListingPage, ListingWalker};
pub use settings::ScrapeSettings;
pub use table::{read_csv, write_csv, Table};
pub use webdriver::{BrowserKind, WebDriverSession};
