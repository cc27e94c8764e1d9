pub mod app_config;
pub mod categories;
pub mod config;
pub mod profiles;
pub mod records;

pub use app_config::AppConfig;
pub use categories::{load_categories, CategoryNode, CategoryTree, ResolvedCategory};
pub use config::{load_app_config, load_app_config_from_env};
pub use profiles::{
    load_profiles, Field, LinkFilter, Locator, ProfileSet, SelectorProfile, TabSelectors,
};
pub use records::{
    dedup_rows, Description, DescriptionTab, Prices, ProductRecord, ResultSet, Scraped,
    CATEGORY_SEPARATOR, HEADERS, SENTINEL, TIMESTAMP_FORMAT,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    FileParse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unknown marketplace '{name}' (known: {known})")]
    UnknownMarketplace { name: String, known: String },

    #[error("category '{0}' not found in category tree")]
    UnknownCategory(String),

    #[error("subcategory '{name}' not found under '{parent}'")]
    UnknownSubcategory { parent: String, name: String },
}
