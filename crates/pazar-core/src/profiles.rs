//! Per-marketplace selector profiles.
//!
//! A profile is pure data: where each product field lives on a detail page,
//! where the listing grid lives, and the optional capability flags
//! (`link_filter`, `suppress_fields`, `page_param`) that replace per-site
//! branching in the walker and extractor.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A DOM locator expression.
///
/// Written in YAML as a one-key map: `{ css: "..." }`, `{ xpath: "..." }`,
/// or `{ class: "a b c" }`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    Css(String),
    Xpath(String),
    /// Space- or dot-separated class names that must all be present.
    Class(String),
}

impl Locator {
    /// Returns the W3C WebDriver `(using, value)` pair for this locator.
    #[must_use]
    pub fn strategy(&self) -> (&'static str, String) {
        match self {
            Locator::Css(css) => ("css selector", css.clone()),
            Locator::Xpath(xpath) => ("xpath", xpath.clone()),
            Locator::Class(names) => ("css selector", compound_class_selector(names)),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(css) => write!(f, "css:{css}"),
            Locator::Xpath(xpath) => write!(f, "xpath:{xpath}"),
            Locator::Class(names) => write!(f, "class:{names}"),
        }
    }
}

/// Turns `"gap-2 grid tablet:!grid-cols-5"` into `.gap-2.grid.tablet\:\!grid-cols-5`.
fn compound_class_selector(names: &str) -> String {
    names
        .split(|c: char| c.is_whitespace() || c == '.')
        .filter(|name| !name.is_empty())
        .map(|name| {
            let mut escaped = String::with_capacity(name.len() + 1);
            escaped.push('.');
            for c in name.chars() {
                if !(c.is_ascii_alphanumeric() || c == '-' || c == '_') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped
        })
        .collect()
}

/// Optional product fields that a profile may suppress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Brand,
    ProductCode,
    OldPrice,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Brand => write!(f, "brand"),
            Field::ProductCode => write!(f, "product_code"),
            Field::OldPrice => write!(f, "old_price"),
            Field::Description => write!(f, "description"),
        }
    }
}

/// Clickable section headers and the content region each one reveals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TabSelectors {
    pub header: Locator,
    pub content: Locator,
}

/// Restricts harvested listing anchors to those carrying `attribute="value"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkFilter {
    pub attribute: String,
    pub value: String,
}

/// Field locators for a product detail page. The first four are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSelectors {
    pub image: Locator,
    pub product_name: Locator,
    pub current_price: Locator,
    pub current_price_fallback: Locator,
    #[serde(default)]
    pub old_price: Option<Locator>,
    #[serde(default)]
    pub brand: Option<Locator>,
    #[serde(default)]
    pub product_code: Option<Locator>,
    #[serde(default)]
    pub description: Option<Locator>,
    #[serde(default)]
    pub description_tabs: Option<TabSelectors>,
}

impl FieldSelectors {
    /// Returns the locator configured for an optional field, if any.
    #[must_use]
    pub fn optional(&self, field: Field) -> Option<&Locator> {
        match field {
            Field::Brand => self.brand.as_ref(),
            Field::ProductCode => self.product_code.as_ref(),
            Field::OldPrice => self.old_price.as_ref(),
            Field::Description => self.description.as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorProfile {
    /// The marketplace id, e.g. `"a101"`.
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Base name of the output file, e.g. `"a101_products"`.
    pub output_sink: String,
    pub grid: Locator,
    #[serde(default)]
    pub link_filter: Option<LinkFilter>,
    #[serde(default)]
    pub suppress_fields: BTreeSet<Field>,
    #[serde(default = "default_page_param")]
    pub page_param: String,
    pub selectors: FieldSelectors,
}

fn default_page_param() -> String {
    "page".to_string()
}

impl SelectorProfile {
    /// `true` when `id` names this marketplace (case-insensitive, aliases included).
    #[must_use]
    pub fn matches_id(&self, id: &str) -> bool {
        let id = id.trim().to_lowercase();
        self.name.to_lowercase() == id || self.aliases.iter().any(|a| a.to_lowercase() == id)
    }

    #[must_use]
    pub fn is_suppressed(&self, field: Field) -> bool {
        self.suppress_fields.contains(&field)
    }

    /// Grid-relative locator for product anchors, honouring `link_filter`.
    #[must_use]
    pub fn link_locator(&self) -> Locator {
        match &self.link_filter {
            None => Locator::Xpath(".//a[@href]".to_string()),
            Some(filter) => Locator::Xpath(format!(
                ".//a[@href][@{}={}]",
                filter.attribute,
                xpath_literal(&filter.value)
            )),
        }
    }
}

fn xpath_literal(value: &str) -> String {
    if value.contains('\'') {
        format!("\"{value}\"")
    } else {
        format!("'{value}'")
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileSet {
    pub profiles: Vec<SelectorProfile>,
}

impl ProfileSet {
    /// Looks up a profile by marketplace id or alias.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownMarketplace`] listing the known ids.
    pub fn get(&self, id: &str) -> Result<&SelectorProfile, ConfigError> {
        self.profiles
            .iter()
            .find(|p| p.matches_id(id))
            .ok_or_else(|| ConfigError::UnknownMarketplace {
                name: id.to_string(),
                known: self
                    .profiles
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}

/// Load and validate selector profiles from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_profiles(path: &Path) -> Result<ProfileSet, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let profile_set: ProfileSet =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    validate_profiles(&profile_set)?;

    Ok(profile_set)
}

fn validate_profiles(profile_set: &ProfileSet) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();

    for profile in &profile_set.profiles {
        if profile.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "profile name must be non-empty".to_string(),
            ));
        }

        let sink = profile.output_sink.trim();
        if sink.is_empty() || sink.contains(['/', '\\']) || sink.contains("..") {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has invalid output_sink '{}'",
                profile.name, profile.output_sink
            )));
        }

        if profile.page_param.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "profile '{}' has an empty page_param",
                profile.name
            )));
        }

        // Aliases that only differ from the name by case are redundant, not clashes.
        let own_ids: BTreeSet<String> = std::iter::once(&profile.name)
            .chain(&profile.aliases)
            .map(|id| id.trim().to_lowercase())
            .collect();
        for id in own_ids {
            if !seen_ids.insert(id.clone()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate marketplace id: '{id}'"
                )));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "profiles_test.rs"]
mod tests;
