use std::collections::HashSet;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Placeholder written for a field that was looked for and not found.
pub const SENTINEL: &str = "-";

/// Column order of a scrape batch.
pub const HEADERS: [&str; 11] = [
    "Market",
    "Kategori",
    "Resim",
    "Ürün Adı",
    "Marka",
    "Ürün Kodu",
    "İndirimli Fiyat",
    "Fiyat",
    "Açıklama",
    "Kaynak",
    "Tarih",
];

pub const CATEGORY_SEPARATOR: &str = " > ";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of resolving a non-mandatory field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scraped {
    Found(String),
    Missing,
}

impl Scraped {
    /// Trims `text`; absent or blank text is [`Scraped::Missing`].
    #[must_use]
    pub fn from_text(text: Option<&str>) -> Self {
        match text.map(str::trim) {
            Some(t) if !t.is_empty() => Scraped::Found(t.to_string()),
            _ => Scraped::Missing,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Scraped::Found(value) => value,
            Scraped::Missing => SENTINEL,
        }
    }
}

impl fmt::Display for Scraped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DescriptionTab {
    pub index: usize,
    pub label: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Description {
    Text(String),
    /// Captured tab sections in document order.
    Tabs(Vec<DescriptionTab>),
    Missing,
}

impl Description {
    /// The value stored in the `Açıklama` cell.
    #[must_use]
    pub fn payload(&self) -> String {
        match self {
            Description::Text(text) => text.clone(),
            Description::Tabs(tabs) if tabs.is_empty() => SENTINEL.to_string(),
            Description::Tabs(tabs) => {
                serde_json::to_string(tabs).unwrap_or_else(|_| SENTINEL.to_string())
            }
            Description::Missing => SENTINEL.to_string(),
        }
    }

    /// Inverse of [`Description::payload`] for a persisted cell.
    #[must_use]
    pub fn from_cell(cell: &str) -> Self {
        let trimmed = cell.trim();
        if trimmed.is_empty() || trimmed == SENTINEL {
            return Description::Missing;
        }
        if trimmed.starts_with('[') {
            if let Ok(tabs) = serde_json::from_str::<Vec<DescriptionTab>>(trimmed) {
                return Description::Tabs(tabs);
            }
        }
        Description::Text(cell.to_string())
    }
}

/// Discounted and list price after the price-swap rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prices {
    /// `İndirimli Fiyat`
    pub discounted: Scraped,
    /// `Fiyat`
    pub list: Scraped,
}

impl Prices {
    /// With no old price the current price is the list price and the
    /// discounted price is the sentinel.
    #[must_use]
    pub fn from_scraped(current: Scraped, old: Scraped) -> Self {
        match old {
            Scraped::Missing => Prices {
                discounted: Scraped::Missing,
                list: current,
            },
            found @ Scraped::Found(_) => Prices {
                discounted: current,
                list: found,
            },
        }
    }
}

/// One product as scraped from its detail page.
///
/// Optional fields are `None` when the marketplace profile does not configure
/// them, which renders as an empty cell rather than the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub market: String,
    pub category_path: Vec<String>,
    pub source_url: String,
    pub scraped_at: NaiveDateTime,
    pub image_url: String,
    pub product_name: String,
    pub brand: Option<Scraped>,
    pub product_code: Option<Scraped>,
    pub prices: Prices,
    pub description: Option<Description>,
}

impl ProductRecord {
    /// Projects the record onto [`HEADERS`].
    #[must_use]
    pub fn to_row(&self) -> Vec<String> {
        let optional = |value: &Option<Scraped>| {
            value
                .as_ref()
                .map(|v| v.as_str().to_string())
                .unwrap_or_default()
        };

        vec![
            self.market.clone(),
            self.category_path.join(CATEGORY_SEPARATOR),
            self.image_url.clone(),
            self.product_name.clone(),
            optional(&self.brand),
            optional(&self.product_code),
            self.prices.discounted.as_str().to_string(),
            self.prices.list.as_str().to_string(),
            self.description
                .as_ref()
                .map(Description::payload)
                .unwrap_or_default(),
            self.source_url.clone(),
            self.scraped_at.format(TIMESTAMP_FORMAT).to_string(),
        ]
    }
}

/// Records accumulated over one run, in scrape order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    records: Vec<ProductRecord>,
}

impl ResultSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ProductRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, other: ResultSet) {
        self.records.extend(other.records);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.iter()
    }

    /// Projected rows with exact duplicates removed, first occurrence kept.
    #[must_use]
    pub fn deduplicated_rows(&self) -> Vec<Vec<String>> {
        dedup_rows(self.records.iter().map(ProductRecord::to_row))
    }
}

/// Removes rows equal to an earlier row, preserving order.
pub fn dedup_rows<I>(rows: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect()
}
