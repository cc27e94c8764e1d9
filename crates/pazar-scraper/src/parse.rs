//! Free-text parsers for product names and descriptions.
//!
//! Quantity and unit tokens sit at the end of Turkish product names
//! (`"Su 6'lı 500 ml"`, `"Ayran 4x200 ml"`), so every name parser keeps the
//! last match in the string.

use std::sync::LazyLock;

use pazar_core::{DescriptionTab, SENTINEL};
use regex::Regex;

/// `6'lı`, `6 li`, `12'Lİ`, `3lü`, but not the `5 Li` of `5 Litre`
static PARTITIVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\s*['’]?\s*[lL][iİıIuUüÜ](?:[^\p{L}]|$)").expect("valid partitive regex")
});
/// `4x`, `4 X 200`
static COUNT_TIMES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*[xX×](?:\s|\d|$)").expect("valid multiplier regex"));
/// `x4`, `× 6`
static TIMES_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[xX×]\s*(\d+)").expect("valid multiplier regex"));
/// `500ml`, `1 L`, `1,5 kg`
static UNIT_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:[.,]\d+)?)\s*([a-zA-Z]+)").expect("valid unit regex")
});

/// Pack count from a product name; `1` when none is stated.
#[must_use]
pub fn parse_quantity(name: &str) -> u32 {
    [&*PARTITIVE_RE, &*COUNT_TIMES_RE, &*TIMES_COUNT_RE]
        .into_iter()
        .find_map(|re| last_number(re, name))
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

fn last_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// `(unit, amount)` from the last `{number}{letters}` token of a name.
///
/// A decimal comma in the amount becomes a point.
#[must_use]
pub fn parse_unit_amount(name: &str) -> Option<(String, String)> {
    let caps = UNIT_AMOUNT_RE.captures_iter(name).last()?;
    let amount = caps.get(1)?.as_str().replace(',', ".");
    let unit = caps.get(2)?.as_str().to_string();
    Some((unit, amount))
}

/// Splits labelled free text into one value per keyword, in keyword order.
///
/// Each keyword's content runs from its optional colon to the next keyword
/// occurrence or the end of text. Only the first occurrence of a keyword
/// counts; absent keywords yield [`SENTINEL`].
#[must_use]
pub fn extract_sections<S: AsRef<str>>(text: &str, keywords: &[S]) -> Vec<String> {
    let mut found: Vec<Option<String>> = vec![None; keywords.len()];
    let Some(re) = keyword_regex(keywords) else {
        return sentinels(keywords.len());
    };

    let matches: Vec<_> = re.captures_iter(text).collect();
    for (i, caps) in matches.iter().enumerate() {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let end = matches
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(text.len(), |m| m.start());
        let Some(slot) = keywords.iter().position(|k| k.as_ref() == keyword.as_str()) else {
            continue;
        };
        if found[slot].is_none() {
            found[slot] = Some(text[whole.end()..end].trim().to_string());
        }
    }

    found
        .into_iter()
        .map(|value| value.unwrap_or_else(|| SENTINEL.to_string()))
        .collect()
}

/// Longest keyword first so overlapping keywords match whole.
fn keyword_regex<S: AsRef<str>>(keywords: &[S]) -> Option<Regex> {
    let mut sorted: Vec<&str> = keywords
        .iter()
        .map(AsRef::as_ref)
        .filter(|k| !k.is_empty())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternation = sorted
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"({alternation})\s*:?\s*")).ok()
}

/// Matches tab labels to keywords ignoring case and whitespace; content is
/// copied verbatim.
#[must_use]
pub fn extract_tab_sections<S: AsRef<str>>(tabs: &[DescriptionTab], keywords: &[S]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| {
            let wanted = fold_label(keyword.as_ref());
            tabs.iter()
                .find(|tab| fold_label(&tab.label) == wanted)
                .map_or_else(|| SENTINEL.to_string(), |tab| tab.content.clone())
        })
        .collect()
}

/// Lowercase and strip whitespace; `İ`/`I`/`ı` all fold to `i`.
fn fold_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .filter(|&c| c != '\u{307}')
        .map(|c| if c == 'ı' { 'i' } else { c })
        .collect()
}

fn sentinels(n: usize) -> Vec<String> {
    vec![SENTINEL.to_string(); n]
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
