//! Table-level normalization of a persisted scrape batch.
//!
//! Derives `Adet`/`Birim`/`Miktar` from `Ürün Adı` and splits `Açıklama` into
//! one column per section keyword. Rows are independent.

use pazar_core::{dedup_rows, Description};

use crate::error::NormalizeError;
use crate::parse::{extract_sections, extract_tab_sections, parse_quantity, parse_unit_amount};
use crate::table::Table;

pub const NAME_COLUMN: &str = "Ürün Adı";
pub const DESCRIPTION_COLUMN: &str = "Açıklama";
pub const DERIVED_COLUMNS: [&str; 3] = ["Adet", "Birim", "Miktar"];

pub const DEFAULT_KEYWORDS: [&str; 5] = [
    "Saklama Koşulları",
    "İçindekiler",
    "Besin Değerleri",
    "Alerjen Uyarısı",
    "Kullanım Önerisi",
];

/// Normalizes every row of `table` and removes duplicate rows.
///
/// Without an `Açıklama` column the section columns are omitted.
///
/// # Errors
///
/// Returns [`NormalizeError::MissingColumn`] if there is no `Ürün Adı` column.
pub fn normalize_table<S: AsRef<str>>(
    table: &Table,
    keywords: &[S],
) -> Result<Table, NormalizeError> {
    let name_idx = table
        .column(NAME_COLUMN)
        .ok_or_else(|| NormalizeError::MissingColumn(NAME_COLUMN.to_string()))?;
    let desc_idx = table.column(DESCRIPTION_COLUMN);
    if desc_idx.is_none() {
        tracing::warn!(
            column = DESCRIPTION_COLUMN,
            "column not found; section columns skipped"
        );
    }

    let mut headers = assemble(&table.headers, name_idx, desc_idx, |_| {
        DERIVED_COLUMNS.iter().map(|c| (*c).to_string()).collect()
    });
    if desc_idx.is_some() {
        headers.extend(keywords.iter().map(|k| k.as_ref().to_string()));
    }

    let rows = table.rows.iter().map(|row| {
        let mut out = assemble(row, name_idx, desc_idx, derived_cells);
        if let Some(idx) = desc_idx {
            let cell = row.get(idx).map_or("", String::as_str);
            out.extend(section_cells(cell, keywords));
        }
        out
    });

    let rows = dedup_rows(rows);
    tracing::info!(
        input_rows = table.rows.len(),
        output_rows = rows.len(),
        "normalized table"
    );
    Ok(Table { headers, rows })
}

/// Copies `cells` minus the description column, inserting `derive(name)`
/// right after the name column.
fn assemble<F>(cells: &[String], name_idx: usize, desc_idx: Option<usize>, derive: F) -> Vec<String>
where
    F: FnOnce(&str) -> Vec<String>,
{
    let name = cells.get(name_idx).map_or("", String::as_str);
    let mut derived = Some(derive(name));
    let mut out = Vec::with_capacity(cells.len() + DERIVED_COLUMNS.len());

    for (i, cell) in cells.iter().enumerate() {
        if Some(i) == desc_idx {
            continue;
        }
        out.push(cell.clone());
        if i == name_idx {
            out.extend(derived.take().unwrap_or_default());
        }
    }
    // Short ragged row: the name cell itself was missing.
    if let Some(cells) = derived {
        out.extend(cells);
    }
    out
}

fn derived_cells(name: &str) -> Vec<String> {
    let (unit, amount) = parse_unit_amount(name).unzip();
    vec![
        parse_quantity(name).to_string(),
        unit.unwrap_or_default(),
        amount.unwrap_or_default(),
    ]
}

fn section_cells<S: AsRef<str>>(cell: &str, keywords: &[S]) -> Vec<String> {
    match Description::from_cell(cell) {
        Description::Tabs(tabs) => extract_tab_sections(&tabs, keywords),
        Description::Text(text) => extract_sections(&text, keywords),
        Description::Missing => extract_sections("", keywords),
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
