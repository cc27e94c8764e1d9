use std::path::Path;

use crate::error::ScraperError;

/// A header row plus string cells, as persisted to CSV.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Reads a CSV file with a header row. A leading UTF-8 BOM is ignored.
///
/// # Errors
///
/// Returns [`ScraperError::Csv`] if the file cannot be opened or a row is
/// malformed.
pub fn read_csv(path: &Path) -> Result<Table, ScraperError> {
    let csv_err = |source| ScraperError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_err)?;

    let mut headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table { headers, rows })
}

/// Writes `table` as UTF-8 CSV, header row first, creating parent directories.
///
/// # Errors
///
/// Returns [`ScraperError::Io`] if the directory cannot be created and
/// [`ScraperError::Csv`] if writing fails.
pub fn write_csv(path: &Path, table: &Table) -> Result<(), ScraperError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ScraperError::Io {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let csv_err = |source| ScraperError::Csv {
        path: path.display().to_string(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    writer.write_record(&table.headers).map_err(csv_err)?;
    for row in &table.rows {
        writer.write_record(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|e| ScraperError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    Ok(())
}
