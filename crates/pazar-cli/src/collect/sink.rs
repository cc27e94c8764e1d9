use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use pazar_core::{ResultSet, HEADERS};
use pazar_scraper::{write_csv, Table};

const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `{output_dir}/{marketplace}/{sink}_{YYYYMMDD_HHMMSS}.csv`
pub(super) fn output_path(
    output_dir: &Path,
    marketplace: &str,
    sink: &str,
    started: NaiveDateTime,
) -> PathBuf {
    output_dir.join(marketplace).join(format!(
        "{sink}_{}.csv",
        started.format(FILE_TIMESTAMP_FORMAT)
    ))
}

/// Writes the deduplicated batch and returns the number of rows written.
pub(super) fn write_results(path: &Path, results: &ResultSet) -> anyhow::Result<usize> {
    let table = Table {
        headers: HEADERS.iter().map(|h| (*h).to_string()).collect(),
        rows: results.deduplicated_rows(),
    };
    if table.rows.len() < results.len() {
        tracing::info!(
            scraped = results.len(),
            unique = table.rows.len(),
            "removed duplicate records"
        );
    }
    write_csv(path, &table)?;
    tracing::info!(path = %path.display(), rows = table.rows.len(), "batch written");
    Ok(table.rows.len())
}
