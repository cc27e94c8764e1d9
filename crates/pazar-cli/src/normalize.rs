//! The `normalize` command.

use std::path::{Path, PathBuf};

use pazar_scraper::{normalize_table, read_csv, write_csv, DEFAULT_KEYWORDS};

/// Normalizes the batch at `input` and writes it to `output`, or to
/// `<input>_updated.csv` beside the input.
///
/// An empty `keywords` list selects [`DEFAULT_KEYWORDS`].
///
/// # Errors
///
/// Returns an error if the input cannot be read, has no product name column,
/// or the output cannot be written.
pub(crate) fn run_normalize(
    input: &Path,
    output: Option<&Path>,
    keywords: &[String],
) -> anyhow::Result<()> {
    let table = read_csv(input)?;
    let normalized = if keywords.is_empty() {
        normalize_table(&table, &DEFAULT_KEYWORDS)?
    } else {
        normalize_table(&table, keywords)?
    };

    let output = output.map_or_else(|| updated_path(input), Path::to_path_buf);
    write_csv(&output, &normalized)?;

    println!(
        "normalized {} rows into {}",
        normalized.rows.len(),
        output.display()
    );
    Ok(())
}

fn updated_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "batch".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_updated.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn updated_path_sits_beside_input() {
        assert_eq!(
            updated_path(Path::new("out/a101/a101_products_20240309_140507.csv")),
            Path::new("out/a101/a101_products_20240309_140507_updated.csv")
        );
    }

    #[test]
    fn normalizes_file_with_custom_keywords() {
        let dir = std::env::temp_dir().join(format!("pazar-normalize-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("migros_products.csv");
        std::fs::write(
            &input,
            "Ürün Adı,Açıklama\nAyran 4x200 ml,Menşei: Türkiye İçindekiler: Yoğurt\n",
        )
        .unwrap();

        run_normalize(
            &input,
            None,
            &["İçindekiler".to_string(), "Menşei".to_string()],
        )
        .unwrap();

        let table = read_csv(&dir.join("migros_products_updated.csv")).unwrap();
        assert_eq!(
            table.headers,
            ["Ürün Adı", "Adet", "Birim", "Miktar", "İçindekiler", "Menşei"]
        );
        assert_eq!(
            table.rows[0],
            ["Ayran 4x200 ml", "4", "ml", "200", "Yoğurt", "Türkiye"]
        );
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn missing_input_is_an_error() {
        assert!(run_normalize(Path::new("/nonexistent/batch.csv"), None, &[]).is_err());
    }
}
