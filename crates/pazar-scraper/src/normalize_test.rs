use pazar_core::DescriptionTab;

use super::*;

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| (*c).to_string()).collect()
}

fn batch() -> Table {
    Table {
        headers: strings(&["Market", "Ürün Adı", "Fiyat", "Açıklama", "Kaynak"]),
        rows: vec![
            strings(&[
                "a101",
                "Su 6'li 500ml",
                "42,00",
                "Saklama Koşulları: Serin yerde. İçindekiler: Doğal kaynak suyu.",
                "https://a101/su",
            ]),
            strings(&["a101", "Süt 1 L", "49,90", "-", "https://a101/sut"]),
        ],
    }
}

#[test]
fn inserts_derived_columns_after_name_and_replaces_description() {
    let out = normalize_table(&batch(), &DEFAULT_KEYWORDS).unwrap();

    assert_eq!(
        out.headers,
        [
            "Market",
            "Ürün Adı",
            "Adet",
            "Birim",
            "Miktar",
            "Fiyat",
            "Kaynak",
            "Saklama Koşulları",
            "İçindekiler",
            "Besin Değerleri",
            "Alerjen Uyarısı",
            "Kullanım Önerisi",
        ]
    );
    assert_eq!(
        out.rows[0],
        [
            "a101",
            "Su 6'li 500ml",
            "6",
            "ml",
            "500",
            "42,00",
            "https://a101/su",
            "Serin yerde.",
            "Doğal kaynak suyu.",
            "-",
            "-",
            "-",
        ]
    );
}

#[test]
fn sentinel_description_yields_sentinel_sections() {
    let out = normalize_table(&batch(), &DEFAULT_KEYWORDS).unwrap();
    let row = &out.rows[1];
    assert_eq!(&row[2..5], ["1", "L", "1"]);
    assert!(row[7..].iter().all(|c| c == "-"));
}

#[test]
fn tab_payload_sections_are_matched_by_label() {
    let tabs = vec![
        DescriptionTab {
            index: 0,
            label: "İÇİNDEKİLER".to_string(),
            content: "Süt, maya".to_string(),
        },
        DescriptionTab {
            index: 1,
            label: "Saklama Koşulları".to_string(),
            content: "+4°C".to_string(),
        },
    ];
    let payload = Description::Tabs(tabs).payload();
    let table = Table {
        headers: strings(&["Ürün Adı", "Açıklama"]),
        rows: vec![vec!["Yoğurt 3x200 g".to_string(), payload]],
    };

    let out = normalize_table(&table, &["Saklama Koşulları", "İçindekiler"]).unwrap();

    assert_eq!(out.headers, ["Ürün Adı", "Adet", "Birim", "Miktar", "Saklama Koşulları", "İçindekiler"]);
    assert_eq!(out.rows[0], ["Yoğurt 3x200 g", "3", "g", "200", "+4°C", "Süt, maya"]);
}

#[test]
fn missing_description_column_skips_sections() {
    let table = Table {
        headers: strings(&["Ürün Adı", "Fiyat"]),
        rows: vec![strings(&["Ayran 4x200 ml", "30,00"])],
    };

    let out = normalize_table(&table, &DEFAULT_KEYWORDS).unwrap();

    assert_eq!(out.headers, ["Ürün Adı", "Adet", "Birim", "Miktar", "Fiyat"]);
    assert_eq!(out.rows[0], ["Ayran 4x200 ml", "4", "ml", "200", "30,00"]);
}

#[test]
fn name_without_unit_leaves_unit_cells_empty() {
    let table = Table {
        headers: strings(&["Ürün Adı"]),
        rows: vec![strings(&["Taze Maydanoz"])],
    };

    let out = normalize_table(&table, &DEFAULT_KEYWORDS).unwrap();

    assert_eq!(out.rows[0], ["Taze Maydanoz", "1", "", ""]);
}

#[test]
fn duplicate_rows_are_removed() {
    let mut table = batch();
    table.rows.push(table.rows[0].clone());

    let out = normalize_table(&table, &DEFAULT_KEYWORDS).unwrap();

    assert_eq!(out.rows.len(), 2);
}

#[test]
fn missing_name_column_is_an_error() {
    let table = Table {
        headers: strings(&["Market"]),
        rows: Vec::new(),
    };
    let err = normalize_table(&table, &DEFAULT_KEYWORDS).unwrap_err();
    assert!(matches!(err, NormalizeError::MissingColumn(ref c) if c == "Ürün Adı"));
}
