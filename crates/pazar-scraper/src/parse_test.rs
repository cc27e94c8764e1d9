use super::*;

const KEYWORDS: [&str; 5] = [
    "Saklama Koşulları",
    "İçindekiler",
    "Besin Değerleri",
    "Alerjen Uyarısı",
    "Kullanım Önerisi",
];

// -----------------------------------------------------------------------
// parse_quantity
// -----------------------------------------------------------------------

#[test]
fn quantity_defaults_to_one() {
    assert_eq!(parse_quantity("Süt 1 L"), 1);
    assert_eq!(parse_quantity(""), 1);
}

#[test]
fn quantity_ignores_litre_volume() {
    assert_eq!(parse_quantity("Yudum Ayçiçek Yağı 5 Litre"), 1);
    assert_eq!(parse_quantity("Komili Zeytinyağı 2 lira indirimli 1 LİTRE"), 1);
    assert_eq!(parse_quantity("Erikli Su 6'lı 1,5 Litre"), 6);
}

#[test]
fn quantity_from_partitive_with_apostrophe() {
    assert_eq!(parse_quantity("Su 6'li 500ml"), 6);
    assert_eq!(parse_quantity("Erikli Su 12’li 330 ml"), 12);
}

#[test]
fn quantity_from_partitive_turkish_vowels() {
    assert_eq!(parse_quantity("Yumurta 30'LU"), 30);
    assert_eq!(parse_quantity("Peçete 3lü Paket"), 3);
    assert_eq!(parse_quantity("Ayran 4 lı"), 4);
}

#[test]
fn quantity_prefers_partitive_over_multiplier() {
    assert_eq!(parse_quantity("Kola 2x 6'lı 1 L"), 6);
}

#[test]
fn quantity_from_multiplier() {
    assert_eq!(parse_quantity("Ayran 4x200 ml"), 4);
    assert_eq!(parse_quantity("Maden Suyu 6 X 200 ml"), 6);
    assert_eq!(parse_quantity("Meyve Suyu 200 ml x 3"), 3);
}

#[test]
fn quantity_ignores_letter_x_inside_words() {
    assert_eq!(parse_quantity("Max Deterjan 3 kg"), 1);
}

// -----------------------------------------------------------------------
// parse_unit_amount
// -----------------------------------------------------------------------

#[test]
fn unit_amount_with_space() {
    assert_eq!(
        parse_unit_amount("Süt 1 L"),
        Some(("L".to_string(), "1".to_string()))
    );
}

#[test]
fn unit_amount_takes_last_token() {
    assert_eq!(
        parse_unit_amount("Su 6'li 500ml"),
        Some(("ml".to_string(), "500".to_string()))
    );
}

#[test]
fn unit_amount_normalizes_decimal_comma() {
    assert_eq!(
        parse_unit_amount("Toz Şeker 1,5 kg"),
        Some(("kg".to_string(), "1.5".to_string()))
    );
}

#[test]
fn unit_amount_none_without_numeric_token() {
    assert_eq!(parse_unit_amount("Taze Maydanoz"), None);
}

// -----------------------------------------------------------------------
// extract_sections
// -----------------------------------------------------------------------

#[test]
fn sections_split_on_next_keyword() {
    let text = "Saklama Koşulları: 0-5°C. İçindekiler: Süt.";
    assert_eq!(
        extract_sections(text, &["Saklama Koşulları", "İçindekiler"]),
        ["0-5°C.", "Süt."]
    );
}

#[test]
fn sections_absent_keyword_is_sentinel() {
    let text = "İçindekiler: Buğday unu, su, tuz.";
    let sections = extract_sections(text, &KEYWORDS);
    assert_eq!(sections[0], "-");
    assert_eq!(sections[1], "Buğday unu, su, tuz.");
    assert!(sections[2..].iter().all(|s| s == "-"));
}

#[test]
fn sections_colon_is_optional_and_order_in_text_is_free() {
    let text = "Kullanım Önerisi Soğuk tüketiniz\nİçindekiler pastörize inek sütü";
    let sections = extract_sections(text, &KEYWORDS);
    assert_eq!(sections[1], "pastörize inek sütü");
    assert_eq!(sections[4], "Soğuk tüketiniz");
}

#[test]
fn sections_first_occurrence_wins() {
    let text = "İçindekiler: şeker. İçindekiler: tuz.";
    assert_eq!(extract_sections(text, &["İçindekiler"]), ["şeker."]);
}

#[test]
fn sections_empty_keyword_list_yields_nothing() {
    assert!(extract_sections("İçindekiler: süt", &[] as &[&str]).is_empty());
}

// -----------------------------------------------------------------------
// extract_tab_sections
// -----------------------------------------------------------------------

fn tab(index: usize, label: &str, content: &str) -> DescriptionTab {
    DescriptionTab {
        index,
        label: label.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn tab_sections_match_labels_ignoring_case_and_space() {
    let tabs = vec![
        tab(0, "İÇİNDEKİLER", "Süt, maya"),
        tab(1, "alerjen uyarisi", "Süt içerir."),
        tab(2, "Ürün Özellikleri", "Yerli üretim"),
    ];
    let sections = extract_tab_sections(&tabs, &KEYWORDS);
    assert_eq!(sections, ["-", "Süt, maya", "-", "Süt içerir.", "-"]);
}

#[test]
fn tab_content_is_copied_verbatim() {
    let tabs = vec![tab(0, "Besin Değerleri", "Enerji: 64 kcal\nYağ: 3,6 g")];
    let sections = extract_tab_sections(&tabs, &["BesinDeğerleri"]);
    assert_eq!(sections, ["Enerji: 64 kcal\nYağ: 3,6 g"]);
}
