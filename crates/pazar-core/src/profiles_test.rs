use super::*;

const MINIMAL_PROFILE: &str = r#"
profiles:
  - name: a101
    aliases: ["A101"]
    output_sink: a101_products
    grid:
      class: "gap-2 grid grid-cols-3"
    selectors:
      image: { xpath: "//img[@alt]" }
      product_name: { xpath: "//h1" }
      current_price: { css: "div.price" }
      current_price_fallback: { css: "div.price-alt" }
"#;

fn parse(yaml: &str) -> ProfileSet {
    serde_yaml::from_str(yaml).expect("profile yaml should parse")
}

#[test]
fn class_locator_compiles_to_compound_css() {
    let locator = Locator::Class("gap-2 grid grid-cols-3".to_string());
    assert_eq!(
        locator.strategy(),
        ("css selector", ".gap-2.grid.grid-cols-3".to_string())
    );
}

#[test]
fn class_locator_accepts_dot_separated_names() {
    let locator = Locator::Class("gap-2.grid.justify-items-center".to_string());
    assert_eq!(locator.strategy().1, ".gap-2.grid.justify-items-center");
}

#[test]
fn class_locator_escapes_tailwind_punctuation() {
    let locator = Locator::Class("tablet:!grid-cols-5".to_string());
    assert_eq!(locator.strategy().1, r".tablet\:\!grid-cols-5");
}

#[test]
fn xpath_locator_passes_through() {
    let locator = Locator::Xpath("//img[@alt]".to_string());
    assert_eq!(locator.strategy(), ("xpath", "//img[@alt]".to_string()));
}

#[test]
fn locator_display_is_prefixed_by_kind() {
    assert_eq!(Locator::Css("a.b".to_string()).to_string(), "css:a.b");
    assert_eq!(Locator::Xpath("//a".to_string()).to_string(), "xpath://a");
}

#[test]
fn minimal_profile_defaults_optional_capabilities() {
    let set = parse(MINIMAL_PROFILE);
    let profile = &set.profiles[0];
    assert!(profile.link_filter.is_none());
    assert!(profile.suppress_fields.is_empty());
    assert_eq!(profile.page_param, "page");
    assert!(profile.selectors.old_price.is_none());
    assert!(profile.selectors.description_tabs.is_none());
}

#[test]
fn link_locator_without_filter_takes_every_anchor() {
    let set = parse(MINIMAL_PROFILE);
    assert_eq!(
        set.profiles[0].link_locator(),
        Locator::Xpath(".//a[@href]".to_string())
    );
}

#[test]
fn link_locator_with_filter_requires_marker_attribute() {
    let mut profile = parse(MINIMAL_PROFILE).profiles.remove(0);
    profile.link_filter = Some(LinkFilter {
        attribute: "id".to_string(),
        value: "product-name".to_string(),
    });
    assert_eq!(
        profile.link_locator(),
        Locator::Xpath(".//a[@href][@id='product-name']".to_string())
    );
}

#[test]
fn suppress_fields_parse_from_snake_case() {
    let yaml = MINIMAL_PROFILE.replace(
        "    output_sink: a101_products\n",
        "    output_sink: a101_products\n    suppress_fields: [product_code]\n",
    );
    let set = parse(&yaml);
    assert!(set.profiles[0].is_suppressed(Field::ProductCode));
    assert!(!set.profiles[0].is_suppressed(Field::Brand));
}

#[test]
fn missing_mandatory_selector_fails_to_parse() {
    let yaml = MINIMAL_PROFILE.replace("      image: { xpath: \"//img[@alt]\" }\n", "");
    let result: Result<ProfileSet, _> = serde_yaml::from_str(&yaml);
    let err = result.expect_err("profile without image selector must be rejected");
    assert!(err.to_string().contains("image"), "unexpected error: {err}");
}

#[test]
fn unknown_selector_key_fails_to_parse() {
    let yaml = MINIMAL_PROFILE.replace(
        "      product_name: { xpath: \"//h1\" }\n",
        "      product_name: { xpath: \"//h1\" }\n      produt_code: { css: \"p\" }\n",
    );
    let result: Result<ProfileSet, _> = serde_yaml::from_str(&yaml);
    assert!(result.is_err());
}

#[test]
fn get_matches_name_and_alias_case_insensitively() {
    let set = parse(MINIMAL_PROFILE);
    assert_eq!(set.get("a101").unwrap().name, "a101");
    assert_eq!(set.get("A101").unwrap().name, "a101");
    assert_eq!(set.get(" a101 ").unwrap().name, "a101");
}

#[test]
fn get_unknown_marketplace_lists_known_ids() {
    let set = parse(MINIMAL_PROFILE);
    let err = set.get("carrefour").unwrap_err();
    assert!(
        matches!(err, ConfigError::UnknownMarketplace { ref name, ref known } if name == "carrefour" && known == "a101"),
        "unexpected error: {err:?}"
    );
}

#[test]
fn validate_rejects_duplicate_ids_across_aliases() {
    let mut set = parse(MINIMAL_PROFILE);
    let mut other = set.profiles[0].clone();
    other.name = "other".to_string();
    other.aliases = vec!["a101".to_string()];
    set.profiles.push(other);
    let err = validate_profiles(&set).unwrap_err();
    assert!(err.to_string().contains("duplicate marketplace id"));
}

#[test]
fn validate_rejects_output_sink_with_path_separator() {
    let mut set = parse(MINIMAL_PROFILE);
    set.profiles[0].output_sink = "../escape".to_string();
    let err = validate_profiles(&set).unwrap_err();
    assert!(err.to_string().contains("invalid output_sink"));
}

#[test]
fn validate_accepts_minimal_profile() {
    assert!(validate_profiles(&parse(MINIMAL_PROFILE)).is_ok());
}

#[test]
fn load_profiles_from_real_file() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("config")
        .join("profiles.yaml");
    let result = load_profiles(&path);
    assert!(result.is_ok(), "failed to load profiles.yaml: {result:?}");
    let set = result.unwrap();
    assert!(set.get("a101").is_ok());
    assert!(set.get("Migros").unwrap().is_suppressed(Field::ProductCode));
    let sok = set.get("Şok").unwrap();
    assert!(sok.link_filter.is_some());
    assert!(sok.selectors.description_tabs.is_some());
}

#[test]
fn load_profiles_missing_file_is_io_error() {
    let err = load_profiles(Path::new("/nonexistent/profiles.yaml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileIo { .. }));
}
