//! The category tree: nested category names with per-marketplace listing URLs.
//!
//! YAML mapping order is significant. It is the stored child order that the
//! traversal follows, so nodes are deserialized into `Vec`s rather than maps.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::{ConfigError, CATEGORY_SEPARATOR};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryNode {
    pub name: String,
    /// marketplace id → listing URL
    pub urls: BTreeMap<String, String>,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Listing URL for `marketplace`, matching the id case-insensitively.
    #[must_use]
    pub fn url_for(&self, marketplace: &str) -> Option<&str> {
        self.urls.get(marketplace).map(String::as_str).or_else(|| {
            self.urls
                .iter()
                .find(|(id, _)| id.to_lowercase() == marketplace.to_lowercase())
                .map(|(_, url)| url.as_str())
        })
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&CategoryNode> {
        find_by_name(&self.children, name)
    }
}

/// Exact match first, then case-insensitive.
fn find_by_name<'a>(nodes: &'a [CategoryNode], name: &str) -> Option<&'a CategoryNode> {
    let name = name.trim();
    nodes.iter().find(|n| n.name == name).or_else(|| {
        let lowered = name.to_lowercase();
        nodes.iter().find(|n| n.name.to_lowercase() == lowered)
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTree {
    pub roots: Vec<CategoryNode>,
}

/// A node located in the tree together with its category path.
#[derive(Debug, Clone)]
pub struct ResolvedCategory<'a> {
    pub node: &'a CategoryNode,
    /// Ancestor chain from the root category down to and including `node`.
    pub path: Vec<String>,
}

impl CategoryTree {
    /// Resolves `category` and then each name of `subpath` beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCategory`] or
    /// [`ConfigError::UnknownSubcategory`] naming the first segment that was
    /// not found.
    pub fn resolve<S: AsRef<str>>(
        &self,
        category: &str,
        subpath: &[S],
    ) -> Result<ResolvedCategory<'_>, ConfigError> {
        let mut node = find_by_name(&self.roots, category)
            .ok_or_else(|| ConfigError::UnknownCategory(category.to_string()))?;
        let mut path = vec![node.name.clone()];

        for segment in subpath {
            let segment = segment.as_ref();
            node = node
                .child(segment)
                .ok_or_else(|| ConfigError::UnknownSubcategory {
                    parent: path.join(CATEGORY_SEPARATOR),
                    name: segment.to_string(),
                })?;
            path.push(node.name.clone());
        }

        Ok(ResolvedCategory { node, path })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeBody {
    #[serde(default)]
    urls: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "ordered_nodes")]
    subcategories: Vec<CategoryNode>,
}

struct NodesVisitor;

impl<'de> Visitor<'de> for NodesVisitor {
    type Value = Vec<CategoryNode>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of category name to {urls, subcategories}")
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Vec::new())
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut nodes = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((name, body)) = map.next_entry::<String, Option<NodeBody>>()? {
            let body = body.unwrap_or(NodeBody {
                urls: BTreeMap::new(),
                subcategories: Vec::new(),
            });
            nodes.push(CategoryNode {
                name,
                urls: body.urls,
                children: body.subcategories,
            });
        }
        Ok(nodes)
    }
}

fn ordered_nodes<'de, D>(deserializer: D) -> Result<Vec<CategoryNode>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(NodesVisitor)
}

impl<'de> Deserialize<'de> for CategoryTree {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ordered_nodes(deserializer).map(|roots| CategoryTree { roots })
    }
}

/// Load the category tree from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if it
/// declares no categories.
pub fn load_categories(path: &Path) -> Result<CategoryTree, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let tree: CategoryTree =
        serde_yaml::from_str(&content).map_err(|e| ConfigError::FileParse {
            path: path.display().to_string(),
            source: e,
        })?;

    if tree.is_empty() {
        return Err(ConfigError::Validation(format!(
            "category tree in {} is empty",
            path.display()
        )));
    }

    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TREE: &str = r"
Süt Ürünleri:
  urls:
    a101: https://www.a101.com.tr/kapida/sut-urunleri-kahvaltilik/
  subcategories:
    Yoğurt:
      urls:
        a101: https://www.a101.com.tr/kapida/yogurt/
        migros: https://www.migros.com.tr/yogurt-c-6c
    Peynir:
      subcategories:
        Beyaz Peynir:
          urls:
            sok: https://www.sokmarket.com.tr/beyaz-peynir-c-1
    Ayran:
İçecek:
  urls:
    migros: https://www.migros.com.tr/icecek-c-6
";

    fn tree() -> CategoryTree {
        serde_yaml::from_str(TREE).expect("tree yaml should parse")
    }

    #[test]
    fn preserves_document_order() {
        let tree = tree();
        let roots: Vec<_> = tree.roots.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(roots, ["Süt Ürünleri", "İçecek"]);
        let children: Vec<_> = tree.roots[0]
            .children
            .iter()
            .map(|n| n.name.as_str())
            .collect();
        assert_eq!(children, ["Yoğurt", "Peynir", "Ayran"]);
    }

    #[test]
    fn empty_node_body_yields_leaf_without_urls() {
        let tree = tree();
        let ayran = tree.roots[0].child("Ayran").unwrap();
        assert!(ayran.urls.is_empty());
        assert!(ayran.children.is_empty());
    }

    #[test]
    fn resolve_builds_category_path() {
        let tree = tree();
        let resolved = tree.resolve("Süt Ürünleri", &["Peynir", "Beyaz Peynir"]).unwrap();
        assert_eq!(resolved.path, ["Süt Ürünleri", "Peynir", "Beyaz Peynir"]);
        assert_eq!(
            resolved.node.url_for("sok"),
            Some("https://www.sokmarket.com.tr/beyaz-peynir-c-1")
        );
    }

    #[test]
    fn resolve_falls_back_to_case_insensitive_match() {
        let tree = tree();
        let resolved = tree.resolve("süt ürünleri", &["yoğurt"]).unwrap();
        assert_eq!(resolved.path, ["Süt Ürünleri", "Yoğurt"]);
    }

    #[test]
    fn resolve_unknown_category() {
        let err = tree().resolve("Et", &[] as &[&str]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCategory(ref name) if name == "Et"));
    }

    #[test]
    fn resolve_unknown_subcategory_names_parent() {
        let err = tree().resolve("Süt Ürünleri", &["Kefir"]).unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownSubcategory { ref parent, ref name } if parent == "Süt Ürünleri" && name == "Kefir"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn unknown_nested_subcategory_names_full_parent_path() {
        let err = tree()
            .resolve("Süt Ürünleri", &["Peynir", "Kaşar"])
            .unwrap_err();
        assert!(
            matches!(err, ConfigError::UnknownSubcategory { ref parent, .. } if parent == "Süt Ürünleri > Peynir"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn url_for_matches_marketplace_case_insensitively() {
        let tree = tree();
        let node = &tree.roots[1];
        assert_eq!(node.url_for("Migros"), Some("https://www.migros.com.tr/icecek-c-6"));
        assert_eq!(node.url_for("a101"), None);
    }

    #[test]
    fn unknown_node_key_is_rejected() {
        let result: Result<CategoryTree, _> = serde_yaml::from_str("Süt:\n  link: x\n");
        assert!(result.is_err());
    }

    #[test]
    fn load_categories_from_real_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("config")
            .join("categories.yaml");
        let result = load_categories(&path);
        assert!(result.is_ok(), "failed to load categories.yaml: {result:?}");
        assert!(!result.unwrap().roots.is_empty());
    }
}
