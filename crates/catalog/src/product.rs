use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use storefront_core::{ProductId, Slug};

/// Flat variant attributes of a child product (`{"Color": "Red", "Size": "L"}`).
///
/// Insertion order is significant: it drives group order and the order in
/// which selected options are scanned for per-group links.
pub type VariantAttributes = IndexMap<String, String>;

fn default_true() -> bool {
    true
}

/// Catalog product record, as read from the store.
///
/// A product is either standalone, a family parent (no `variant_attributes`,
/// never rendered directly) or a family child (`parent_id` set).
///
/// `images`, `bullet_points` and the `variant*` columns hold JSON text, the
/// way they are persisted; use the accessor methods to read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: Slug,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub upc: Option<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    /// Price in smallest currency unit (cents).
    #[serde(default)]
    pub price: u64,
    #[serde(default)]
    pub original_price: Option<u64>,
    #[serde(default)]
    pub amazon_url: String,
    #[serde(default)]
    pub main_image: String,
    #[serde(default)]
    pub images: Option<String>,
    #[serde(default)]
    pub bullet_points: Option<String>,
    #[serde(default)]
    pub parent_id: Option<ProductId>,
    #[serde(default)]
    pub variant_attributes: Option<VariantAttributes>,
    #[serde(default = "default_true")]
    pub active: bool,
    #[serde(default = "default_true")]
    pub show_buy_on_amazon: bool,
    #[serde(default = "default_true")]
    pub show_add_to_cart: bool,
    /// Legacy per-product variant groups (`[{"name", "options"}]`).
    #[serde(default)]
    pub variants: Option<String>,
    /// Legacy per-group affiliate links (`{group: {option: url}}`).
    #[serde(default)]
    pub variant_option_links: Option<String>,
    /// Legacy explicit image indexes (`{group: {option: index}}`).
    #[serde(default)]
    pub variant_image_map: Option<String>,
    /// Legacy option thumbnails (`{group: {option: url}}`).
    #[serde(default)]
    pub variant_option_images: Option<String>,
}

impl Product {
    /// Minimal active product; every optional column empty.
    pub fn new(id: ProductId, slug: Slug, title: impl Into<String>, amazon_url: impl Into<String>) -> Self {
        Self {
            id,
            slug,
            title: title.into(),
            description: String::new(),
            category_name: None,
            brand: None,
            upc: None,
            published_at: None,
            price: 0,
            original_price: None,
            amazon_url: amazon_url.into(),
            main_image: String::new(),
            images: None,
            bullet_points: None,
            parent_id: None,
            variant_attributes: None,
            active: true,
            show_buy_on_amazon: true,
            show_add_to_cart: true,
            variants: None,
            variant_option_links: None,
            variant_image_map: None,
            variant_option_images: None,
        }
    }

    /// Attach this product to a family as a child with the given attributes.
    pub fn as_child_of<K, V>(mut self, parent: ProductId, attributes: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.parent_id = Some(parent);
        self.variant_attributes = Some(
            attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn is_variant_child(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Gallery images; falls back to `[main_image]` when the column is missing
    /// or is not a JSON array of strings.
    pub fn image_list(&self) -> Vec<String> {
        parse_json_or(
            "images",
            self.images.as_deref(),
            vec![self.main_image.clone()],
        )
    }

    pub fn bullet_list(&self) -> Vec<String> {
        parse_json_or("bullet_points", self.bullet_points.as_deref(), Vec::new())
    }

    /// The resolver's view of this product as a family member.
    pub fn as_sibling(&self) -> Sibling {
        Sibling {
            id: self.id,
            slug: self.slug.clone(),
            variant_attributes: self.variant_attributes.clone(),
            amazon_url: self.amazon_url.clone(),
        }
    }
}

/// One member of a variant family, as handed to the variant resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sibling {
    pub id: ProductId,
    pub slug: Slug,
    #[serde(default)]
    pub variant_attributes: Option<VariantAttributes>,
    #[serde(default)]
    pub amazon_url: String,
}

impl From<&Product> for Sibling {
    fn from(product: &Product) -> Self {
        product.as_sibling()
    }
}

/// Parse a JSON text column, returning `fallback` when it is absent or malformed.
pub(crate) fn parse_json_or<T: DeserializeOwned>(column: &str, text: Option<&str>, fallback: T) -> T {
    let Some(text) = text.filter(|t| !t.trim().is_empty()) else {
        return fallback;
    };
    match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(column, error = %e, "malformed JSON column; using fallback");
            fallback
        }
    }
}
