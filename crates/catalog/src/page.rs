//! Product detail page resolution.
//!
//! Loads a product by slug, expands its variant family and produces the view
//! the page renders (or the redirect a family parent turns into).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use storefront_core::{ProductId, Slug};

use crate::config::StorefrontConfig;
use crate::error::CatalogError;
use crate::image::{safe_image_pool, ImageIndexMap, OptionImageMap};
use crate::product::{parse_json_or, Product, Sibling};
use crate::store::CatalogStore;
use crate::variant::{
    build_tables, derive_groups, CombinationKey, KeyCollision, LinkTable, Selection, VariantGroup,
};

const UNCATEGORIZED: &str = "Uncategorized";

/// Group name under which the legacy `variant_option_links` column stores
/// full-combination links.
const LEGACY_COMBINATION_GROUP: &str = "__combo__";

/// Result of resolving a product page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProductPage {
    NotFound,
    /// Family parents are never shown; go to a child instead.
    Redirect { slug: Slug, path: String },
    Detail(Box<ProductDetailView>),
}

/// Everything the product detail page renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDetailView {
    pub id: ProductId,
    pub slug: Slug,
    /// This page's own path, used to suppress self-navigation.
    pub path: String,
    pub title: String,
    pub category_name: String,
    pub brand: Option<String>,
    pub upc: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub description: String,
    /// Fallback purchase link.
    pub amazon_url: String,
    pub price: u64,
    pub original_price: Option<u64>,
    pub images: Vec<String>,
    pub main_image: String,
    pub bullets: Vec<String>,
    pub variant_groups: Vec<VariantGroup>,
    pub image_map: Option<ImageIndexMap>,
    pub option_images: Option<OptionImageMap>,
    pub option_links: LinkTable,
    /// Sibling page per combination; only present for variant families.
    pub paths: Option<LinkTable>,
    pub collisions: Vec<KeyCollision>,
    pub initial_selection: Selection,
    pub show_buy_on_amazon: bool,
    pub show_add_to_cart: bool,
}

impl ProductDetailView {
    /// Gallery images actually displayed.
    pub fn image_pool(&self) -> Vec<String> {
        safe_image_pool(&self.images, &self.main_image)
    }

    pub fn has_options(&self) -> bool {
        !self.variant_groups.is_empty()
    }
}

/// Resolve the page for `slug`.
///
/// A failed product lookup renders as not found; a failed family lookup is an
/// error.
pub fn resolve_page<S>(store: &S, slug: &str, config: &StorefrontConfig) -> Result<ProductPage, CatalogError>
where
    S: CatalogStore + ?Sized,
{
    if slug.is_empty() {
        return Ok(ProductPage::NotFound);
    }

    let product = match store.find_by_slug(slug) {
        Ok(Some(product)) => product,
        Ok(None) => return Ok(ProductPage::NotFound),
        Err(e) => {
            tracing::error!(%slug, error = %e, "failed to load product");
            return Ok(ProductPage::NotFound);
        }
    };

    let mut initial_selection = Selection::new();
    let siblings: Vec<Product> = match product.parent_id {
        Some(parent_id) => {
            if let Some(attrs) = &product.variant_attributes {
                initial_selection = attrs.clone();
            }
            store.active_children(parent_id)?
        }
        None => {
            let children = store.active_children(product.id)?;
            if let Some(first) = children.first() {
                tracing::debug!(parent = %product.slug, child = %first.slug, "redirecting family parent");
                return Ok(ProductPage::Redirect {
                    slug: first.slug.clone(),
                    path: config.product_path(&first.slug),
                });
            }
            children
        }
    };

    let family: Vec<Sibling> = siblings.iter().map(Sibling::from).collect();

    // Any attribute name in the family, even one with only empty values,
    // replaces the product's own variant columns.
    let keyed_family = family
        .iter()
        .any(|s| s.variant_attributes.as_ref().is_some_and(|a| !a.is_empty()));

    let variants = if keyed_family {
        let groups = derive_groups(&family);
        let tables = build_tables(&family, &groups, config);
        VariantData {
            groups,
            option_links: tables.affiliate_links,
            paths: Some(tables.paths),
            collisions: tables.collisions,
            image_map: None,
            option_images: None,
        }
    } else {
        VariantData::legacy(&product)
    };

    Ok(ProductPage::Detail(Box::new(ProductDetailView {
        id: product.id,
        path: config.product_path(&product.slug),
        images: product.image_list(),
        bullets: product.bullet_list(),
        slug: product.slug,
        title: product.title,
        category_name: product
            .category_name
            .unwrap_or_else(|| UNCATEGORIZED.to_string()),
        brand: product.brand,
        upc: product.upc,
        published_at: product.published_at,
        description: product.description,
        amazon_url: product.amazon_url,
        price: product.price,
        original_price: product.original_price,
        main_image: product.main_image,
        variant_groups: variants.groups,
        image_map: variants.image_map,
        option_images: variants.option_images,
        option_links: variants.option_links,
        paths: variants.paths,
        collisions: variants.collisions,
        initial_selection,
        show_buy_on_amazon: product.show_buy_on_amazon,
        show_add_to_cart: product.show_add_to_cart,
    })))
}

struct VariantData {
    groups: Vec<VariantGroup>,
    option_links: LinkTable,
    paths: Option<LinkTable>,
    collisions: Vec<KeyCollision>,
    image_map: Option<ImageIndexMap>,
    option_images: Option<OptionImageMap>,
}

impl VariantData {
    /// Variant data stored on the product itself (no family).
    fn legacy(product: &Product) -> Self {
        let groups: Vec<VariantGroup> =
            parse_json_or("variants", product.variants.as_deref(), Vec::new());
        let mut per_group = nested_map(
            "variant_option_links",
            product.variant_option_links.as_deref(),
            |v| v.as_str().map(str::to_string),
        )
        .unwrap_or_default();
        let combinations = per_group
            .shift_remove(LEGACY_COMBINATION_GROUP)
            .unwrap_or_default()
            .into_iter()
            .map(|(key, url)| (CombinationKey::from_stored(key), url))
            .collect();
        let image_map = nested_map(
            "variant_image_map",
            product.variant_image_map.as_deref(),
            |v| v.as_u64().and_then(|i| usize::try_from(i).ok()),
        );
        let option_images = nested_map(
            "variant_option_images",
            product.variant_option_images.as_deref(),
            |v| v.as_str().map(str::to_string),
        );

        Self {
            groups,
            option_links: LinkTable {
                per_group,
                combinations,
            },
            paths: None,
            collisions: Vec::new(),
            image_map,
            option_images,
        }
    }
}

/// Parse a `{group: {option: value}}` column, keeping only entries `convert` accepts.
fn nested_map<T>(
    column: &str,
    text: Option<&str>,
    convert: impl Fn(&JsonValue) -> Option<T>,
) -> Option<IndexMap<String, IndexMap<String, T>>> {
    let raw: Option<IndexMap<String, IndexMap<String, JsonValue>>> = parse_json_or(column, text, None);
    raw.map(|groups| {
        groups
            .into_iter()
            .map(|(group, options)| {
                let options = options
                    .into_iter()
                    .filter_map(|(option, value)| Some((option, convert(&value)?)))
                    .collect();
                (group, options)
            })
            .collect()
    })
}
