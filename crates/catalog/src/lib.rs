//! Storefront catalog: product records, variant families and the product page.
//!
//! Deterministic logic only; reading products goes through [`CatalogStore`].

pub mod config;
pub mod error;
pub mod image;
pub mod page;
pub mod product;
pub mod seed;
pub mod session;
pub mod store;
pub mod variant;

pub use config::StorefrontConfig;
pub use error::CatalogError;
pub use page::{resolve_page, ProductDetailView, ProductPage};
pub use product::{Product, Sibling, VariantAttributes};
pub use session::VariantSession;
pub use store::{CatalogStore, InMemoryCatalog};
pub use variant::{
    build_tables, combination_key, derive_groups, is_complete, match_sibling, resolve_navigation,
    resolve_purchase_link, CombinationKey, FamilyTables, KeyCollision, LinkLookup, LinkTable,
    Navigation, PurchaseLink, Selection, VariantGroup,
};
