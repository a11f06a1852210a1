use std::sync::{Arc, RwLock};

use storefront_core::ProductId;

use crate::error::CatalogError;
use crate::product::Product;

/// Read access to the product catalog.
///
/// The storefront only reads at page-render time; writes happen through the
/// admin surface, outside this crate.
pub trait CatalogStore: Send + Sync {
    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError>;

    /// Active children of `parent`, in listing order.
    fn active_children(&self, parent: ProductId) -> Result<Vec<Product>, CatalogError>;
}

impl<S> CatalogStore for Arc<S>
where
    S: CatalogStore + ?Sized,
{
    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        (**self).find_by_slug(slug)
    }

    fn active_children(&self, parent: ProductId) -> Result<Vec<Product>, CatalogError> {
        (**self).active_children(parent)
    }
}

/// In-memory catalog for tests, demos and the CLI. Listing order is insertion order.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    inner: RwLock<Vec<Product>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: impl IntoIterator<Item = Product>) -> Result<Self, CatalogError> {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product)?;
        }
        Ok(catalog)
    }

    /// Add a product; slugs are unique.
    pub fn insert(&self, product: Product) -> Result<(), CatalogError> {
        let mut products = self
            .inner
            .write()
            .map_err(|_| CatalogError::store("catalog lock poisoned"))?;
        if products.iter().any(|p| p.slug == product.slug) {
            return Err(CatalogError::DuplicateSlug(product.slug.to_string()));
        }
        products.push(product);
        Ok(())
    }

    pub fn list(&self) -> Result<Vec<Product>, CatalogError> {
        let products = self
            .inner
            .read()
            .map_err(|_| CatalogError::store("catalog lock poisoned"))?;
        Ok(products.clone())
    }
}

impl CatalogStore for InMemoryCatalog {
    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        let products = self
            .inner
            .read()
            .map_err(|_| CatalogError::store("catalog lock poisoned"))?;
        Ok(products.iter().find(|p| p.slug.as_str() == slug).cloned())
    }

    fn active_children(&self, parent: ProductId) -> Result<Vec<Product>, CatalogError> {
        let products = self
            .inner
            .read()
            .map_err(|_| CatalogError::store("catalog lock poisoned"))?;
        Ok(products
            .iter()
            .filter(|p| p.active && p.parent_id == Some(parent))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storefront_core::Slug;

    fn product(slug: &str) -> Product {
        Product::new(ProductId::new(), Slug::parse(slug).unwrap(), slug, "")
    }

    #[test]
    fn finds_by_slug() {
        let catalog = InMemoryCatalog::from_products([product("a"), product("b")]).unwrap();
        assert_eq!(catalog.find_by_slug("b").unwrap().unwrap().title, "b");
        assert!(catalog.find_by_slug("c").unwrap().is_none());
    }

    #[test]
    fn rejects_duplicate_slugs() {
        let catalog = InMemoryCatalog::new();
        catalog.insert(product("a")).unwrap();
        match catalog.insert(product("a")).unwrap_err() {
            CatalogError::DuplicateSlug(slug) => assert_eq!(slug, "a"),
            other => panic!("Expected DuplicateSlug, got {other:?}"),
        }
    }

    #[test]
    fn active_children_skip_inactive_and_keep_order() {
        let parent = product("parent");
        let mut hidden = product("hidden").as_child_of(parent.id, [("Color", "Green")]);
        hidden.active = false;
        let catalog = InMemoryCatalog::from_products([
            product("second").as_child_of(parent.id, [("Color", "Blue")]),
            hidden,
            product("unrelated"),
            product("third").as_child_of(parent.id, [("Color", "Red")]),
            parent.clone(),
        ])
        .unwrap();

        let slugs: Vec<_> = catalog
            .active_children(parent.id)
            .unwrap()
            .into_iter()
            .map(|p| p.slug.to_string())
            .collect();
        assert_eq!(slugs, vec!["second", "third"]);
    }

    #[test]
    fn works_through_arc() {
        let catalog = Arc::new(InMemoryCatalog::from_products([product("a")]).unwrap());
        assert!(catalog.find_by_slug("a").unwrap().is_some());
    }
}
