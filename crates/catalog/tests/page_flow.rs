use storefront_catalog::seed::demo_family;
use storefront_catalog::{
    resolve_page, CatalogError, CatalogStore, InMemoryCatalog, LinkLookup, Navigation, Product,
    ProductDetailView, ProductPage, StorefrontConfig, VariantGroup, VariantSession,
};
use storefront_core::{ProductId, Slug};

fn detail(page: ProductPage) -> ProductDetailView {
    match page {
        ProductPage::Detail(view) => *view,
        other => panic!("Expected detail page, got {other:?}"),
    }
}

fn child(parent: ProductId, slug: &str, attrs: &[(&str, &str)], url: &str) -> Product {
    Product::new(ProductId::new(), Slug::parse(slug).unwrap(), slug, url)
        .as_child_of(parent, attrs.iter().copied())
}

/// Store whose reads always fail.
struct BrokenStore;

impl CatalogStore for BrokenStore {
    fn find_by_slug(&self, _slug: &str) -> Result<Option<Product>, CatalogError> {
        Err(CatalogError::store("connection refused"))
    }

    fn active_children(&self, _parent: ProductId) -> Result<Vec<Product>, CatalogError> {
        Err(CatalogError::store("connection refused"))
    }
}

/// Finds products but cannot list families.
struct NoFamilies(InMemoryCatalog);

impl CatalogStore for NoFamilies {
    fn find_by_slug(&self, slug: &str) -> Result<Option<Product>, CatalogError> {
        self.0.find_by_slug(slug)
    }

    fn active_children(&self, _parent: ProductId) -> Result<Vec<Product>, CatalogError> {
        Err(CatalogError::store("timeout"))
    }
}

#[test]
fn demo_family_page_exposes_groups_tables_and_selection() {
    let family = demo_family(None).unwrap();
    let catalog = InMemoryCatalog::from_products(family.into_products()).unwrap();
    let config = StorefrontConfig::default();

    let view = detail(resolve_page(&catalog, "classic-cotton-t-shirt-blue", &config).unwrap());

    assert_eq!(
        view.variant_groups,
        vec![
            VariantGroup::new("Color", ["Red", "Blue"]),
            VariantGroup::new("Size", ["L"]),
        ]
    );
    assert_eq!(view.initial_selection.get("Color").map(String::as_str), Some("Blue"));
    assert_eq!(view.category_name, "Clothing");
    assert_eq!(view.bullets, vec!["100% Cotton", "Deep Blue Color"]);

    let paths = view.paths.as_ref().unwrap();
    let keys: Vec<_> = paths.combinations.keys().map(|k| k.as_str()).collect();
    assert_eq!(keys, vec!["Color=Red|Size=L", "Color=Blue|Size=L"]);
    assert!(view.image_map.is_none());
    assert!(view.option_images.is_none());
}

#[test]
fn parent_page_redirects_to_first_active_child() {
    let parent = Product::new(ProductId::new(), Slug::parse("tee").unwrap(), "Tee", "#");
    let mut retired = child(parent.id, "tee-green", &[("Color", "Green")], "g");
    retired.active = false;
    let catalog = InMemoryCatalog::from_products([
        parent.clone(),
        retired,
        child(parent.id, "tee-red", &[("Color", "Red")], "r"),
        child(parent.id, "tee-blue", &[("Color", "Blue")], "b"),
    ])
    .unwrap();

    let page = resolve_page(&catalog, "tee", &StorefrontConfig::default()).unwrap();
    assert_eq!(
        page,
        ProductPage::Redirect {
            slug: Slug::parse("tee-red").unwrap(),
            path: "/products/tee-red".to_string(),
        }
    );
}

#[test]
fn inactive_siblings_are_not_offered() {
    let parent = ProductId::new();
    let mut retired = child(parent, "tee-green", &[("Color", "Green")], "g");
    retired.active = false;
    let catalog = InMemoryCatalog::from_products([
        child(parent, "tee-red", &[("Color", "Red")], "r"),
        retired,
    ])
    .unwrap();

    let view = detail(resolve_page(&catalog, "tee-red", &StorefrontConfig::default()).unwrap());
    assert_eq!(view.variant_groups, vec![VariantGroup::new("Color", ["Red"])]);
}

#[test]
fn family_without_attributes_renders_as_standalone() {
    let parent = ProductId::new();
    let mut a = Product::new(ProductId::new(), Slug::parse("a").unwrap(), "A", "https://amazon.com/dp/A");
    a.parent_id = Some(parent);
    let mut b = Product::new(ProductId::new(), Slug::parse("b").unwrap(), "B", "https://amazon.com/dp/B");
    b.parent_id = Some(parent);
    let catalog = InMemoryCatalog::from_products([a, b]).unwrap();

    let view = detail(resolve_page(&catalog, "a", &StorefrontConfig::default()).unwrap());
    assert!(!view.has_options());
    assert!(view.initial_selection.is_empty());
    assert!(view.paths.is_none());

    let session = VariantSession::new(&view);
    assert_eq!(session.purchase_link(&view).url, "https://amazon.com/dp/A");
}

#[test]
fn duplicate_combinations_are_surfaced_on_the_view() {
    let parent = ProductId::new();
    let catalog = InMemoryCatalog::from_products([
        child(parent, "tee-red", &[("Color", "Red")], "first"),
        child(parent, "tee-red-again", &[("Color", "Red")], "second"),
    ])
    .unwrap();

    let view = detail(resolve_page(&catalog, "tee-red-again", &StorefrontConfig::default()).unwrap());
    assert_eq!(view.collisions.len(), 1);

    let session = VariantSession::new(&view);
    let link = session.purchase_link(&view);
    assert_eq!(link.url, "first");
    assert!(matches!(link.matched, Some(LinkLookup::Combination { .. })));
}

#[test]
fn three_group_family_navigates_only_on_complete_match() {
    let parent = ProductId::new();
    let catalog = InMemoryCatalog::from_products([
        child(parent, "red-l-cotton", &[("Color", "Red"), ("Size", "L"), ("Material", "Cotton")], "u1"),
        child(parent, "blue-l-cotton", &[("Color", "Blue"), ("Size", "L"), ("Material", "Cotton")], "u2"),
        child(parent, "blue-xl-wool", &[("Color", "Blue"), ("Size", "XL"), ("Material", "Wool")], "u3"),
    ])
    .unwrap();
    let view = detail(resolve_page(&catalog, "red-l-cotton", &StorefrontConfig::default()).unwrap());
    let mut session = VariantSession::new(&view);

    assert_eq!(session.select(&view, "Size", "XL"), Navigation::Stay);
    assert_eq!(session.select(&view, "Color", "Blue"), Navigation::Stay);
    assert_eq!(
        session.select(&view, "Material", "Wool"),
        Navigation::Navigate { path: "/products/blue-xl-wool".to_string() }
    );
}

#[test]
fn product_lookup_failure_renders_not_found() {
    let page = resolve_page(&BrokenStore, "anything", &StorefrontConfig::default()).unwrap();
    assert_eq!(page, ProductPage::NotFound);
}

#[test]
fn family_lookup_failure_is_an_error() {
    let catalog = InMemoryCatalog::from_products([Product::new(
        ProductId::new(),
        Slug::parse("mug").unwrap(),
        "Mug",
        "",
    )])
    .unwrap();
    let err = resolve_page(&NoFamilies(catalog), "mug", &StorefrontConfig::default()).unwrap_err();
    assert!(matches!(err, CatalogError::Store(_)));
}
