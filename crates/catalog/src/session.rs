use serde::{Deserialize, Serialize};

use crate::image::{primary_image, resolve_image_index, thumbnail_url, FailedThumbnails};
use crate::page::ProductDetailView;
use crate::variant::{resolve_navigation, resolve_purchase_link, Navigation, PurchaseLink, Selection};

/// Option-picker state of one product page view.
///
/// Created from the rendered view and dropped when the visitor navigates away.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantSession {
    selection: Selection,
    last_touched: Option<String>,
    selected_image: usize,
    failed_thumbnails: FailedThumbnails,
}

impl VariantSession {
    /// Seed the session from the page's initial selection.
    pub fn new(view: &ProductDetailView) -> Self {
        Self {
            selection: view.initial_selection.clone(),
            ..Self::default()
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn last_touched(&self) -> Option<&str> {
        self.last_touched.as_deref()
    }

    pub fn selected_image(&self) -> usize {
        self.selected_image
    }

    /// Handle a click on `option` of `group`.
    ///
    /// The selection is kept even when no sibling matches it.
    pub fn select(&mut self, view: &ProductDetailView, group: &str, option: &str) -> Navigation {
        self.selection.insert(group.to_string(), option.to_string());
        self.last_touched = Some(group.to_string());
        self.selected_image =
            resolve_image_index(group, option, view.image_map.as_ref(), &view.image_pool());

        let Some(paths) = view.paths.as_ref() else {
            return Navigation::Stay;
        };
        resolve_navigation(&view.variant_groups, paths, &self.selection, &view.path)
    }

    /// Show a gallery image directly (thumbnail strip click).
    pub fn show_image(&mut self, index: usize) {
        self.selected_image = index;
    }

    pub fn purchase_link(&self, view: &ProductDetailView) -> PurchaseLink {
        resolve_purchase_link(
            &view.variant_groups,
            &view.option_links,
            &self.selection,
            self.last_touched.as_deref(),
            &view.amazon_url,
        )
    }

    pub fn primary_image(&self, view: &ProductDetailView) -> String {
        primary_image(&view.image_pool(), self.selected_image, &view.main_image).to_string()
    }

    pub fn is_selected(&self, group: &str, option: &str) -> bool {
        self.selection.get(group).is_some_and(|selected| selected == option)
    }

    /// Thumbnail to render for an option, unless it already failed to load.
    pub fn thumbnail(&self, view: &ProductDetailView, group: &str, option: &str) -> Option<String> {
        if self.failed_thumbnails.contains(group, option) {
            return None;
        }
        thumbnail_url(group, option, view.option_images.as_ref())
    }

    pub fn mark_thumbnail_failed(&mut self, group: &str, option: &str) {
        self.failed_thumbnails.mark(group, option);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StorefrontConfig;
    use crate::image::{ImageIndexMap, OptionImageMap};
    use crate::page::{resolve_page, ProductPage};
    use crate::product::Product;
    use crate::store::InMemoryCatalog;
    use crate::variant::LinkLookup;
    use storefront_core::{ProductId, Slug};

    fn product(slug: &str, url: &str) -> Product {
        Product::new(ProductId::new(), Slug::parse(slug).unwrap(), slug, url)
    }

    fn view_of(catalog: &InMemoryCatalog, slug: &str) -> ProductDetailView {
        match resolve_page(catalog, slug, &StorefrontConfig::default()).unwrap() {
            ProductPage::Detail(view) => *view,
            other => panic!("Expected detail page, got {other:?}"),
        }
    }

    fn family() -> InMemoryCatalog {
        let parent = product("tee", "#");
        let mut red = product("tee-red", "https://amazon.com/dp/RED-L")
            .as_child_of(parent.id, [("Color", "Red"), ("Size", "L")]);
        red.images = Some(r#"["/img/red-front.jpg","/img/red-back.jpg"]"#.to_string());
        let blue = product("tee-blue", "https://amazon.com/dp/BLUE-L")
            .as_child_of(parent.id, [("Color", "Blue"), ("Size", "L")]);
        let red_xl = product("tee-red-xl", "https://amazon.com/dp/RED-XL")
            .as_child_of(parent.id, [("Color", "Red"), ("Size", "XL")]);
        InMemoryCatalog::from_products([parent, red, blue, red_xl]).unwrap()
    }

    #[test]
    fn starts_from_the_childs_own_attributes() {
        let view = view_of(&family(), "tee-red");
        let session = VariantSession::new(&view);
        assert!(session.is_selected("Color", "Red"));
        assert!(session.is_selected("Size", "L"));
        assert_eq!(session.last_touched(), None);
        assert_eq!(session.purchase_link(&view).url, "https://amazon.com/dp/RED-L");
    }

    #[test]
    fn clicking_a_sibling_combination_navigates() {
        let view = view_of(&family(), "tee-red");
        let mut session = VariantSession::new(&view);

        let nav = session.select(&view, "Color", "Blue");
        assert_eq!(nav, Navigation::Navigate { path: "/products/tee-blue".to_string() });
        assert_eq!(session.last_touched(), Some("Color"));
        let link = session.purchase_link(&view);
        assert_eq!(link.url, "https://amazon.com/dp/BLUE-L");
        assert!(matches!(link.matched, Some(LinkLookup::Combination { .. })));
    }

    #[test]
    fn unknown_combination_stays_and_keeps_selection() {
        let view = view_of(&family(), "tee-blue");
        let mut session = VariantSession::new(&view);

        let nav = session.select(&view, "Size", "XL");
        assert_eq!(nav, Navigation::Stay);
        assert!(session.is_selected("Color", "Blue"));
        assert!(session.is_selected("Size", "XL"));
        assert_eq!(session.purchase_link(&view).url, "https://amazon.com/dp/BLUE-L");
        assert_eq!(session.purchase_link(&view).matched, None);
    }

    #[test]
    fn reselecting_current_combination_stays() {
        let view = view_of(&family(), "tee-red");
        let mut session = VariantSession::new(&view);
        assert_eq!(session.select(&view, "Size", "L"), Navigation::Stay);
    }

    #[test]
    fn option_click_moves_gallery_to_matching_image() {
        let view = view_of(&family(), "tee-red");
        let mut session = VariantSession::new(&view);
        session.select(&view, "Size", "back");
        assert_eq!(session.selected_image(), 1);
        assert_eq!(session.primary_image(&view), "/img/red-back.jpg");

        session.show_image(0);
        assert_eq!(session.primary_image(&view), "/img/red-front.jpg");
    }

    #[test]
    fn legacy_product_uses_explicit_image_map_and_thumbnails() {
        let mut mug = product("mug", "https://amazon.com/dp/MUG");
        mug.images = Some(r#"["/a.jpg","/b.jpg","/red.jpg"]"#.to_string());
        let catalog = InMemoryCatalog::from_products([mug]).unwrap();
        let mut view = view_of(&catalog, "mug");

        let mut image_map = ImageIndexMap::new();
        image_map.entry("Color".to_string()).or_default().insert("Red".to_string(), 1);
        view.image_map = Some(image_map);
        let mut thumbs = OptionImageMap::new();
        thumbs.entry("Color".to_string()).or_default().insert("Red".to_string(), "thumbs/red.jpg".to_string());
        view.option_images = Some(thumbs);

        let mut session = VariantSession::new(&view);
        assert_eq!(session.select(&view, "Color", "Red"), Navigation::Stay);
        assert_eq!(session.selected_image(), 1);

        assert_eq!(session.thumbnail(&view, "Color", "Red").as_deref(), Some("/thumbs/red.jpg"));
        session.mark_thumbnail_failed("Color", "Red");
        assert_eq!(session.thumbnail(&view, "Color", "Red"), None);
    }
}
