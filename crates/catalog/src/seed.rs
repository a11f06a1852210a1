//! Demo variant family ("Classic Cotton T-Shirt", Red/L and Blue/L).

use storefront_core::{DomainResult, ProductId, Slug};

use crate::product::Product;

/// The demo family; `parent` is a container only and never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoFamily {
    pub parent: Product,
    pub red: Product,
    pub blue: Product,
}

impl DemoFamily {
    pub fn into_products(self) -> Vec<Product> {
        vec![self.parent, self.red, self.blue]
    }
}

/// Build the demo family. `suffix` is appended to every slug so repeated
/// seeding into one catalog does not collide.
pub fn demo_family(suffix: Option<&str>) -> DomainResult<DemoFamily> {
    let slug = |base: &str| match suffix {
        Some(suffix) => Slug::parse(format!("{base}-{suffix}")),
        None => Slug::parse(base),
    };

    let mut parent = Product::new(
        ProductId::new(),
        slug("classic-cotton-t-shirt-family")?,
        "Classic Cotton T-Shirt (Parent)",
        "#",
    );
    parent.description = "<p>This is the parent product container.</p>".to_string();
    parent.category_name = Some("Clothing".to_string());
    parent.main_image = "/uploads/placeholder.jpg".to_string();
    parent.images = Some("[]".to_string());
    parent.bullet_points = Some("[]".to_string());
    parent.show_buy_on_amazon = false;
    parent.show_add_to_cart = false;

    let child = |slug: Slug, title: &str, color: &str, url: &str, price: u64, bullet: &str| {
        let lower = color.to_lowercase();
        let mut p = Product::new(ProductId::new(), slug, title, url)
            .as_child_of(parent.id, [("Color", color), ("Size", "L")]);
        p.description = format!("<p>A {lower} t-shirt.</p>");
        p.category_name = parent.category_name.clone();
        p.price = price;
        p.main_image = format!("https://placehold.co/600x600/{lower}/white?text={color}+Shirt");
        p.images = Some(format!(
            r#"["https://placehold.co/600x600/{lower}/white?text={color}+Front","https://placehold.co/600x600/{lower}/white?text={color}+Back"]"#
        ));
        p.bullet_points = Some(format!(r#"["100% Cotton","{bullet}"]"#));
        p
    };

    let red = child(
        slug("classic-cotton-t-shirt-red")?,
        "Classic Cotton T-Shirt - Red",
        "Red",
        "https://amazon.com/dp/B00000RED",
        1999,
        "Bright Red Color",
    );
    let blue = child(
        slug("classic-cotton-t-shirt-blue")?,
        "Classic Cotton T-Shirt - Blue",
        "Blue",
        "https://amazon.com/dp/B00000BLUE",
        2199,
        "Deep Blue Color",
    );

    Ok(DemoFamily { parent, red, blue })
}
