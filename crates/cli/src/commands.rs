use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;

use storefront_catalog::seed::demo_family;
use storefront_catalog::{
    resolve_page, CatalogStore, InMemoryCatalog, Navigation, Product, ProductDetailView, ProductPage,
    PurchaseLink, Selection, StorefrontConfig, VariantSession,
};

use crate::cli::Pick;

/// Environment variable naming the default catalog file.
pub const CATALOG_ENV: &str = "STOREFRONT_CATALOG";

/// Redirect chains longer than this are treated as a catalog defect.
const MAX_REDIRECTS: usize = 4;

/// Build the in-memory catalog from a JSON file and/or the demo family.
pub fn load_catalog(path: Option<&Path>, demo: bool) -> anyhow::Result<InMemoryCatalog> {
    let path: Option<PathBuf> = path
        .map(Path::to_path_buf)
        .or_else(|| std::env::var(CATALOG_ENV).ok().map(PathBuf::from));

    let mut products: Vec<Product> = match &path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse catalog {}", path.display()))?
        }
        None => Vec::new(),
    };

    if demo {
        products.extend(demo_family(None)?.into_products());
    }
    if products.is_empty() {
        tracing::warn!("catalog is empty; pass --catalog, set {CATALOG_ENV}, or use --demo");
    }

    tracing::info!(products = products.len(), "catalog loaded");
    InMemoryCatalog::from_products(products).context("invalid catalog")
}

/// What happened on one option click.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClickReport {
    /// Page the click happened on.
    pub page: String,
    pub group: String,
    pub option: String,
    pub navigation: Navigation,
    pub purchase_link: PurchaseLink,
}

/// Option-picker state after the last click.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub selection: Selection,
    pub last_touched: Option<String>,
    pub purchase_link: PurchaseLink,
    pub primary_image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageReport {
    pub requested: String,
    /// Paths followed because a family parent was requested.
    pub redirects: Vec<String>,
    pub clicks: Vec<ClickReport>,
    /// Page the visitor ends on; `None` when the product was not found.
    pub page: Option<ProductDetailView>,
    pub session: Option<SessionSummary>,
}

/// Open `slug` and replay `picks` on it, following sibling navigation.
pub fn run_page<S>(store: &S, config: &StorefrontConfig, slug: &str, picks: &[Pick]) -> anyhow::Result<PageReport>
where
    S: CatalogStore + ?Sized,
{
    let mut report = PageReport {
        requested: slug.to_string(),
        redirects: Vec::new(),
        clicks: Vec::new(),
        page: None,
        session: None,
    };

    let Some(mut view) = open(store, config, slug, &mut report.redirects)? else {
        tracing::warn!(%slug, "product not found");
        return Ok(report);
    };
    let mut session = VariantSession::new(&view);

    for pick in picks {
        let navigation = session.select(&view, &pick.group, &pick.option);
        report.clicks.push(ClickReport {
            page: view.slug.to_string(),
            group: pick.group.clone(),
            option: pick.option.clone(),
            navigation: navigation.clone(),
            purchase_link: session.purchase_link(&view),
        });

        if let Navigation::Navigate { path } = navigation {
            let target = config
                .slug_from_path(&path)
                .with_context(|| format!("navigation target {path} is not a product page"))?;
            let Some(next) = open(store, config, target, &mut report.redirects)? else {
                bail!("navigation target {path} does not exist");
            };
            tracing::debug!(from = %view.slug, to = %next.slug, "followed variant navigation");
            view = next;
            session = VariantSession::new(&view);
        }
    }

    report.session = Some(SessionSummary {
        selection: session.selection().clone(),
        last_touched: session.last_touched().map(str::to_string),
        purchase_link: session.purchase_link(&view),
        primary_image: session.primary_image(&view),
    });
    report.page = Some(view);
    Ok(report)
}

fn open<S>(
    store: &S,
    config: &StorefrontConfig,
    slug: &str,
    redirects: &mut Vec<String>,
) -> anyhow::Result<Option<ProductDetailView>>
where
    S: CatalogStore + ?Sized,
{
    let mut slug = slug.to_string();
    for _ in 0..=MAX_REDIRECTS {
        match resolve_page(store, &slug, config)? {
            ProductPage::NotFound => return Ok(None),
            ProductPage::Detail(view) => return Ok(Some(*view)),
            ProductPage::Redirect { slug: target, path } => {
                redirects.push(path);
                slug = target.to_string();
            }
        }
    }
    bail!("too many redirects while opening {slug}")
}

/// The demo family, ready to be written out as a catalog file.
pub fn run_seed(suffix: Option<&str>) -> anyhow::Result<Vec<Product>> {
    let family = demo_family(suffix).context("invalid demo slug suffix")?;
    tracing::info!(
        parent = %family.parent.slug,
        red = %family.red.slug,
        blue = %family.blue.slug,
        "created demo variant family"
    );
    Ok(family.into_products())
}
