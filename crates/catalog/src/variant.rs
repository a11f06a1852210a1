//! Variant family resolution.
//!
//! Turns a family's flat per-child attributes into option groups, combination
//! keys and lookup tables, and resolves which sibling page or affiliate link a
//! selection points at. Everything here is pure; the only carried state (the
//! last touched group) lives in [`crate::session::VariantSession`].

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use storefront_core::Slug;

use crate::config::StorefrontConfig;
use crate::product::Sibling;

/// Selected option per group name, in selection order.
pub type Selection = IndexMap<String, String>;

/// A variant attribute name and its observed options, in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub name: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl VariantGroup {
    pub fn new<S: Into<String>>(name: impl Into<String>, options: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// `name=value` fragments joined by `|`, one per selected group, in group order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CombinationKey(String);

impl CombinationKey {
    pub const SEPARATOR: char = '|';

    /// Wrap a key read back from storage as is.
    pub(crate) fn from_stored(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl core::fmt::Display for CombinationKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn selected<'a>(selection: &'a Selection, group: &str) -> Option<&'a str> {
    selection
        .get(group)
        .map(String::as_str)
        .filter(|v| !v.is_empty())
}

/// Derive the option groups of a family.
///
/// Children without attributes contribute nothing; empty values count as
/// absent, so a name that never carries a value yields no group.
pub fn derive_groups(siblings: &[Sibling]) -> Vec<VariantGroup> {
    let mut seen: IndexMap<&str, IndexSet<&str>> = IndexMap::new();
    for attrs in siblings.iter().filter_map(|s| s.variant_attributes.as_ref()) {
        for (name, value) in attrs {
            let options = seen.entry(name.as_str()).or_default();
            if !value.is_empty() {
                options.insert(value.as_str());
            }
        }
    }

    seen.into_iter()
        .filter(|(_, options)| !options.is_empty())
        .map(|(name, options)| VariantGroup::new(name, options))
        .collect()
}

/// Build the combination key of `selection` over `groups`.
///
/// Unselected groups are omitted, so the key only identifies a sibling when
/// [`is_complete`] holds.
pub fn combination_key(groups: &[VariantGroup], selection: &Selection) -> CombinationKey {
    let mut key = String::new();
    for group in groups.iter().filter(|g| !g.name.is_empty()) {
        let Some(value) = selected(selection, &group.name) else {
            continue;
        };
        if !key.is_empty() {
            key.push(CombinationKey::SEPARATOR);
        }
        key.push_str(&group.name);
        key.push('=');
        key.push_str(value);
    }
    CombinationKey(key)
}

/// True when every group has a non-empty selected value (and there is at least one group).
pub fn is_complete(groups: &[VariantGroup], selection: &Selection) -> bool {
    !groups.is_empty() && groups.iter().all(|g| selected(selection, &g.name).is_some())
}

/// Where a link came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LinkLookup {
    PerGroup { group: String, option: String },
    Combination { key: CombinationKey },
}

/// Links keyed per group option and per full combination.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTable {
    #[serde(default)]
    pub per_group: IndexMap<String, IndexMap<String, String>>,
    #[serde(default)]
    pub combinations: IndexMap<CombinationKey, String>,
}

impl LinkTable {
    pub fn is_empty(&self) -> bool {
        self.per_group.is_empty() && self.combinations.is_empty()
    }

    /// Resolve a lookup; empty entries count as missing.
    pub fn get(&self, lookup: &LinkLookup) -> Option<&str> {
        let link = match lookup {
            LinkLookup::PerGroup { group, option } => self.per_group.get(group)?.get(option)?,
            LinkLookup::Combination { key } => self.combinations.get(key)?,
        };
        Some(link.as_str()).filter(|l| !l.is_empty())
    }

    fn lookup_per_group(&self, group: &str, option: &str) -> Option<(LinkLookup, &str)> {
        let lookup = LinkLookup::PerGroup {
            group: group.to_string(),
            option: option.to_string(),
        };
        let link = self.get(&lookup)?;
        Some((lookup, link))
    }
}

/// Two siblings carrying the same attribute combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCollision {
    pub key: CombinationKey,
    pub kept: Slug,
    pub dropped: Slug,
}

/// Lookup tables derived from a family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyTables {
    /// Affiliate URL per full combination.
    pub affiliate_links: LinkTable,
    /// Internal product path per full combination.
    pub paths: LinkTable,
    /// Duplicate combinations; the first listed sibling keeps the key.
    pub collisions: Vec<KeyCollision>,
}

/// Build the combination tables of a family.
///
/// Siblings that do not supply a value for every group are skipped.
pub fn build_tables(siblings: &[Sibling], groups: &[VariantGroup], config: &StorefrontConfig) -> FamilyTables {
    let mut tables = FamilyTables::default();
    let mut owners: IndexMap<CombinationKey, &Slug> = IndexMap::new();

    for sibling in siblings {
        let Some(attrs) = sibling.variant_attributes.as_ref() else {
            continue;
        };
        if !is_complete(groups, attrs) {
            continue;
        }

        let key = combination_key(groups, attrs);
        if let Some(kept) = owners.get(&key) {
            tracing::warn!(
                key = %key,
                kept = %kept,
                dropped = %sibling.slug,
                "duplicate variant combination in family"
            );
            tables.collisions.push(KeyCollision {
                key,
                kept: (*kept).clone(),
                dropped: sibling.slug.clone(),
            });
            continue;
        }

        tables
            .affiliate_links
            .combinations
            .insert(key.clone(), sibling.amazon_url.clone());
        tables
            .paths
            .combinations
            .insert(key.clone(), config.product_path(&sibling.slug));
        owners.insert(key, &sibling.slug);
    }

    tables
}

/// The sibling whose attributes match a complete selection.
pub fn match_sibling<'a>(siblings: &'a [Sibling], groups: &[VariantGroup], selection: &Selection) -> Option<&'a Sibling> {
    if !is_complete(groups, selection) {
        return None;
    }
    let key = combination_key(groups, selection);
    siblings.iter().find(|s| {
        s.variant_attributes
            .as_ref()
            .is_some_and(|attrs| is_complete(groups, attrs) && combination_key(groups, attrs) == key)
    })
}

/// Outcome of an option click.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Navigation {
    /// No sibling page for this selection (incomplete, unknown, or current page).
    Stay,
    Navigate { path: String },
}

/// Resolve the sibling page a selection points at.
pub fn resolve_navigation(
    groups: &[VariantGroup],
    paths: &LinkTable,
    selection: &Selection,
    current_path: &str,
) -> Navigation {
    if !is_complete(groups, selection) {
        return Navigation::Stay;
    }
    let key = combination_key(groups, selection);
    match paths.get(&LinkLookup::Combination { key }) {
        Some(path) if path != current_path => Navigation::Navigate {
            path: path.to_string(),
        },
        _ => Navigation::Stay,
    }
}

/// The purchase link to show and where it came from (`None` = product fallback).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLink {
    pub url: String,
    pub matched: Option<LinkLookup>,
}

/// Resolve the active purchase link. First match wins:
///
/// 1. full combination link, when every group is selected;
/// 2. the last touched group's link for its selected option;
/// 3. the first selected option (selection order) with a per-group link;
/// 4. `fallback_url`.
pub fn resolve_purchase_link(
    groups: &[VariantGroup],
    links: &LinkTable,
    selection: &Selection,
    last_touched: Option<&str>,
    fallback_url: &str,
) -> PurchaseLink {
    if is_complete(groups, selection) {
        let lookup = LinkLookup::Combination {
            key: combination_key(groups, selection),
        };
        if let Some(url) = links.get(&lookup) {
            return PurchaseLink {
                url: url.to_string(),
                matched: Some(lookup),
            };
        }
    }

    let touched = last_touched.and_then(|group| Some((group, selected(selection, group)?)));
    let candidates = touched.into_iter().chain(
        selection
            .iter()
            .filter(|(_, option)| !option.is_empty())
            .map(|(group, option)| (group.as_str(), option.as_str())),
    );

    for (group, option) in candidates {
        if let Some((lookup, url)) = links.lookup_per_group(group, option) {
            return PurchaseLink {
                url: url.to_string(),
                matched: Some(lookup),
            };
        }
    }

    PurchaseLink {
        url: fallback_url.to_string(),
        matched: None,
    }
}
