//! Gallery image selection for variant options.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Explicit gallery index per group option (`{"Color": {"Red": 2}}`).
pub type ImageIndexMap = IndexMap<String, IndexMap<String, usize>>;

/// Thumbnail URL per group option.
pub type OptionImageMap = IndexMap<String, IndexMap<String, String>>;

/// Gallery images to display: `images`, or `[main_image]` when empty, without blanks.
pub fn safe_image_pool(images: &[String], main_image: &str) -> Vec<String> {
    let pool: Vec<String> = if images.is_empty() {
        vec![main_image.to_string()]
    } else {
        images.to_vec()
    };
    pool.into_iter().filter(|src| !src.is_empty()).collect()
}

/// Pick the gallery index to show for an option.
///
/// An explicit in-range mapping wins, then the first image whose identifier
/// contains the option (case-insensitive), then the first image.
pub fn resolve_image_index(group: &str, option: &str, explicit: Option<&ImageIndexMap>, pool: &[String]) -> usize {
    let mapped = explicit
        .and_then(|map| map.get(group))
        .and_then(|options| options.get(option))
        .copied()
        .filter(|&index| index < pool.len());
    if let Some(index) = mapped {
        return index;
    }

    let needle = option.to_lowercase();
    pool.iter()
        .position(|src| src.to_lowercase().contains(&needle))
        .unwrap_or(0)
}

/// Image shown at `index`, or `main_image` when the pool has nothing there.
pub fn primary_image<'a>(pool: &'a [String], index: usize, main_image: &'a str) -> &'a str {
    pool.get(index).map(String::as_str).unwrap_or(main_image)
}

/// Normalized thumbnail URL of an option; relative paths become root-relative.
pub fn thumbnail_url(group: &str, option: &str, option_images: Option<&OptionImageMap>) -> Option<String> {
    let url = option_images?.get(group)?.get(option)?;
    if url.is_empty() {
        return None;
    }
    if url.starts_with("http") || url.starts_with('/') {
        Some(url.clone())
    } else {
        Some(format!("/{url}"))
    }
}

/// Thumbnails that failed to load during this page view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FailedThumbnails(BTreeSet<String>);

impl FailedThumbnails {
    fn key(group: &str, option: &str) -> String {
        format!("{group}::{option}")
    }

    pub fn mark(&mut self, group: &str, option: &str) {
        self.0.insert(Self::key(group, option));
    }

    pub fn contains(&self, group: &str, option: &str) -> bool {
        self.0.contains(&Self::key(group, option))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
