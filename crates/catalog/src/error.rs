use thiserror::Error;

/// Failures surfaced by catalog reads and page resolution.
///
/// Variant resolution itself never fails; missing or malformed variant data
/// degrades to fallbacks instead of erroring.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog store error: {0}")]
    Store(String),

    #[error("duplicate slug: {0}")]
    DuplicateSlug(String),
}

impl CatalogError {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
