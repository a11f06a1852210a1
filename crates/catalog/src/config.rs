//! Storefront configuration (environment driven).

use storefront_core::Slug;

/// Environment variable overriding [`StorefrontConfig::product_path_prefix`].
pub const PRODUCT_PATH_PREFIX_ENV: &str = "STOREFRONT_PRODUCT_PATH_PREFIX";

pub const DEFAULT_PRODUCT_PATH_PREFIX: &str = "/products/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Path prefix of product detail pages; always starts and ends with `/`.
    pub product_path_prefix: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            product_path_prefix: DEFAULT_PRODUCT_PATH_PREFIX.to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Read configuration from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (tests pass a closure).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(prefix) = lookup(PRODUCT_PATH_PREFIX_ENV) {
            config = config.with_product_path_prefix(prefix);
        }
        config
    }

    /// Override the product path prefix. A prefix that is not absolute is
    /// ignored with a warning; a missing trailing `/` is added.
    pub fn with_product_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        let mut prefix = prefix.into();
        if !prefix.starts_with('/') {
            tracing::warn!(
                %prefix,
                "product path prefix must start with '/'; using {DEFAULT_PRODUCT_PATH_PREFIX}"
            );
            return self;
        }
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        self.product_path_prefix = prefix;
        self
    }

    /// Internal path of a product detail page.
    pub fn product_path(&self, slug: &Slug) -> String {
        format!("{}{}", self.product_path_prefix, slug)
    }

    /// Inverse of [`product_path`](Self::product_path).
    pub fn slug_from_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        path.strip_prefix(self.product_path_prefix.as_str())
            .filter(|slug| !slug.is_empty())
    }
}
