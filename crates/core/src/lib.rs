//! `storefront-core` — shared building blocks for the storefront crates.
//!
//! Pure domain primitives only: identifiers, value objects and the domain error
//! model. No IO lives here.

pub mod error;
pub mod id;
pub mod value_object;

pub use error::{DomainError, DomainResult};
pub use id::ProductId;
pub use value_object::Slug;
