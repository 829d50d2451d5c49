//! Form lifecycle.
//!
//! Forms are created from sanitized operator input, published under a
//! slug, partially updated with explicit `Patch` semantics, suspended, and
//! deleted together with their submissions.

mod service;
mod slug;
mod types;

pub use service::FormService;
pub use slug::{slugify, unique_slug};
pub use types::{CreatedForm, FormSummary, FormUpdate, NewForm, Patch};
