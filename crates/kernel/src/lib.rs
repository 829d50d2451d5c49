//! Formsmith Kernel Library
//!
//! Field-definition sanitizing, mask compilation, value validation and
//! submission projection for dynamic forms. The `formsmith` binary wraps
//! these for offline schema checks and exports.

pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod projection;
pub mod schema;
pub mod store;
pub mod submission;
pub mod validate;

pub use config::Config;
pub use error::{FormError, FormResult};
pub use form::FormService;
pub use store::{DocumentStore, MemoryStore};
pub use submission::SubmissionService;
