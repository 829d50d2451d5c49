//! Formsmith SDK
//!
//! The data model shared between the form engine and anything that renders,
//! routes or persists forms: canonical field definitions, themes, forms and
//! submissions. The JSON shape of these types is the persisted shape.

pub mod limits;
pub mod types;

pub mod prelude {
    pub use crate::limits::*;
    pub use crate::types::*;
}
