//! Form schema handling.
//!
//! - `sanitize_fields`: raw operator field list to canonical definitions
//! - `coerce_options`: select option normalization
//! - `compile_format`: wildcard mask to anchored regex source
//! - `sanitize_theme`: theme colors and names with per-property fallback

mod mask;
mod options;
mod sanitize;
mod theme;

pub use mask::compile_format;
pub use options::{coerce_option_list, coerce_options};
pub use sanitize::{derive_field_id, sanitize_fields};
pub use theme::{is_hex_color, sanitize_theme};

/// Keep at most `max` characters.
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
