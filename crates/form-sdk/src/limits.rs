//! Size caps applied when sanitizing operator input.
//!
//! All string caps count characters, not bytes.

/// Maximum form title length.
pub const MAX_TITLE_LEN: usize = 120;

/// Maximum form description length.
pub const MAX_DESC_LEN: usize = 300;

/// Maximum number of raw field entries accepted in one schema.
/// Larger payloads are rejected outright, never truncated.
pub const MAX_FIELDS: usize = 100;

pub const MAX_LABEL_LEN: usize = 80;
pub const MAX_PLACEHOLDER_LEN: usize = 120;
pub const MAX_FORMAT_LEN: usize = 64;

/// Options beyond this count are silently dropped.
pub const MAX_OPTION_COUNT: usize = 100;
pub const MAX_OPTION_LEN: usize = 80;

pub const MAX_THEME_KEY_LEN: usize = 40;
pub const MAX_THEME_NAME_LEN: usize = 60;
