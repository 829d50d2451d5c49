//! Public form slugs.

use uuid::Uuid;

use crate::error::StoreError;
use crate::store::DocumentStore;

/// Convert a title into a URL-safe slug.
///
/// Lowercases, replaces each run of non-alphanumeric characters with a
/// single hyphen, and trims hyphens from both ends. Falls back to "form".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_was_hyphen = true; // skip leading hyphens
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            prev_was_hyphen = false;
        } else if !prev_was_hyphen {
            slug.push('-');
            prev_was_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "form".to_string()
    } else {
        slug
    }
}

/// Slugify a title and make it unique against the store.
///
/// A taken slug gets an 8-hex-digit random suffix.
pub fn unique_slug(store: &dyn DocumentStore, title: &str) -> Result<String, StoreError> {
    let base = slugify(title);
    if !store.slug_exists(&base)? {
        return Ok(base);
    }
    let fragment = Uuid::new_v4().simple().to_string();
    Ok(format!("{base}-{}", &fragment[..8]))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn slugify_basic() {
        assert_eq!(slugify("Contact Us"), "contact-us");
        assert_eq!(slugify("Customer Feedback 2026"), "customer-feedback-2026");
    }

    #[test]
    fn slugify_special_chars() {
        assert_eq!(slugify("What's New?"), "what-s-new");
        assert_eq!(slugify("  RSVP -- Party!!  "), "rsvp-party");
        assert_eq!(slugify("Café déjà vu"), "caf-d-j-vu");
    }

    #[test]
    fn slugify_empty_falls_back() {
        assert_eq!(slugify(""), "form");
        assert_eq!(slugify("!!!"), "form");
    }
}
