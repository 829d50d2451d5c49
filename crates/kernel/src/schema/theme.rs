//! Theme sanitization.

use formsmith_sdk::limits::{MAX_THEME_KEY_LEN, MAX_THEME_NAME_LEN};
use formsmith_sdk::types::Theme;
use serde_json::Value;

use super::truncate_chars;

/// Build a theme from raw input, falling back to the default per property.
///
/// A non-object yields the default theme. Colors must be `#RRGGBB`.
pub fn sanitize_theme(raw: &Value) -> Theme {
    let defaults = Theme::default();
    let Some(obj) = raw.as_object() else {
        return defaults;
    };

    let color = |name: &str, fallback: &str| -> String {
        obj.get(name)
            .and_then(Value::as_str)
            .filter(|s| is_hex_color(s))
            .unwrap_or(fallback)
            .to_string()
    };

    Theme {
        key: label_or(obj.get("key"), &defaults.key, MAX_THEME_KEY_LEN),
        name: label_or(obj.get("name"), &defaults.name, MAX_THEME_NAME_LEN),
        brand: color("brand", &defaults.brand),
        ok: color("ok", &defaults.ok),
        ink: color("ink", &defaults.ink),
        muted: color("muted", &defaults.muted),
        ring: color("ring", &defaults.ring),
        soft: color("soft", &defaults.soft),
    }
}

/// `#` followed by exactly six hex digits.
pub fn is_hex_color(s: &str) -> bool {
    s.len() == 7
        && s.starts_with('#')
        && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

fn label_or(raw: Option<&Value>, fallback: &str, max: usize) -> String {
    let text = match raw {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };
    if text.is_empty() {
        truncate_chars(fallback, max)
    } else {
        truncate_chars(&text, max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_yields_default() {
        assert_eq!(sanitize_theme(&json!(null)), Theme::default());
        assert_eq!(sanitize_theme(&json!("dark")), Theme::default());
    }

    #[test]
    fn valid_colors_kept_invalid_replaced() {
        let theme = sanitize_theme(&json!({
            "key": "forest",
            "name": "Forest",
            "brand": "#22AA44",
            "ok": "green",
            "ink": "#12345",
            "muted": 7,
        }));
        assert_eq!(theme.key, "forest");
        assert_eq!(theme.name, "Forest");
        assert_eq!(theme.brand, "#22AA44");
        assert_eq!(theme.ok, Theme::default().ok);
        assert_eq!(theme.ink, Theme::default().ink);
        assert_eq!(theme.muted, Theme::default().muted);
        assert_eq!(theme.soft, Theme::default().soft);
    }

    #[test]
    fn blank_key_and_name_fall_back_and_long_ones_are_capped() {
        let theme = sanitize_theme(&json!({"key": "  ", "name": "n".repeat(100)}));
        assert_eq!(theme.key, "sea");
        assert_eq!(theme.name.chars().count(), MAX_THEME_NAME_LEN);
    }

    #[test]
    fn hex_color_shape() {
        assert!(is_hex_color("#0ea5e9"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("0ea5e9"));
        assert!(!is_hex_color("#0ea5e"));
        assert!(!is_hex_color("#0ea5eg"));
        assert!(!is_hex_color("#é12345"));
    }
}
