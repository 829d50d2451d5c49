//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Context, Result, bail};
use chrono::format::{Item, StrftimeItems};

/// Timestamp format used when none is configured.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Smallest page size the form dashboard accepts.
pub const MIN_FORMS_PER_PAGE: u32 = 5;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset (default: "info").
    pub log_filter: String,

    /// Submission listing page size when the caller gives none (default: 20).
    pub default_per_page: u32,

    /// Upper bound for caller-supplied submission page sizes (default: 200).
    pub max_per_page: u32,

    /// Form dashboard page size when the caller gives none (default: 10).
    pub forms_per_page: u32,

    /// Upper bound for dashboard page sizes (default: 50).
    pub max_forms_per_page: u32,

    /// strftime format for submission timestamps (default: "%Y-%m-%d %H:%M").
    pub timestamp_format: String,

    /// Path prefix of public form URLs (default: "/f").
    pub public_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            default_per_page: 20,
            max_per_page: 200,
            forms_per_page: 10,
            max_forms_per_page: 50,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
            public_prefix: "/f".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let log_filter = env::var("FORMSMITH_LOG").unwrap_or(defaults.log_filter);

        let default_per_page = parse_u32("FORMSMITH_PER_PAGE", defaults.default_per_page)?;
        let max_per_page = parse_u32("FORMSMITH_MAX_PER_PAGE", defaults.max_per_page)?;
        let forms_per_page = parse_u32("FORMSMITH_FORMS_PER_PAGE", defaults.forms_per_page)?;
        let max_forms_per_page =
            parse_u32("FORMSMITH_MAX_FORMS_PER_PAGE", defaults.max_forms_per_page)?;

        let timestamp_format = match env::var("FORMSMITH_TIMESTAMP_FORMAT") {
            Ok(v) => {
                check_timestamp_format(&v).context("FORMSMITH_TIMESTAMP_FORMAT is invalid")?;
                v
            }
            Err(_) => defaults.timestamp_format,
        };

        let public_prefix = env::var("FORMSMITH_PUBLIC_PREFIX")
            .map(|p| p.trim_end_matches('/').to_string())
            .unwrap_or(defaults.public_prefix);

        Ok(Self {
            log_filter,
            default_per_page,
            max_per_page,
            forms_per_page,
            max_forms_per_page,
            timestamp_format,
            public_prefix,
        })
    }

    /// Public URL of a form.
    pub fn public_url(&self, slug: &str) -> String {
        format!("{}/{slug}", self.public_prefix)
    }
}

fn parse_u32(var: &str, default: u32) -> Result<u32> {
    match env::var(var) {
        Ok(v) => v
            .parse()
            .with_context(|| format!("{var} must be a valid u32")),
        Err(_) => Ok(default),
    }
}

/// Whether chrono can render timestamps with `format`.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    !StrftimeItems::new(format).any(|item| matches!(item, Item::Error))
}

/// Reject strftime formats chrono cannot render.
pub fn check_timestamp_format(format: &str) -> Result<()> {
    if !is_valid_timestamp_format(format) {
        bail!("unsupported strftime format {format:?}");
    }
    Ok(())
}
