//! # Configuration State
//!
//! Stores storefront configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Command line flags (`--catalog`)
//! 2. Environment variables (`SHELF_*`)
//! 3. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no lock is needed.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use shelf_core::guard::STOCK_NOTICE_DURATION;
use shelf_core::Money;
use thiserror::Error;

/// Cover shown for books without an image.
pub const DEFAULT_PLACEHOLDER_IMAGE: &str = "images/no-cover.png";

/// Errors raised while resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Could not determine the application data directory")]
    DataDirUnavailable,

    #[error("Could not prepare data directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Storefront configuration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Shown in the shell banner
    pub store_name: String,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// How long a stock notice stays up
    #[serde(serialize_with = "serialize_millis")]
    pub notice_duration: Duration,

    /// Cover reference used when a book has no image
    pub placeholder_image: String,

    /// Catalog file imported when the books table is empty.
    /// `None` uses the bundled catalog.
    pub catalog_path: Option<PathBuf>,
}

fn serialize_millis<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
}

impl Default for ConfigState {
    fn default() -> Self {
        ConfigState {
            store_name: "Shelf Books".to_string(),
            currency_symbol: "$".to_string(),
            notice_duration: STOCK_NOTICE_DURATION,
            placeholder_image: DEFAULT_PLACEHOLDER_IMAGE.to_string(),
            catalog_path: None,
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SHELF_STORE_NAME`: Override store name
    /// - `SHELF_CURRENCY_SYMBOL`: Override currency symbol
    /// - `SHELF_NOTICE_MS`: Stock notice display time in milliseconds
    /// - `SHELF_PLACEHOLDER_IMAGE`: Cover used for books without an image
    /// - `SHELF_CATALOG_PATH`: Catalog JSON imported into an empty database
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ConfigState::default();

        if let Some(store_name) = lookup("SHELF_STORE_NAME") {
            config.store_name = store_name;
        }

        if let Some(symbol) = lookup("SHELF_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(millis) = lookup("SHELF_NOTICE_MS") {
            let parsed = millis.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "SHELF_NOTICE_MS",
                value: millis.clone(),
                reason: e.to_string(),
            })?;
            config.notice_duration = Duration::from_millis(parsed);
        }

        if let Some(image) = lookup("SHELF_PLACEHOLDER_IMAGE").filter(|v| !v.is_empty()) {
            config.placeholder_image = image;
        }

        if let Some(path) = lookup("SHELF_CATALOG_PATH").filter(|v| !v.is_empty()) {
            config.catalog_path = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Formats an amount with the configured currency symbol.
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            amount.dollars().abs(),
            amount.cents_part().abs()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.store_name, "Shelf Books");
        assert_eq!(config.notice_duration, Duration::from_secs(2));
        assert_eq!(config.placeholder_image, DEFAULT_PLACEHOLDER_IMAGE);
        assert!(config.catalog_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("SHELF_STORE_NAME", "Corner Books"),
            ("SHELF_CURRENCY_SYMBOL", "€"),
            ("SHELF_NOTICE_MS", "500"),
            ("SHELF_CATALOG_PATH", "/srv/books.json"),
            ("SHELF_PLACEHOLDER_IMAGE", ""),
        ]))
        .unwrap();

        assert_eq!(config.store_name, "Corner Books");
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.notice_duration, Duration::from_millis(500));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/books.json")));
        assert_eq!(config.placeholder_image, DEFAULT_PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_invalid_notice_duration() {
        let result = ConfigState::from_lookup(lookup(&[("SHELF_NOTICE_MS", "soon")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { key: "SHELF_NOTICE_MS", .. })
        ));
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(Money::from_cents(1234)), "$12.34");
        assert_eq!(config.format_currency(Money::from_cents(1)), "$0.01");
        assert_eq!(config.format_currency(Money::zero()), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(-1234)), "-$12.34");
    }
}
