//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`QUICKQUOTE_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use quickquote_core::{Catalog, CoreError, Money, DEFAULT_STORAGE_KEY, WIZARD_RESET_DELAY_MS};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Document key of the quote collection.
    /// Default: "quickQuotes"
    pub storage_key: String,

    /// SQLite file; `None` means the platform data directory.
    pub database_path: Option<PathBuf>,

    /// JSON catalog replacing the built-in one.
    pub catalog_path: Option<PathBuf>,

    /// Pause after a finished wizard run, in milliseconds.
    pub wizard_reset_delay_ms: u64,

    /// Currency symbol (for display)
    pub currency_symbol: String,

    /// Decimal places shown for amounts, at most [`MAX_CURRENCY_DECIMALS`].
    pub currency_decimals: u8,
}

/// Most decimal places [`ConfigState::format_currency`] will show.
pub const MAX_CURRENCY_DECIMALS: u8 = 6;

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    ///
    /// ## Default Values
    /// - Storage key: "quickQuotes"
    /// - Database: platform data directory
    /// - Catalog: built in
    /// - Wizard reset: 2 seconds
    /// - Currency: `$` with 2 decimals
    fn default() -> Self {
        ConfigState {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            database_path: None,
            catalog_path: None,
            wizard_reset_delay_ms: WIZARD_RESET_DELAY_MS,
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
        }
    }
}

impl ConfigState {
    /// Creates a new ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `QUICKQUOTE_DB_PATH`: SQLite file path
    /// - `QUICKQUOTE_STORAGE_KEY`: document key of the quote collection
    /// - `QUICKQUOTE_CATALOG`: JSON catalog file
    /// - `QUICKQUOTE_WIZARD_DELAY_MS`: wizard reset delay
    /// - `QUICKQUOTE_CURRENCY_SYMBOL`: display symbol
    /// - `QUICKQUOTE_CURRENCY_DECIMALS`: decimal places shown
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`ConfigState::from_env`] with an explicit variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(path) = lookup("QUICKQUOTE_DB_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(key) = lookup("QUICKQUOTE_STORAGE_KEY").filter(|k| !k.trim().is_empty()) {
            config.storage_key = key;
        }

        if let Some(path) = lookup("QUICKQUOTE_CATALOG") {
            config.catalog_path = Some(PathBuf::from(path));
        }

        if let Some(delay) = lookup("QUICKQUOTE_WIZARD_DELAY_MS") {
            match delay.parse::<u64>() {
                Ok(ms) => config.wizard_reset_delay_ms = ms,
                Err(_) => warn!(value = %delay, "Ignoring invalid QUICKQUOTE_WIZARD_DELAY_MS"),
            }
        }

        if let Some(symbol) = lookup("QUICKQUOTE_CURRENCY_SYMBOL") {
            config.currency_symbol = symbol;
        }

        if let Some(decimals) = lookup("QUICKQUOTE_CURRENCY_DECIMALS") {
            match decimals.parse::<u8>() {
                Ok(d) if d <= MAX_CURRENCY_DECIMALS => config.currency_decimals = d,
                _ => warn!(value = %decimals, "Ignoring invalid QUICKQUOTE_CURRENCY_DECIMALS"),
            }
        }

        config
    }

    pub fn wizard_reset_delay(&self) -> Duration {
        Duration::from_millis(self.wizard_reset_delay_ms)
    }

    /// Loads the configured catalog, or the built-in one.
    pub fn load_catalog(&self) -> Result<Catalog, CoreError> {
        let Some(path) = &self.catalog_path else {
            return Ok(Catalog::builtin());
        };

        info!(path = %path.display(), "Loading catalog");
        let json = std::fs::read_to_string(path)
            .map_err(|e| CoreError::InvalidCatalog(format!("{}: {}", path.display(), e)))?;
        Catalog::from_json(&json)
    }

    /// Formats a cent amount with the configured symbol and decimals.
    ///
    /// Amounts are always cents. Below two decimals the value is rounded
    /// half away from zero; above two it is padded with zeros. Decimals are
    /// capped at [`MAX_CURRENCY_DECIMALS`].
    ///
    /// ## Example
    /// ```rust,ignore
    /// let config = ConfigState::default();
    /// assert_eq!(config.format_currency(1234), "$12.34");
    /// ```
    pub fn format_currency(&self, cents: i64) -> String {
        let decimals = u32::from(self.currency_decimals.min(MAX_CURRENCY_DECIMALS));
        let abs = u128::from(cents.unsigned_abs());
        let units = if decimals >= 2 {
            abs * 10_u128.pow(decimals - 2)
        } else {
            let step = 10_u128.pow(2 - decimals);
            (abs + step / 2) / step
        };

        let sign = if cents < 0 && units != 0 { "-" } else { "" };
        if decimals == 0 {
            return format!("{}{}{}", sign, self.currency_symbol, units);
        }
        let scale = 10_u128.pow(decimals);
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.currency_symbol,
            units / scale,
            units % scale,
            width = decimals as usize
        )
    }

    pub fn format_money(&self, money: Money) -> String {
        self.format_currency(money.cents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_lookup(lookup(&[]));
        assert_eq!(config, ConfigState::default());
        assert_eq!(config.storage_key, "quickQuotes");
        assert_eq!(config.wizard_reset_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_env_overrides() {
        let config = ConfigState::from_lookup(lookup(&[
            ("QUICKQUOTE_DB_PATH", "/tmp/qq.db"),
            ("QUICKQUOTE_STORAGE_KEY", "testQuotes"),
            ("QUICKQUOTE_WIZARD_DELAY_MS", "0"),
            ("QUICKQUOTE_CURRENCY_SYMBOL", "€"),
        ]));
        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/qq.db")));
        assert_eq!(config.storage_key, "testQuotes");
        assert_eq!(config.wizard_reset_delay_ms, 0);
        assert_eq!(config.format_currency(475), "€4.75");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = ConfigState::from_lookup(lookup(&[
            ("QUICKQUOTE_WIZARD_DELAY_MS", "soon"),
            ("QUICKQUOTE_STORAGE_KEY", "  "),
            ("QUICKQUOTE_CURRENCY_DECIMALS", "40"),
        ]));
        assert_eq!(config.wizard_reset_delay_ms, 2_000);
        assert_eq!(config.storage_key, "quickQuotes");
        assert_eq!(config.currency_decimals, 2);
    }

    #[test]
    fn test_format_currency() {
        let config = ConfigState::default();
        assert_eq!(config.format_currency(9500), "$95.00");
        assert_eq!(config.format_currency(1), "$0.01");
        assert_eq!(config.format_currency(-12_290), "-$122.90");
        assert_eq!(config.format_money(Money::from_cents(153_000)), "$1530.00");
        assert_eq!(config.format_currency(i64::MIN), "-$92233720368547758.08");
    }

    #[test]
    fn test_format_currency_scales_cents_to_decimals() {
        let with = |decimals| ConfigState {
            currency_decimals: decimals,
            ..ConfigState::default()
        };

        assert_eq!(with(0).format_currency(9550), "$96");
        assert_eq!(with(0).format_currency(-9549), "-$95");
        assert_eq!(with(0).format_currency(-49), "$0");
        assert_eq!(with(1).format_currency(475), "$4.8");
        assert_eq!(with(3).format_currency(475), "$4.750");
        assert_eq!(with(3).format_currency(-1), "-$0.010");
        assert_eq!(with(200).format_currency(1), "$0.010000");

        let config = ConfigState::from_lookup(lookup(&[("QUICKQUOTE_CURRENCY_DECIMALS", "0")]));
        assert_eq!(config.format_money(Money::from_cents(153_000)), "$1530");
    }

    #[test]
    fn test_missing_catalog_file() {
        let config = ConfigState {
            catalog_path: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..ConfigState::default()
        };
        assert!(matches!(
            config.load_catalog(),
            Err(CoreError::InvalidCatalog(_))
        ));
        assert_eq!(
            ConfigState::default().load_catalog().unwrap(),
            Catalog::builtin()
        );
    }
}
