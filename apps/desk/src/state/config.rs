//! # Desk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SHELF_STORE_NAME="Karim Stores"                                    │
//! │     SHELF_VAT_RATE=7.5                                                 │
//! │     SHELF_API_URL=https://orders.example.com/api                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/shelf-desk/desk.toml (Linux)                             │
//! │     ~/Library/Application Support/com.shelf.desk/desk.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Karim Stores"
//! address = ["12 Station Road", "Chattogram"]
//! currency_symbol = "৳"
//! paper_width = 42
//!
//! [pricing]
//! vat_rate_bps = 500        # 5%
//! discount_rate_bps = 0
//!
//! [api]
//! base_url = "https://orders.example.com/api"
//! timeout_secs = 30
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use shelf_api::ApiSettings;
use shelf_core::validation::validate_rate_bps;
use shelf_core::{Money, Rate};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Store Settings
// =============================================================================

/// Receipt header and money formatting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default)]
    pub address: Vec<String>,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Receipt width in characters (typically 32, 42 or 48).
    #[serde(default = "default_paper_width")]
    pub paper_width: usize,
}

fn default_store_name() -> String {
    "Shelf Dev Store".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

fn default_paper_width() -> usize {
    42
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            address: vec!["123 Main Street".to_string()],
            currency_symbol: default_currency_symbol(),
            paper_width: default_paper_width(),
        }
    }
}

impl StoreSettings {
    /// Formats an amount with the store's currency symbol.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::Money;
    /// use shelf_desk::state::StoreSettings;
    ///
    /// let store = StoreSettings::default();
    /// assert_eq!(store.format_currency(Money::from_cents(1234)), "$12.34");
    /// assert_eq!(store.format_currency(Money::from_cents(-50)), "-$0.50");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let cents = amount.cents();
        format!(
            "{}{}{}.{:02}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            (cents / 100).abs(),
            (cents % 100).abs()
        )
    }
}

// =============================================================================
// Pricing Defaults
// =============================================================================

/// Rates a new order-entry session starts with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingDefaults {
    #[serde(default)]
    pub vat_rate_bps: u32,

    #[serde(default)]
    pub discount_rate_bps: u32,
}

impl PricingDefaults {
    pub fn vat_rate(&self) -> Rate {
        Rate::from_bps(self.vat_rate_bps)
    }

    pub fn discount_rate(&self) -> Rate {
        Rate::from_bps(self.discount_rate_bps)
    }
}

// =============================================================================
// Desk Configuration
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub pricing: PricingDefaults,

    #[serde(default)]
    pub api: ApiSettings,
}

impl DeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (desk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load desk config: {}. Using defaults.", e);
            Self::default()
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.name.trim().is_empty() {
            return Err(ConfigError::Invalid("store name must not be empty".into()));
        }
        if self.store.paper_width < 24 {
            return Err(ConfigError::Invalid(
                "paper_width must be at least 24 characters".into(),
            ));
        }
        for (name, bps) in [
            ("vat_rate_bps", self.pricing.vat_rate_bps),
            ("discount_rate_bps", self.pricing.discount_rate_bps),
        ] {
            validate_rate_bps(bps).map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))?;
        }
        self.api
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Applies `SHELF_*` overrides from a variable lookup.
    ///
    /// Unparsable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = var("SHELF_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(symbol) = var("SHELF_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        for (key, slot) in [
            ("SHELF_VAT_RATE", &mut self.pricing.vat_rate_bps),
            ("SHELF_DISCOUNT_RATE", &mut self.pricing.discount_rate_bps),
        ] {
            if let Some(text) = var(key) {
                match Rate::parse(&text) {
                    Ok(rate) => {
                        debug!(key, %rate, "Overriding rate from environment");
                        *slot = rate.bps();
                    }
                    Err(e) => warn!(key, value = %text, error = %e, "Ignoring rate override"),
                }
            }
        }

        if let Some(url) = var("SHELF_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(token) = var("SHELF_API_TOKEN") {
            self.api.token = Some(token);
        }

        if let Some(timeout) = var("SHELF_API_TIMEOUT") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring SHELF_API_TIMEOUT"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "shelf", "desk")
            .map(|dirs| dirs.config_dir().join("desk.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_is_valid() {
        let config = DeskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.store.paper_width, 42);
        assert!(config.pricing.vat_rate().is_zero());
    }

    #[test]
    fn test_toml_sections() {
        let config: DeskConfig = toml::from_str(
            r#"
            [store]
            name = "Karim Stores"
            currency_symbol = "Tk "

            [pricing]
            vat_rate_bps = 500
            discount_rate_bps = 1000

            [api]
            base_url = "https://orders.example.com/api"
            "#,
        )
        .unwrap();

        assert_eq!(config.store.name, "Karim Stores");
        assert_eq!(config.store.paper_width, 42);
        assert_eq!(config.pricing.vat_rate(), Rate::from_percent(5));
        assert_eq!(config.pricing.discount_rate(), Rate::from_percent(10));
        assert_eq!(config.api.timeout_secs, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SHELF_STORE_NAME", "Night Market"),
            ("SHELF_VAT_RATE", "7.5"),
            ("SHELF_DISCOUNT_RATE", "lots"),
            ("SHELF_API_URL", "https://api.test"),
            ("SHELF_API_TIMEOUT", "5"),
        ]
        .into_iter()
        .collect();

        let mut config = DeskConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.store.name, "Night Market");
        assert_eq!(config.pricing.vat_rate_bps, 750);
        assert_eq!(config.pricing.discount_rate_bps, 0);
        assert_eq!(config.api.base_url, "https://api.test");
        assert_eq!(config.api.timeout_secs, 5);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = DeskConfig::default();
        config.pricing.vat_rate_bps = 10_001;
        assert!(config.validate().is_err());

        let mut config = DeskConfig::default();
        config.api.base_url = "orders".to_string();
        assert!(config.validate().is_err());

        let mut config = DeskConfig::default();
        config.store.name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_format_currency() {
        let store = StoreSettings {
            currency_symbol: "Tk ".to_string(),
            ..StoreSettings::default()
        };
        assert_eq!(store.format_currency(Money::from_major(285)), "Tk 285.00");
        assert_eq!(store.format_currency(Money::from_cents(1)), "Tk 0.01");
        assert_eq!(store.format_currency(Money::from_cents(-1234)), "-Tk 12.34");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = DeskConfig::load_or_default(Some(PathBuf::from("/nonexistent/desk.toml")));
        assert_eq!(config.store.name, default_store_name());
    }
}
