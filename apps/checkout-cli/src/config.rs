//! # Store Configuration
//!
//! Loads the store settings the core needs for a calculation.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CHECKOUT_TAX_RATE=8.25                                             │
//! │     CHECKOUT_SHIPPING_MODE=free_over_amount                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/checkout/store.toml (Linux)                              │
//! │     ~/Library/Application Support/com.starcafe.checkout/store.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     USD, no shipping or tax policy, no loyalty programme               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [store]
//! name = "Star Café"
//! currency_code = "USD"
//! currency_symbol = "$"
//!
//! [shipping]
//! mode = "free_over_amount"   # free | free_over_amount | flat
//! flat_cost_cents = 1000
//! free_threshold_cents = 50000
//!
//! [tax]
//! rate_bps = 800
//! base = "subtotal"           # subtotal | subtotal_and_shipping
//!
//! [loyalty]
//! points_per_unit = 1
//! tier_span = 500
//! tiers = ["Bronze", "Silver", "Gold", "Platinum"]
//! ```
//!
//! A missing `[shipping]` or `[tax]` section means "no policy": the core then
//! charges zero for it and flags the total.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use checkout_core::loyalty::LoyaltyConfig;
use checkout_core::price::parse_price;
use checkout_core::shipping::{ShippingMode, ShippingPolicy, ShippingSettings};
use checkout_core::tax::{TaxPolicy, TaxSettings};
use checkout_core::{PriceInput, StoreSettings, TaxRate};

use crate::error::{CliError, CliResult};

// =============================================================================
// Store Section
// =============================================================================

/// Store identity and currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSection {
    #[serde(default = "default_store_name")]
    pub name: String,

    /// ISO 4217 code.
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Star Café".to_string()
}

fn default_currency_code() -> String {
    "USD".to_string()
}

fn default_currency_symbol() -> String {
    "$".to_string()
}

impl Default for StoreSection {
    fn default() -> Self {
        StoreSection {
            name: default_store_name(),
            currency_code: default_currency_code(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete store configuration, as written on disk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreSection,

    #[serde(default)]
    pub shipping: Option<ShippingSettings>,

    #[serde(default)]
    pub tax: Option<TaxSettings>,

    #[serde(default)]
    pub loyalty: Option<LoyaltyConfig>,
}

impl StoreConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (store.toml)
    /// 3. Environment variables
    ///
    /// An explicit path that does not exist is an error; a missing file at
    /// the default location just means defaults.
    pub fn load(config_path: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                path => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load store config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a config file.
    pub fn from_file(path: &Path) -> CliResult<Self> {
        info!(?path, "Loading store config from file");
        let contents = std::fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> CliResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> CliResult<()> {
        let code = &self.store.currency_code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(CliError::InvalidConfig(format!(
                "currency_code must be a 3-letter ISO code, got: '{}'",
                code
            )));
        }

        if self.store.currency_symbol.trim().is_empty() {
            return Err(CliError::InvalidConfig(
                "currency_symbol must not be empty".into(),
            ));
        }

        if let Some(loyalty) = &self.loyalty {
            if loyalty.tiers.len() > 1 && loyalty.tier_span == 0 {
                return Err(CliError::InvalidConfig(
                    "loyalty tier_span must be greater than 0 when tiers are configured".into(),
                ));
            }
        }

        // Shipping and tax rules live with their policy conversions
        self.to_settings().map(|_| ())
    }

    /// Converts into the settings value the core consumes.
    pub fn to_settings(&self) -> CliResult<StoreSettings> {
        let shipping = self
            .shipping
            .as_ref()
            .map(ShippingPolicy::try_from)
            .transpose()?;
        let tax = self.tax.as_ref().map(TaxPolicy::try_from).transpose()?;

        Ok(StoreSettings {
            currency_code: self.store.currency_code.clone(),
            currency_symbol: self.store.currency_symbol.clone(),
            shipping,
            tax,
            loyalty: self.loyalty.clone(),
        })
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup.
    ///
    /// Amounts are written like prices ("10.00"), the tax rate as a
    /// percentage ("8.25"). Unparseable values are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Currency symbol
        if let Some(symbol) = lookup("CHECKOUT_CURRENCY_SYMBOL") {
            self.store.currency_symbol = symbol;
        }

        // Tax rate (percent)
        if let Some(rate) = lookup("CHECKOUT_TAX_RATE") {
            match rate.trim().parse::<f64>() {
                Ok(pct) => {
                    let bps = TaxRate::from_percentage(pct).bps();
                    debug!(rate_bps = bps, "Overriding tax rate from environment");
                    self.tax.get_or_insert_with(TaxSettings::default).rate_bps = bps;
                }
                Err(_) => warn!(rate = %rate, "Unparseable tax rate in environment"),
            }
        }

        // Shipping mode
        if let Some(mode) = lookup("CHECKOUT_SHIPPING_MODE") {
            match mode.parse::<ShippingMode>() {
                Ok(parsed) => {
                    debug!(mode = %parsed, "Overriding shipping mode from environment");
                    self.shipping
                        .get_or_insert_with(ShippingSettings::default)
                        .mode = parsed;
                }
                Err(e) => warn!(mode = %mode, error = %e, "Unknown shipping mode in environment"),
            }
        }

        // Flat shipping cost
        if let Some(cents) = lookup_amount(&lookup, "CHECKOUT_FLAT_SHIPPING") {
            self.shipping
                .get_or_insert_with(ShippingSettings::default)
                .flat_cost_cents = cents;
        }

        // Free shipping threshold
        if let Some(cents) = lookup_amount(&lookup, "CHECKOUT_FREE_SHIPPING_THRESHOLD") {
            self.shipping
                .get_or_insert_with(ShippingSettings::default)
                .free_threshold_cents = Some(cents);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "starcafe", "checkout")
            .map(|dirs| dirs.config_dir().join("store.toml"))
    }
}

fn lookup_amount(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<i64> {
    let raw = lookup(key)?;
    match parse_price(&PriceInput::Text(raw.clone())) {
        Ok(amount) => {
            debug!(key, cents = amount.cents(), "Overriding amount from environment");
            Some(amount.cents())
        }
        Err(e) => {
            warn!(key, value = %raw, error = %e, "Unparseable amount in environment");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkout_core::tax::TaxBase;
    use checkout_core::Money;
    use std::collections::HashMap;
    use std::io::Write;

    const SAMPLE: &str = r#"
[store]
name = "Star Café Downtown"
currency_code = "EUR"
currency_symbol = "€"

[shipping]
mode = "free_over_amount"
flat_cost_cents = 1000
free_threshold_cents = 50000

[tax]
rate_bps = 800

[loyalty]
points_per_unit = 2
tier_span = 250
tiers = ["Bean", "Roast"]
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.store.currency_code, "USD");
        assert!(config.shipping.is_none());
        assert!(config.tax.is_none());
        assert!(config.validate().is_ok());

        let settings = config.to_settings().unwrap();
        assert!(settings.shipping.is_none());
        assert!(settings.tax.is_none());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_config(SAMPLE);
        let config = StoreConfig::from_file(file.path()).unwrap();
        assert_eq!(config.store.currency_symbol, "€");

        let settings = config.to_settings().unwrap();
        assert_eq!(
            settings.shipping,
            Some(ShippingPolicy::FreeOverAmount {
                flat_cost: Money::from_cents(1000),
                threshold: Money::from_cents(50000),
            })
        );
        let tax = settings.tax.unwrap();
        assert_eq!(tax.rate.bps(), 800);
        assert_eq!(tax.base, TaxBase::Subtotal);
        assert_eq!(settings.loyalty.unwrap().points_per_unit, 2);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = StoreConfig::load(Some(missing)).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let file = write_config("[tax]\nrate_bps = \"lots\"\n");
        assert!(matches!(
            StoreConfig::from_file(file.path()),
            Err(CliError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_or_default_falls_back() {
        let file = write_config("[store]\ncurrency_code = \"dollars\"\n");
        let config = StoreConfig::load_or_default(Some(file.path().to_path_buf()));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StoreConfig::default();

        config.store.currency_code = "usd".to_string();
        assert!(config.validate().is_err());

        config.store.currency_code = "USD".to_string();
        config.shipping = Some(ShippingSettings {
            mode: ShippingMode::FreeOverAmount,
            flat_cost_cents: 1000,
            free_threshold_cents: None,
        });
        assert!(matches!(config.validate(), Err(CliError::Validation(_))));

        config.shipping = None;
        config.tax = Some(TaxSettings {
            rate_bps: 20_000,
            base: TaxBase::Subtotal,
        });
        assert!(config.validate().is_err());

        config.tax = None;
        config.loyalty = Some(LoyaltyConfig {
            tier_span: 0,
            ..LoyaltyConfig::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides_take_priority() {
        let file = write_config(SAMPLE);
        let mut config = StoreConfig::from_file(file.path()).unwrap();
        config.apply_overrides(env(&[
            ("CHECKOUT_CURRENCY_SYMBOL", "EUR "),
            ("CHECKOUT_TAX_RATE", "8.25"),
            ("CHECKOUT_SHIPPING_MODE", "flat"),
            ("CHECKOUT_FLAT_SHIPPING", "12.50"),
        ]));

        assert_eq!(config.store.currency_symbol, "EUR ");
        assert_eq!(config.tax.unwrap().rate_bps, 825);
        let shipping = config.shipping.unwrap();
        assert_eq!(shipping.mode, ShippingMode::Flat);
        assert_eq!(shipping.flat_cost_cents, 1250);
        assert_eq!(shipping.free_threshold_cents, Some(50000));
    }

    #[test]
    fn test_overrides_create_missing_sections() {
        let mut config = StoreConfig::default();
        config.apply_overrides(env(&[
            ("CHECKOUT_SHIPPING_MODE", "free_over_amount"),
            ("CHECKOUT_FLAT_SHIPPING", "10"),
            ("CHECKOUT_FREE_SHIPPING_THRESHOLD", "500.00"),
        ]));

        let settings = config.to_settings().unwrap();
        assert_eq!(
            settings.shipping,
            Some(ShippingPolicy::FreeOverAmount {
                flat_cost: Money::from_cents(1000),
                threshold: Money::from_cents(50000),
            })
        );
        assert!(settings.tax.is_none());
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = StoreConfig::default();
        config.apply_overrides(env(&[
            ("CHECKOUT_TAX_RATE", "eight"),
            ("CHECKOUT_SHIPPING_MODE", "teleport"),
            ("CHECKOUT_FLAT_SHIPPING", "a lot"),
        ]));
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let file = write_config(SAMPLE);
        let config = StoreConfig::from_file(file.path()).unwrap();
        let rendered = config.to_toml().unwrap();
        assert!(rendered.contains("[store]"));
        assert!(rendered.contains("[shipping]"));

        let reparsed: StoreConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(reparsed, config);
    }
}
