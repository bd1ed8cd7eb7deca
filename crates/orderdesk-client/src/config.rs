//! # OrderDesk Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     ORDERDESK_API_URL=https://orders.example.com                        │
//! │     ORDERDESK_DELIVERY_FEE=15                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                    │
//! │     ~/.config/orderdesk/orderdesk.toml (Linux)                          │
//! │     ~/Library/Application Support/com.orderdesk.orderdesk/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     http://localhost:3131, quantity 1..=9, delivery fee 20              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # orderdesk.toml
//! [api]
//! base_url = "http://localhost:3131"
//! product_path = "product"
//! order_path = "order"
//! timeout_secs = 10
//!
//! [quantity]
//! min = 1
//! max = 9
//! default = 1
//!
//! [cart]
//! delivery_fee = 20
//!
//! [checkout]
//! clear_cart_on_success = false
//! ```

use std::path::PathBuf;

use orderdesk_core::{CartSettings, Money, OrderSettings, QuantitySettings};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the catalog and order endpoints live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Backend base URL, without a trailing path.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the catalog collection.
    #[serde(default = "default_product_path")]
    pub product_path: String,

    /// Path orders are posted to.
    #[serde(default = "default_order_path")]
    pub order_path: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:3131".to_string()
}

fn default_product_path() -> String {
    "product".to_string()
}

fn default_order_path() -> String {
    "order".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            product_path: default_product_path(),
            order_path: default_order_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn product_url(&self) -> String {
        join_url(&self.base_url, &self.product_path)
    }

    pub fn order_url(&self) -> String {
        join_url(&self.base_url, &self.order_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// =============================================================================
// Checkout Settings
// =============================================================================

/// What happens after a successful submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSettings {
    /// Empty the cart once the backend accepts the order.
    #[serde(default)]
    pub clear_cart_on_success: bool,
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete OrderDesk configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDeskConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub quantity: QuantitySettings,

    #[serde(default)]
    pub cart: CartSettings,

    #[serde(default)]
    pub checkout: CheckoutSettings,
}

impl OrderDeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (orderdesk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::from_file(config_path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let Some(path) = config_path.or_else(Self::default_config_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        info!(?path, "Loading config from file");
        let contents = std::fs::read_to_string(&path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.product_path.trim().is_empty() || self.api.order_path.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "product_path and order_path must not be empty".into(),
            ));
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        self.order_settings()
            .validate()
            .map_err(|e| ClientError::InvalidConfig(e.to_string()))
    }

    /// The settings the ordering engine needs.
    pub fn order_settings(&self) -> OrderSettings {
        OrderSettings {
            quantity: self.quantity,
            cart: self.cart,
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any `ORDERDESK_*` lookup. Unparseable numbers
    /// are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ORDERDESK_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(path) = lookup("ORDERDESK_PRODUCT_PATH") {
            self.api.product_path = path;
        }

        if let Some(path) = lookup("ORDERDESK_ORDER_PATH") {
            self.api.order_path = path;
        }

        if let Some(secs) = parse_var(&lookup, "ORDERDESK_TIMEOUT_SECS") {
            self.api.timeout_secs = secs;
        }

        if let Some(fee) = parse_var::<i64, _>(&lookup, "ORDERDESK_DELIVERY_FEE") {
            debug!(fee, "Overriding delivery fee from environment");
            self.cart.delivery_fee = Money::new(fee);
        }

        if let Some(min) = parse_var(&lookup, "ORDERDESK_QUANTITY_MIN") {
            self.quantity.min = min;
        }

        if let Some(max) = parse_var(&lookup, "ORDERDESK_QUANTITY_MAX") {
            self.quantity.max = max;
        }

        if let Some(default) = parse_var(&lookup, "ORDERDESK_QUANTITY_DEFAULT") {
            self.quantity.default = default;
        }

        if let Some(clear) = lookup("ORDERDESK_CLEAR_CART_ON_SUCCESS") {
            match clear.to_lowercase().as_str() {
                "1" | "true" | "yes" => self.checkout.clear_cart_on_success = true,
                "0" | "false" | "no" => self.checkout.clear_cart_on_success = false,
                _ => warn!(value = %clear, "Unknown ORDERDESK_CLEAR_CART_ON_SUCCESS value"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "orderdesk", "orderdesk")
            .map(|dirs| dirs.config_dir().join("orderdesk.toml"))
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparseable environment override");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = OrderDeskConfig::default();
        assert_eq!(config.api.product_url(), "http://localhost:3131/product");
        assert_eq!(config.api.order_url(), "http://localhost:3131/order");
        assert_eq!(config.quantity, QuantitySettings::default());
        assert_eq!(config.cart.delivery_fee, Money::new(20));
        assert!(!config.checkout.clear_cart_on_success);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = OrderDeskConfig::default();

        config.api.base_url = "ftp://menu".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        config.api.base_url = "https://orders.example.com/".into();
        assert!(config.validate().is_ok());
        assert_eq!(config.api.order_url(), "https://orders.example.com/order");

        config.quantity.min = 5;
        config.quantity.max = 3;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = OrderDeskConfig::default();
        config.apply_overrides(lookup(&[
            ("ORDERDESK_API_URL", "https://orders.example.com"),
            ("ORDERDESK_ORDER_PATH", "orders"),
            ("ORDERDESK_DELIVERY_FEE", "15"),
            ("ORDERDESK_QUANTITY_MAX", "20"),
            ("ORDERDESK_CLEAR_CART_ON_SUCCESS", "true"),
        ]));

        assert_eq!(config.api.order_url(), "https://orders.example.com/orders");
        assert_eq!(config.cart.delivery_fee, Money::new(15));
        assert_eq!(config.quantity.max, 20);
        assert!(config.checkout.clear_cart_on_success);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = OrderDeskConfig::default();
        config.apply_overrides(lookup(&[
            ("ORDERDESK_TIMEOUT_SECS", "soon"),
            ("ORDERDESK_CLEAR_CART_ON_SUCCESS", "maybe"),
        ]));
        assert_eq!(config, OrderDeskConfig::default());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: OrderDeskConfig = toml::from_str(
            r#"
            [cart]
            delivery_fee = 0

            [checkout]
            clear_cart_on_success = true
            "#,
        )
        .unwrap();

        assert_eq!(config.cart.delivery_fee, Money::zero());
        assert_eq!(config.api, ApiSettings::default());
        assert_eq!(config.quantity.max, 9);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("orderdesk.toml");

        let mut config = OrderDeskConfig::default();
        config.cart.delivery_fee = Money::new(12);
        config.save(Some(path.clone())).unwrap();

        let loaded = OrderDeskConfig::from_file(Some(path)).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orderdesk.toml");
        std::fs::write(&path, "[quantity]\nmax = 5000\n").unwrap();

        assert!(matches!(
            OrderDeskConfig::load(Some(path)),
            Err(ClientError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = OrderDeskConfig::from_file(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(loaded, OrderDeskConfig::default());
    }
}
