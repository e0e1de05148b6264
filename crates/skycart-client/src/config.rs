//! # Storefront Configuration
//!
//! Configuration management for the storefront client.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     SKYCART_PRODUCTS_URL=http://localhost:3000                         │
//! │     SKYCART_CURRENCY=EUR                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/skycart/storefront.toml (Linux)                          │
//! │     ~/Library/Application Support/com.skycart.storefront/... (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     public demo products API, Frankfurter rates, USD, Retail, seat A1  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # storefront.toml
//! [api]
//! products_url = "https://my-json-server.typicode.com/bsibecas/products-api"
//! rates_url = "https://api.frankfurter.app/latest?from=EUR&to=USD,GBP"
//! timeout_secs = 10
//!
//! [session]
//! currency = "USD"
//! customer_type = "Retail"
//! seat = "A1"
//! ```

use serde::{Deserialize, Serialize};
use skycart_core::{Currency, CustomerType, Seat};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{ClientError, ClientResult};

/// Default products API (json-server style).
pub const DEFAULT_PRODUCTS_URL: &str = "https://my-json-server.typicode.com/bsibecas/products-api";

/// Default FX endpoint: latest EUR → USD, GBP.
pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app/latest?from=EUR&to=USD,GBP";

// =============================================================================
// API Settings
// =============================================================================

/// Remote endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the products API; `/products` is appended.
    #[serde(default = "default_products_url")]
    pub products_url: String,

    /// Full URL of the latest-rates endpoint.
    #[serde(default = "default_rates_url")]
    pub rates_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_products_url() -> String {
    DEFAULT_PRODUCTS_URL.to_string()
}

fn default_rates_url() -> String {
    DEFAULT_RATES_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            products_url: default_products_url(),
            rates_url: default_rates_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ApiSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// =============================================================================
// Session Settings
// =============================================================================

/// What a fresh session starts with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_currency")]
    pub currency: Currency,

    /// Customer-type label; unknown labels price as Retail.
    #[serde(default)]
    pub customer_type: CustomerType,

    #[serde(default)]
    pub seat: Seat,
}

fn default_currency() -> Currency {
    Currency::Usd
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            currency: default_currency(),
            customer_type: CustomerType::Retail,
            seat: Seat::default(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete storefront configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl StorefrontConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (storefront.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading storefront config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load storefront config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        for url in [&self.api.products_url, &self.api.rates_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ClientError::InvalidUrl(format!(
                    "URL must start with http:// or https://, got: {}",
                    url
                )));
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SKYCART_PRODUCTS_URL") {
            debug!(url = %url, "Overriding products URL from environment");
            self.api.products_url = url;
        }

        if let Some(url) = lookup("SKYCART_RATES_URL") {
            debug!(url = %url, "Overriding rates URL from environment");
            self.api.rates_url = url;
        }

        if let Some(timeout) = lookup("SKYCART_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(t) => self.api.timeout_secs = t,
                Err(_) => warn!(value = %timeout, "Ignoring unparsable SKYCART_TIMEOUT_SECS"),
            }
        }

        if let Some(currency) = lookup("SKYCART_CURRENCY") {
            match currency.parse::<Currency>() {
                Ok(c) => self.session.currency = c,
                Err(e) => warn!(value = %currency, error = %e, "Ignoring SKYCART_CURRENCY"),
            }
        }

        if let Some(label) = lookup("SKYCART_CUSTOMER_TYPE") {
            self.session.customer_type = CustomerType::from_label(&label);
        }

        if let Some(seat) = lookup("SKYCART_SEAT") {
            match seat.parse::<Seat>() {
                Ok(s) => self.session.seat = s,
                Err(e) => warn!(value = %seat, error = %e, "Ignoring SKYCART_SEAT"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "skycart", "storefront")
            .map(|dirs| dirs.config_dir().join("storefront.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = StorefrontConfig::default();
        assert_eq!(config.api.products_url, DEFAULT_PRODUCTS_URL);
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.session.currency, Currency::Usd);
        assert_eq!(config.session.customer_type, CustomerType::Retail);
        assert_eq!(config.session.seat.to_string(), "A1");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = StorefrontConfig::default();
        config.api.products_url = "ftp://example.com".into();
        assert!(matches!(config.validate(), Err(ClientError::InvalidUrl(_))));

        let mut config = StorefrontConfig::default();
        config.api.timeout_secs = 0;
        assert!(matches!(config.validate(), Err(ClientError::InvalidConfig(_))));
    }

    #[test]
    fn test_toml_parsing() {
        let toml_str = r#"
            [api]
            products_url = "http://localhost:3000"
            timeout_secs = 3

            [session]
            currency = "GBP"
            customer_type = "Happy hour"
            seat = "c14"
        "#;
        let config: StorefrontConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api.products_url, "http://localhost:3000");
        assert_eq!(config.api.rates_url, DEFAULT_RATES_URL);
        assert_eq!(config.api.timeout_secs, 3);
        assert_eq!(config.session.currency, Currency::Gbp);
        assert_eq!(config.session.customer_type, CustomerType::HappyHour);
        assert_eq!(config.session.seat.to_string(), "C14");
    }

    #[test]
    fn test_toml_rejects_unknown_currency() {
        let toml_str = r#"
            [session]
            currency = "JPY"
        "#;
        assert!(toml::from_str::<StorefrontConfig>(toml_str).is_err());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SKYCART_PRODUCTS_URL", "http://127.0.0.1:9000"),
            ("SKYCART_TIMEOUT_SECS", "oops"),
            ("SKYCART_CURRENCY", "eur"),
            ("SKYCART_CUSTOMER_TYPE", "Crew"),
            ("SKYCART_SEAT", "Q0"),
        ]
        .into_iter()
        .collect();

        let mut config = StorefrontConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.products_url, "http://127.0.0.1:9000");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.session.currency, Currency::Eur);
        assert_eq!(config.session.customer_type, CustomerType::Crew);
        assert_eq!(config.session.seat.to_string(), "A1");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!(
            "skycart-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[session]\ncurrency = \"EUR\"\n").unwrap();

        let config = StorefrontConfig::load(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.session.currency, Currency::Eur);
        assert_eq!(config.session.seat.to_string(), "A1");
    }

    #[test]
    fn test_load_rejects_broken_file() {
        let path = std::env::temp_dir().join(format!(
            "skycart-config-broken-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[api\nproducts_url = ").unwrap();

        let result = StorefrontConfig::load(Some(path.clone()));
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(ClientError::ConfigLoadFailed(_))));
    }
}
