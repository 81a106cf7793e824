//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP behavior settings
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Availability keyword markers
    #[serde(default)]
    pub markers: MarkerConfig,

    /// State file location
    #[serde(default)]
    pub storage: StorageConfig,

    /// Run log location
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Tracked product definitions
    #[serde(default)]
    pub products: Vec<ProductSpec>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.monitor.user_agent.trim().is_empty() {
            return Err(AppError::validation("monitor.user_agent is empty"));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(AppError::validation("monitor.timeout_secs must be > 0"));
        }
        if self.markers.in_stock.is_empty() {
            return Err(AppError::validation("markers.in_stock is empty"));
        }
        if self.markers.out_of_stock.is_empty() {
            return Err(AppError::validation("markers.out_of_stock is empty"));
        }
        if self.storage.state_file.trim().is_empty() {
            return Err(AppError::validation("storage.state_file is empty"));
        }
        if self.products.is_empty() {
            return Err(AppError::validation("No products defined"));
        }

        let mut names = HashSet::new();
        for product in &self.products {
            product.validate()?;
            if !names.insert(product.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Duplicate product name '{}'",
                    product.name
                )));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            monitor: MonitorConfig::default(),
            markers: MarkerConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            products: defaults::default_products(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Delay between product requests in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// Keyword markers scanned in page text to decide availability.
///
/// Out-of-stock markers win when both kinds appear in the same page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// Phrases indicating the product can be bought
    #[serde(default = "defaults::in_stock_markers")]
    pub in_stock: Vec<String>,

    /// Phrases indicating the product cannot be bought
    #[serde(default = "defaults::out_of_stock_markers")]
    pub out_of_stock: Vec<String>,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            in_stock: defaults::in_stock_markers(),
            out_of_stock: defaults::out_of_stock_markers(),
        }
    }
}

/// State persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the JSON state file
    #[serde(default = "defaults::state_file")]
    pub state_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            state_file: defaults::state_file(),
        }
    }
}

/// Run log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Path to the plain-text run log, appended each run
    #[serde(default = "defaults::run_log")]
    pub run_log: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            run_log: defaults::run_log(),
        }
    }
}

/// A tracked product definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSpec {
    /// Product display name, also the state-file key
    pub name: String,

    /// Product page URL
    pub url: String,

    /// CSS selector whose presence signals purchasability (e.g. a buy button)
    #[serde(default)]
    pub selector: Option<String>,

    /// CSS selector for the displayed price
    #[serde(default)]
    pub price_selector: Option<String>,
}

impl ProductSpec {
    /// Validate a single product definition.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("product name is empty"));
        }
        url::Url::parse(&self.url).map_err(|e| {
            AppError::validation(format!("product '{}' has invalid url: {}", self.name, e))
        })?;
        for selector in [&self.selector, &self.price_selector].into_iter().flatten() {
            scraper::Selector::parse(selector)
                .map_err(|e| AppError::selector(selector, format!("{e:?}")))?;
        }
        Ok(())
    }
}

mod defaults {
    use super::ProductSpec;

    // Monitor defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn request_delay() -> u64 {
        2000
    }

    // Marker defaults
    pub fn in_stock_markers() -> Vec<String> {
        vec![
            "add to cart".into(),
            "buy now".into(),
            "in stock".into(),
            "available".into(),
        ]
    }
    pub fn out_of_stock_markers() -> Vec<String> {
        vec![
            "out of stock".into(),
            "sold out".into(),
            "unavailable".into(),
            "notify when available".into(),
            "coming soon".into(),
        ]
    }

    // Storage defaults
    pub fn state_file() -> String {
        "stock_state.json".into()
    }

    // Logging defaults
    pub fn run_log() -> String {
        "stock_monitor.log".into()
    }

    // Product defaults
    pub fn default_products() -> Vec<ProductSpec> {
        vec![
            ProductSpec {
                name: "Amul Butter 500g".to_string(),
                url: "https://www.amul.com/products/butter-500g".to_string(),
                selector: Some(".add-to-cart".to_string()),
                price_selector: Some(".price".to_string()),
            },
            ProductSpec {
                name: "Amul Milk Powder".to_string(),
                url: "https://www.amul.com/products/milk-powder".to_string(),
                selector: Some(".add-to-cart".to_string()),
                price_selector: Some(".price".to_string()),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_default_config_ok() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_user_agent() {
        let mut config = Config::default();
        config.monitor.user_agent = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = Config::default();
        config.monitor.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_products() {
        let mut config = Config::default();
        config.products.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_duplicate_names() {
        let mut config = Config::default();
        let dup = config.products[0].clone();
        config.products.push(dup);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_url() {
        let mut config = Config::default();
        config.products[0].url = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_invalid_selector() {
        let mut config = Config::default();
        config.products[0].selector = Some("[[broken".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn config_roundtrip_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.products.len(), config.products.len());
        assert_eq!(parsed.monitor.timeout_secs, config.monitor.timeout_secs);
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [[products]]
            name = "Widget"
            url = "https://example.com/widget"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.monitor.timeout_secs, 30);
        assert!(!parsed.markers.out_of_stock.is_empty());
        assert_eq!(parsed.products.len(), 1);
        assert!(parsed.products[0].selector.is_none());
    }
}
