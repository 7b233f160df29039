//! Exchange abstraction, configuration, and the named-constructor registry.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::GeminiError;
use crate::rate_limit::{ApiClass, RateLimit, RateLimitConfig};
use crate::rest::GeminiRestClient;

/// A trading pair, normalized across exchanges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingPair {
    /// Trading pair symbol
    pub symbol: String,
    /// Base asset
    pub base_asset: String,
    /// Quote asset
    pub quote_asset: String,
    /// Trading status
    pub status: String,
    /// Minimum order quantity
    pub min_qty: Decimal,
    /// Maximum order quantity, zero when the exchange does not report one
    pub max_qty: Decimal,
    /// Quantity step size, zero when not reported
    pub step_size: Decimal,
    /// Price tick size
    pub tick_size: Decimal,
}

/// Configuration options recognized by exchange constructors.
#[derive(Default)]
pub struct ExchangeConfig {
    /// API key
    pub api_key: Option<String>,
    /// API secret
    pub api_secret: Option<String>,
    /// Base URL override
    pub base_url: Option<String>,
    /// Request timeout
    pub timeout: Option<Duration>,
    /// Per-class rate limits
    pub rate_limit: RateLimitConfig,
    /// Custom default headers
    pub headers: HashMap<String, String>,
    /// Egress proxy list
    pub proxies: Vec<String>,
    /// Target the sandbox environment
    pub sandbox: bool,
    /// Custom HTTP client
    pub http_client: Option<reqwest::Client>,
}

impl std::fmt::Debug for ExchangeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExchangeConfig")
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("sandbox", &self.sandbox)
            .field("proxies", &self.proxies.len())
            .finish()
    }
}

/// Trait abstracting a cryptocurrency exchange client.
pub trait Exchange: Send + Sync {
    /// The exchange name.
    fn name(&self) -> &'static str;

    /// Fetch all trading pairs.
    fn trading_pairs(&self)
    -> impl Future<Output = Result<Vec<TradingPair>, GeminiError>> + Send;

    /// Replace the rate limit for one API class.
    fn set_rate_limit(&self, api_class: ApiClass, limit: RateLimit);

    /// Merge custom default request headers.
    fn set_headers(&self, headers: &HashMap<String, String>) -> Result<(), GeminiError>;

    /// Replace the egress proxy list.
    fn set_proxies(&self, proxies: &[String]) -> Result<(), GeminiError>;
}

impl Exchange for GeminiRestClient {
    fn name(&self) -> &'static str {
        GeminiRestClient::name(self)
    }

    fn trading_pairs(
        &self,
    ) -> impl Future<Output = Result<Vec<TradingPair>, GeminiError>> + Send {
        GeminiRestClient::trading_pairs(self)
    }

    fn set_rate_limit(&self, api_class: ApiClass, limit: RateLimit) {
        GeminiRestClient::set_rate_limit(self, api_class, limit);
    }

    fn set_headers(&self, headers: &HashMap<String, String>) -> Result<(), GeminiError> {
        GeminiRestClient::set_headers(self, headers)
    }

    fn set_proxies(&self, proxies: &[String]) -> Result<(), GeminiError> {
        GeminiRestClient::set_proxies(self, proxies)
    }
}

/// A client for any registered exchange.
///
/// Async trait methods are not object-safe, so the registry hands out this
/// enum instead of a boxed trait object.
#[derive(Debug, Clone)]
pub enum AnyExchange {
    /// The Gemini exchange
    Gemini(GeminiRestClient),
}

impl Exchange for AnyExchange {
    fn name(&self) -> &'static str {
        match self {
            AnyExchange::Gemini(client) => Exchange::name(client),
        }
    }

    fn trading_pairs(
        &self,
    ) -> impl Future<Output = Result<Vec<TradingPair>, GeminiError>> + Send {
        async move {
            match self {
                AnyExchange::Gemini(client) => client.trading_pairs().await,
            }
        }
    }

    fn set_rate_limit(&self, api_class: ApiClass, limit: RateLimit) {
        match self {
            AnyExchange::Gemini(client) => Exchange::set_rate_limit(client, api_class, limit),
        }
    }

    fn set_headers(&self, headers: &HashMap<String, String>) -> Result<(), GeminiError> {
        match self {
            AnyExchange::Gemini(client) => Exchange::set_headers(client, headers),
        }
    }

    fn set_proxies(&self, proxies: &[String]) -> Result<(), GeminiError> {
        match self {
            AnyExchange::Gemini(client) => Exchange::set_proxies(client, proxies),
        }
    }
}

/// Constructor function registered for an exchange name.
pub type Constructor = fn(ExchangeConfig) -> Result<AnyExchange, GeminiError>;

/// Registry mapping lowercased exchange names to constructors.
///
/// # Example
///
/// ```rust
/// use gemini_api_client::exchange::{Exchange, ExchangeConfig, ExchangeRegistry};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let registry = ExchangeRegistry::default();
/// let exchange = registry.create("Gemini", ExchangeConfig::default())?;
/// assert_eq!(exchange.name(), "gemini");
/// # Ok(())
/// # }
/// ```
pub struct ExchangeRegistry {
    constructors: HashMap<String, Constructor>,
}

impl ExchangeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under a (case-insensitive) name.
    pub fn register(&mut self, name: &str, constructor: Constructor) {
        self.constructors.insert(name.to_lowercase(), constructor);
    }

    /// Create an exchange instance by name, case-insensitively.
    pub fn create(&self, name: &str, config: ExchangeConfig) -> Result<AnyExchange, GeminiError> {
        let constructor = self
            .constructors
            .get(&name.to_lowercase())
            .ok_or_else(|| GeminiError::UnsupportedExchange(name.to_string()))?;
        constructor(config)
    }

    /// Names of all registered exchanges.
    pub fn supported_exchanges(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }
}

impl Default for ExchangeRegistry {
    /// A registry with all built-in exchanges registered.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("gemini", |config| {
            Ok(AnyExchange::Gemini(GeminiRestClient::from_config(config)?))
        });
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_is_case_insensitive() {
        let registry = ExchangeRegistry::default();

        let exchange = registry.create("GEMINI", ExchangeConfig::default()).unwrap();
        assert_eq!(exchange.name(), "gemini");
    }

    #[test]
    fn test_registry_rejects_unknown_exchange() {
        let registry = ExchangeRegistry::default();

        let err = registry
            .create("binance", ExchangeConfig::default())
            .unwrap_err();
        assert!(matches!(err, GeminiError::UnsupportedExchange(name) if name == "binance"));
    }

    #[test]
    fn test_registry_lists_supported_exchanges() {
        let registry = ExchangeRegistry::default();
        assert_eq!(registry.supported_exchanges(), vec!["gemini".to_string()]);
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let config = ExchangeConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("super_secret".to_string()),
            ..ExchangeConfig::default()
        };
        let debug_str = format!("{:?}", config);
        assert!(!debug_str.contains("super_secret"));
        assert!(debug_str.contains("[REDACTED]"));
    }

    #[test]
    fn test_config_drives_client_construction() {
        let config = ExchangeConfig {
            api_key: Some("key".to_string()),
            api_secret: Some("secret".to_string()),
            sandbox: true,
            ..ExchangeConfig::default()
        };
        let AnyExchange::Gemini(client) = ExchangeRegistry::default()
            .create("gemini", config)
            .unwrap();
        assert!(client.sandbox());
    }
}
