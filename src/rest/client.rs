//! Gemini REST API client implementation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::auth::{Credentials, IncreasingNonce, NonceProvider, auth_headers, sign_request};
use crate::error::{ApiError, GeminiError};
use crate::exchange::ExchangeConfig;
use crate::rate_limit::{ApiClass, RateLimit, RateLimitConfig};
use crate::rest::endpoints::{GEMINI_BASE_URL, GEMINI_SANDBOX_URL, public};
use crate::transport::Transport;

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default public API rate limit: 120 requests per minute.
const DEFAULT_PUBLIC_LIMIT: u32 = 120;
/// Default private API rate limit: 600 requests per minute.
const DEFAULT_PRIVATE_LIMIT: u32 = 600;

/// The Gemini REST API client.
///
/// Composes the shared [`Transport`] (rate limiting, proxies, headers) with
/// the request signer behind per-domain operations: market data in
/// [`rest::public`](crate::rest::public), orders and funds in
/// [`rest::private`](crate::rest::private).
///
/// All session state (credentials, base URL, sandbox flag) is lock-protected,
/// so reconfiguring a client shared across tasks is safe while requests are
/// in flight.
///
/// # Example
///
/// ```rust,no_run
/// use gemini_api_client::rest::GeminiRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = GeminiRestClient::new()?;
///     let symbols = client.list_symbols().await?;
///     println!("{} symbols", symbols.len());
///     Ok(())
/// }
/// ```
///
/// For private endpoints, provide credentials:
///
/// ```rust,no_run
/// use gemini_api_client::rest::GeminiRestClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = GeminiRestClient::builder()
///         .credentials("api_key", "api_secret")
///         .build()?;
///
///     let balances = client.available_balances(None).await?;
///     println!("{} balances", balances.len());
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct GeminiRestClient {
    transport: Arc<Transport>,
    session: Arc<RwLock<Session>>,
    nonce_provider: Arc<dyn NonceProvider>,
}

struct Session {
    credentials: Option<Credentials>,
    base_url: String,
    sandbox: bool,
}

impl GeminiRestClient {
    /// Create a new client with default settings.
    ///
    /// This client can only access public endpoints. Use
    /// [`GeminiRestClient::builder()`] to configure credentials for private
    /// endpoints.
    pub fn new() -> Result<Self, GeminiError> {
        Self::builder().build()
    }

    /// Create a new client builder.
    pub fn builder() -> GeminiRestClientBuilder {
        GeminiRestClientBuilder::new()
    }

    /// Create a client from an [`ExchangeConfig`], the options recognized by
    /// the exchange registry.
    pub fn from_config(config: ExchangeConfig) -> Result<Self, GeminiError> {
        let mut builder = Self::builder()
            .sandbox(config.sandbox)
            .rate_limits(config.rate_limit)
            .default_headers(config.headers)
            .proxies(config.proxies);
        if let (Some(key), Some(secret)) = (config.api_key, config.api_secret) {
            builder = builder.credentials(key, secret);
        }
        if let Some(base_url) = config.base_url {
            builder = builder.base_url(base_url);
        }
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(client) = config.http_client {
            builder = builder.http_client(client);
        }
        builder.build()
    }

    /// The exchange name.
    pub fn name(&self) -> &'static str {
        "gemini"
    }

    /// The base URL requests are currently dispatched against.
    pub fn base_url(&self) -> String {
        self.session.read().base_url.clone()
    }

    /// Whether the client targets the sandbox environment.
    pub fn sandbox(&self) -> bool {
        self.session.read().sandbox
    }

    /// Replace both API credentials atomically.
    ///
    /// Safe to call while signed requests are in flight; each request
    /// snapshots the credentials once before signing.
    pub fn set_credentials(&self, api_key: impl Into<String>, api_secret: impl Into<String>) {
        self.session.write().credentials = Some(Credentials::new(api_key, api_secret));
    }

    /// Remove the stored credentials, disallowing private operations.
    pub fn clear_credentials(&self) {
        self.session.write().credentials = None;
    }

    /// Switch between the sandbox and production endpoint sets.
    ///
    /// Only the base URL changes; credentials, headers, proxies and rate
    /// limits are unaffected.
    pub fn set_sandbox(&self, sandbox: bool) {
        let mut session = self.session.write();
        session.sandbox = sandbox;
        session.base_url = if sandbox {
            GEMINI_SANDBOX_URL.to_string()
        } else {
            GEMINI_BASE_URL.to_string()
        };
    }

    /// Merge custom default request headers, last-write-wins per key.
    pub fn set_headers(&self, headers: &HashMap<String, String>) -> Result<(), GeminiError> {
        self.transport.set_headers(headers)
    }

    /// Replace the egress proxy list; empty means direct connection.
    pub fn set_proxies(&self, proxies: &[String]) -> Result<(), GeminiError> {
        self.transport.set_proxies(proxies)
    }

    /// Replace the rate limit for one API class.
    pub fn set_rate_limit(&self, api_class: ApiClass, limit: RateLimit) {
        self.transport.set_rate_limit(api_class, limit);
        info!(%api_class, requests = limit.requests, interval = ?limit.interval, "rate limit updated");
    }

    /// Validate the client configuration.
    ///
    /// Checks the base URL shape, then probes connectivity with a symbol
    /// listing request.
    pub async fn validate_config(&self) -> Result<(), GeminiError> {
        let base_url = self.base_url();
        if base_url.is_empty() {
            return Err(GeminiError::InvalidInput("base URL is required".to_string()));
        }
        let parsed = url::Url::parse(&base_url)?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(GeminiError::InvalidInput(
                "invalid base URL format".to_string(),
            ));
        }

        let url = format!("{}{}", base_url, public::SYMBOLS);
        self.transport.get(&url).await?;
        Ok(())
    }

    /// Make a public GET request and decode the response.
    pub(crate) async fn public_get<T>(&self, endpoint: &str) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url(), endpoint);
        let body = self.transport.get(&url).await?;
        Self::decode_response(&body)
    }

    /// Make an authenticated POST request and decode the response.
    ///
    /// The request data is signed into the `X-GEMINI-*` headers; the POST
    /// body stays empty per the exchange wire contract.
    pub(crate) async fn private_post<T, P>(&self, endpoint: &str, params: &P) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
        P: Serialize,
    {
        let (credentials, base_url) = {
            let session = self.session.read();
            (session.credentials.clone(), session.base_url.clone())
        };
        let credentials = credentials
            .filter(Credentials::is_complete)
            .ok_or(GeminiError::MissingCredentials)?;

        let nonce = self.nonce_provider.next_nonce();
        let signed = sign_request(&credentials, endpoint, nonce, params)?;
        let headers = auth_headers(&credentials.api_key, &signed)?;

        let url = format!("{base_url}{endpoint}");
        let body = self
            .transport
            .request_with_headers(Method::POST, &url, None, headers, ApiClass::Private)
            .await?;
        Self::decode_response(&body)
    }

    /// Decode a response body, surfacing the exchange error envelope first.
    ///
    /// Gemini can report application errors inside a 200 response, so this
    /// probe is independent of the transport-level status check and runs
    /// before any attempt to parse the success shape.
    pub(crate) fn decode_response<T>(body: &[u8]) -> Result<T, GeminiError>
    where
        T: DeserializeOwned,
    {
        if let Some(api_error) = ApiError::from_body(body) {
            return Err(GeminiError::Api(api_error));
        }
        Ok(serde_json::from_slice(body)?)
    }
}

impl std::fmt::Debug for GeminiRestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let session = self.session.read();
        f.debug_struct("GeminiRestClient")
            .field("base_url", &session.base_url)
            .field("sandbox", &session.sandbox)
            .field("has_credentials", &session.credentials.is_some())
            .finish()
    }
}

/// Builder for [`GeminiRestClient`].
pub struct GeminiRestClientBuilder {
    base_url: Option<String>,
    sandbox: bool,
    credentials: Option<Credentials>,
    nonce_provider: Option<Arc<dyn NonceProvider>>,
    user_agent: Option<String>,
    timeout: Duration,
    rate_limits: RateLimitConfig,
    headers: HashMap<String, String>,
    proxies: Vec<String>,
    http_client: Option<reqwest::Client>,
}

impl GeminiRestClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            base_url: None,
            sandbox: false,
            credentials: None,
            nonce_provider: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            rate_limits: RateLimitConfig::default(),
            headers: HashMap::new(),
            proxies: Vec::new(),
            http_client: None,
        }
    }

    /// Set the base URL (useful for testing with a mock server).
    ///
    /// Takes precedence over the sandbox flag.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Target the sandbox environment.
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }

    /// Set API credentials for private endpoints.
    pub fn credentials(mut self, api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        self.credentials = Some(Credentials::new(api_key, api_secret));
        self
    }

    /// Set a custom nonce provider.
    pub fn nonce_provider(mut self, provider: Arc<dyn NonceProvider>) -> Self {
        self.nonce_provider = Some(provider);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the request timeout (default 30 seconds).
    ///
    /// Also bounds how long a request will wait for a rate-limit token.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set per-class rate limits.
    ///
    /// Classes left unset fall back to the exchange defaults (public 120,
    /// private 600 requests per minute).
    pub fn rate_limits(mut self, limits: RateLimitConfig) -> Self {
        self.rate_limits = limits;
        self
    }

    /// Set default request headers, merged over the built-in defaults.
    pub fn default_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Set the egress proxy list.
    pub fn proxies(mut self, proxies: Vec<String>) -> Self {
        self.proxies = proxies;
        self
    }

    /// Use a caller-provided HTTP client for direct dispatch.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<GeminiRestClient, GeminiError> {
        let transport = match self.http_client {
            Some(client) => Transport::with_client(client, self.timeout),
            None => Transport::new(self.timeout)?,
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("gemini-api-client/{}", env!("CARGO_PKG_VERSION")));
        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Content-Type".to_string(), "application/json".to_string());
        // Caller-supplied defaults win over the built-ins.
        default_headers.extend(self.headers);
        transport.set_headers(&default_headers)?;

        if !self.proxies.is_empty() {
            transport.set_proxies(&self.proxies)?;
        }

        transport.set_rate_limit(
            ApiClass::Public,
            self.rate_limits
                .public
                .unwrap_or_else(|| RateLimit::per_minute(DEFAULT_PUBLIC_LIMIT)),
        );
        transport.set_rate_limit(
            ApiClass::Private,
            self.rate_limits
                .private
                .unwrap_or_else(|| RateLimit::per_minute(DEFAULT_PRIVATE_LIMIT)),
        );

        let base_url = match self.base_url {
            Some(url) => url,
            None if self.sandbox => GEMINI_SANDBOX_URL.to_string(),
            None => GEMINI_BASE_URL.to_string(),
        };

        let nonce_provider = self
            .nonce_provider
            .unwrap_or_else(|| Arc::new(IncreasingNonce::new()));

        let client = GeminiRestClient {
            transport: Arc::new(transport),
            session: Arc::new(RwLock::new(Session {
                credentials: self.credentials,
                base_url,
                sandbox: self.sandbox,
            })),
            nonce_provider,
        };

        info!(base_url = %client.base_url(), "Gemini client initialized");
        Ok(client)
    }
}

impl Default for GeminiRestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = GeminiRestClient::new().unwrap();
        assert_eq!(client.base_url(), GEMINI_BASE_URL);
        assert!(!client.sandbox());
        assert_eq!(client.name(), "gemini");
    }

    #[test]
    fn test_sandbox_builder_selects_sandbox_url() {
        let client = GeminiRestClient::builder().sandbox(true).build().unwrap();
        assert_eq!(client.base_url(), GEMINI_SANDBOX_URL);
        assert!(client.sandbox());
    }

    #[test]
    fn test_set_sandbox_switches_base_url_both_ways() {
        let client = GeminiRestClient::builder()
            .credentials("key", "secret")
            .build()
            .unwrap();

        client.set_sandbox(true);
        assert_eq!(client.base_url(), GEMINI_SANDBOX_URL);
        assert!(client.sandbox());

        client.set_sandbox(false);
        assert_eq!(client.base_url(), GEMINI_BASE_URL);
        assert!(!client.sandbox());

        // Credentials are untouched by the switch.
        assert!(client.session.read().credentials.is_some());
    }

    #[test]
    fn test_explicit_base_url_wins_over_sandbox_flag() {
        let client = GeminiRestClient::builder()
            .base_url("http://localhost:9999")
            .sandbox(true)
            .build()
            .unwrap();
        assert_eq!(client.base_url(), "http://localhost:9999");
    }

    #[test]
    fn test_debug_redacts_credentials() {
        let client = GeminiRestClient::builder()
            .credentials("visible_key", "hidden_secret")
            .build()
            .unwrap();
        let debug_str = format!("{:?}", client);
        assert!(debug_str.contains("has_credentials: true"));
        assert!(!debug_str.contains("hidden_secret"));
    }

    #[tokio::test]
    async fn test_validate_config_rejects_bad_base_url() {
        let client = GeminiRestClient::builder()
            .base_url("ftp://api.gemini.com")
            .build()
            .unwrap();
        let err = client.validate_config().await.unwrap_err();
        assert!(matches!(err, GeminiError::InvalidInput(_)));
    }
}
