//! Shared HTTP transport with rate limiting and proxy support.
//!
//! [`Transport`] wraps a [`reqwest::Client`] and owns the mutable pieces of
//! request dispatch: default headers, the egress proxy pool, and the
//! per-API-class rate limiters. All of it sits behind a single reader/writer
//! lock so in-flight requests snapshot a consistent view while
//! [`set_headers`](Transport::set_headers) /
//! [`set_proxies`](Transport::set_proxies) /
//! [`set_rate_limit`](Transport::set_rate_limit) swap state atomically.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use rand::Rng;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Proxy, StatusCode};
use tokio::time::Instant;
use tracing::{debug, error};

use crate::error::GeminiError;
use crate::rate_limit::{ApiClass, RateLimit, TokenBucket};

/// Fixed connect timeout for proxied connections, distinct from the overall
/// request timeout.
const PROXY_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client wrapper with per-class rate limiting and rotating proxies.
///
/// Cheap to share: callers typically hold it in an `Arc` and issue requests
/// from many tasks concurrently. Blocking happens only while waiting for a
/// rate-limit token and during the network call itself, both bounded by the
/// configured request timeout.
pub struct Transport {
    timeout: Duration,
    direct: Client,
    state: RwLock<TransportState>,
}

struct TransportState {
    headers: HeaderMap,
    proxies: Arc<[ProxyClient]>,
    public_limiter: Option<Arc<TokenBucket>>,
    private_limiter: Option<Arc<TokenBucket>>,
}

/// A proxy endpoint with its prebuilt client.
///
/// reqwest pins the proxy at client construction, so the pool holds one
/// client per endpoint and the per-request pick selects among them.
struct ProxyClient {
    url: String,
    client: Client,
}

impl Transport {
    /// Create a transport with the given request timeout, dispatching
    /// directly (no proxies, no rate limits).
    pub fn new(timeout: Duration) -> Result<Self, GeminiError> {
        let direct = Client::builder().build()?;
        Ok(Self::with_client(direct, timeout))
    }

    /// Wrap a caller-provided HTTP client.
    ///
    /// The caller's client handles direct dispatch; proxied dispatch still
    /// goes through pool clients built by [`set_proxies`](Self::set_proxies).
    pub fn with_client(client: Client, timeout: Duration) -> Self {
        Self {
            timeout,
            direct: client,
            state: RwLock::new(TransportState {
                headers: HeaderMap::new(),
                proxies: Arc::from(Vec::new()),
                public_limiter: None,
                private_limiter: None,
            }),
        }
    }

    /// Merge custom default headers, last-write-wins on conflicting keys.
    pub fn set_headers(&self, headers: &HashMap<String, String>) -> Result<(), GeminiError> {
        // Parse outside the lock so a bad entry leaves state untouched.
        let mut parsed = Vec::with_capacity(headers.len());
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                GeminiError::InvalidInput(format!("invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                GeminiError::InvalidInput(format!("invalid header value for '{name}': {e}"))
            })?;
            parsed.push((header_name, header_value));
        }

        let mut state = self.state.write();
        for (name, value) in parsed {
            state.headers.insert(name, value);
        }
        Ok(())
    }

    /// Replace the proxy pool. An empty list means direct connection.
    pub fn set_proxies(&self, proxies: &[String]) -> Result<(), GeminiError> {
        let mut pool = Vec::with_capacity(proxies.len());
        for url in proxies {
            let proxy = Proxy::all(url.as_str()).map_err(|e| {
                GeminiError::InvalidInput(format!("invalid proxy '{url}': {e}"))
            })?;
            let client = Client::builder()
                .proxy(proxy)
                .connect_timeout(PROXY_CONNECT_TIMEOUT)
                .build()?;
            pool.push(ProxyClient {
                url: url.clone(),
                client,
            });
        }

        self.state.write().proxies = Arc::from(pool);
        Ok(())
    }

    /// Replace the rate limiter for an API class wholesale.
    pub fn set_rate_limit(&self, api_class: ApiClass, limit: RateLimit) {
        let bucket = Arc::new(TokenBucket::new(limit.requests, limit.interval));
        let mut state = self.state.write();
        match api_class {
            ApiClass::Public => state.public_limiter = Some(bucket),
            ApiClass::Private => state.private_limiter = Some(bucket),
        }
    }

    /// Send a GET request on the public rate budget.
    pub async fn get(&self, url: &str) -> Result<Vec<u8>, GeminiError> {
        self.request(Method::GET, url, None, ApiClass::Public).await
    }

    /// Send a request with the default headers only.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        api_class: ApiClass,
    ) -> Result<Vec<u8>, GeminiError> {
        self.request_with_headers(method, url, body, HeaderMap::new(), api_class)
            .await
    }

    /// Send a request with caller-supplied headers that take precedence over
    /// the defaults on key collision.
    ///
    /// Returns the raw response body; deserialization is the caller's
    /// responsibility. A non-200 status is reported as
    /// [`GeminiError::Status`] carrying the body as diagnostic detail.
    pub async fn request_with_headers(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        overrides: HeaderMap,
        api_class: ApiClass,
    ) -> Result<Vec<u8>, GeminiError> {
        debug!(%method, url, %api_class, "sending HTTP request");

        let limiter = {
            let state = self.state.read();
            match api_class {
                ApiClass::Public => state.public_limiter.clone(),
                ApiClass::Private => state.private_limiter.clone(),
            }
        };
        if let Some(limiter) = limiter {
            if !limiter.acquire_timeout(self.timeout).await {
                error!(url, %api_class, "rate limit wait exceeded");
                return Err(GeminiError::RateLimit {
                    waited: self.timeout,
                });
            }
        }

        // Snapshot shared config; in-flight requests never observe a partial
        // header map or proxy list.
        let (mut headers, proxies) = {
            let state = self.state.read();
            (state.headers.clone(), Arc::clone(&state.proxies))
        };
        for (name, value) in overrides.iter() {
            headers.insert(name.clone(), value.clone());
        }
        if body.is_some() && !headers.contains_key(CONTENT_TYPE) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }

        let client = if proxies.is_empty() {
            &self.direct
        } else {
            let picked = &proxies[rand::thread_rng().gen_range(0..proxies.len())];
            debug!(proxy = %picked.url, "dialing through proxy");
            &picked.client
        };

        let mut request = client
            .request(method, url)
            .headers(headers)
            .timeout(self.timeout);
        if let Some(body) = body {
            request = request.body(body);
        }

        let start = Instant::now();
        let response = request.send().await.map_err(|e| {
            error!(url, error = %e, "request failed");
            if e.is_timeout() {
                GeminiError::Timeout(e)
            } else {
                GeminiError::Http(e)
            }
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| {
            error!(url, error = %e, "failed to read response body");
            if e.is_timeout() {
                GeminiError::Timeout(e)
            } else {
                GeminiError::Http(e)
            }
        })?;
        let duration = start.elapsed();

        debug!(status = status.as_u16(), ?duration, "received HTTP response");

        if status != StatusCode::OK {
            let body = String::from_utf8_lossy(&bytes).into_owned();
            error!(status = status.as_u16(), body, "HTTP error response");
            return Err(GeminiError::Status { status, body });
        }

        debug!(body_size = bytes.len(), "request completed successfully");
        Ok(bytes.to_vec())
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("Transport")
            .field("timeout", &self.timeout)
            .field("proxies", &state.proxies.len())
            .field("public_limited", &state.public_limiter.is_some())
            .field("private_limited", &state.private_limiter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> Transport {
        Transport::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_set_headers_rejects_invalid_names() {
        let transport = transport();
        let mut headers = HashMap::new();
        headers.insert("bad header\n".to_string(), "value".to_string());

        let err = transport.set_headers(&headers).unwrap_err();
        assert!(matches!(err, GeminiError::InvalidInput(_)));
    }

    #[test]
    fn test_set_headers_merges_last_write_wins() {
        let transport = transport();
        let mut first = HashMap::new();
        first.insert("X-Custom".to_string(), "one".to_string());
        first.insert("X-Keep".to_string(), "kept".to_string());
        transport.set_headers(&first).unwrap();

        let mut second = HashMap::new();
        second.insert("X-Custom".to_string(), "two".to_string());
        transport.set_headers(&second).unwrap();

        let state = transport.state.read();
        assert_eq!(state.headers.get("X-Custom").unwrap(), "two");
        assert_eq!(state.headers.get("X-Keep").unwrap(), "kept");
    }

    #[test]
    fn test_set_proxies_rejects_invalid_urls() {
        let transport = transport();
        let err = transport
            .set_proxies(&["not a proxy url".to_string()])
            .unwrap_err();
        assert!(matches!(err, GeminiError::InvalidInput(_)));
    }

    #[test]
    fn test_set_proxies_replaces_pool_wholesale() {
        let transport = transport();
        transport
            .set_proxies(&[
                "http://127.0.0.1:8080".to_string(),
                "http://127.0.0.1:8081".to_string(),
            ])
            .unwrap();
        assert_eq!(transport.state.read().proxies.len(), 2);

        transport.set_proxies(&[]).unwrap();
        assert!(transport.state.read().proxies.is_empty());
    }

    #[test]
    fn test_set_rate_limit_replaces_bucket() {
        let transport = transport();
        transport.set_rate_limit(ApiClass::Public, RateLimit::per_minute(120));
        transport.set_rate_limit(ApiClass::Public, RateLimit::new(1, Duration::from_secs(1)));

        let state = transport.state.read();
        assert_eq!(state.public_limiter.as_ref().unwrap().capacity(), 1);
        assert!(state.private_limiter.is_none());
    }
}
