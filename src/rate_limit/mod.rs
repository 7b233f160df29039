//! Rate limiting for outbound Gemini API traffic.
//!
//! Public and private endpoints carry independent rate budgets, so the
//! transport keeps one [`TokenBucket`] per [`ApiClass`]. Buckets refill
//! lazily on access and never exceed their configured capacity.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use gemini_api_client::rate_limit::TokenBucket;
//!
//! # tokio_test::block_on(async {
//! let bucket = TokenBucket::new(120, Duration::from_secs(60));
//! assert!(bucket.try_acquire());
//! # });
//! ```

mod token_bucket;

pub use token_bucket::TokenBucket;

use std::time::Duration;

/// The type of API endpoint a request targets.
///
/// Public (unauthenticated) and private (authenticated) traffic are throttled
/// independently and never serialized against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiClass {
    /// Unauthenticated market-data endpoints
    Public,
    /// Authenticated order/fund endpoints
    Private,
}

impl std::fmt::Display for ApiClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiClass::Public => write!(f, "public"),
            ApiClass::Private => write!(f, "private"),
        }
    }
}

/// Rate limit configuration for one API class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Number of requests allowed per interval
    pub requests: u32,
    /// Refill interval
    pub interval: Duration,
}

impl RateLimit {
    /// Create a new rate limit of `requests` per `interval`.
    pub fn new(requests: u32, interval: Duration) -> Self {
        Self { requests, interval }
    }

    /// Convenience constructor for per-minute limits.
    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }
}

/// Per-class rate limit configuration.
///
/// `None` for a class means the client default applies at construction time;
/// an explicitly configured limit replaces it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RateLimitConfig {
    /// Limit for public endpoints
    pub public: Option<RateLimit>,
    /// Limit for private endpoints
    pub private: Option<RateLimit>,
}
