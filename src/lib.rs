//! # Gemini Client
//!
//! An async Rust client library for the Gemini exchange REST API.
//!
//! ## Features
//!
//! - Full REST API support for market data, orders, and fund management
//! - Token-bucket rate limiting with independent public/private budgets
//! - HMAC-SHA384 request signing with Gemini's header-payload wire format
//! - Rotating egress proxies and reconfigurable headers, safe under
//!   concurrent use
//! - Strong typing for all request/response types
//! - Financial precision with `rust_decimal`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_api_client::rest::GeminiRestClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiRestClient::new()?;
//!     let ticker = client.ticker("btcusd").await?;
//!     println!("BTC/USD bid: {}", ticker.bid);
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod error;
pub mod exchange;
pub mod rate_limit;
pub mod rest;
pub mod transport;
pub mod types;

// Re-export commonly used types at crate root
pub use error::{ApiError, GeminiError};
pub use types::common::{OrderSide, OrderStatus, OrderType};

/// Result type alias using GeminiError
pub type Result<T> = std::result::Result<T, GeminiError>;
