//! Authentication module for the Gemini API.
//!
//! This module provides:
//! - Credential management with secure secret storage
//! - Nonce generation for replay attack prevention
//! - HMAC-SHA384 signing of the base64 payload envelope

mod credentials;
mod nonce;
mod signature;

pub use credentials::Credentials;
pub use nonce::{IncreasingNonce, NonceProvider};
pub use signature::{SignedRequest, auth_headers, sign_request};
