//! HMAC-SHA384 signature generation for Gemini API authentication.
//!
//! Gemini private endpoints take an empty POST body; the request data
//! travels in headers instead:
//! ```text
//! payload   = base64(json({"request": path, "nonce": nanos, ...fields}))
//! signature = hex(HMAC-SHA384(payload, api_secret))
//! ```
//! The signature is computed over the base64 string, never the raw JSON:
//! the exact bytes sent in `X-GEMINI-PAYLOAD` are the bytes that are signed,
//! so the serialized form must be deterministic within one call.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use hmac::{Hmac, Mac};
use reqwest::header::{
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue,
};
use serde::Serialize;
use sha2::Sha384;

use crate::auth::Credentials;
use crate::error::GeminiError;

type HmacSha384 = Hmac<Sha384>;

/// Header carrying the API key.
pub const HEADER_API_KEY: HeaderName = HeaderName::from_static("x-gemini-apikey");
/// Header carrying the base64 payload.
pub const HEADER_PAYLOAD: HeaderName = HeaderName::from_static("x-gemini-payload");
/// Header carrying the hex HMAC-SHA384 signature.
pub const HEADER_SIGNATURE: HeaderName = HeaderName::from_static("x-gemini-signature");

/// A signed request envelope, ready to be placed into headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Base64 encoding of the JSON envelope; transmitted verbatim in
    /// `X-GEMINI-PAYLOAD` and the exact input to the signature
    pub payload: String,
    /// Lowercase hex HMAC-SHA384 digest of `payload`
    pub signature: String,
}

/// The signed envelope: the endpoint path doubles as a signed field, and the
/// nonce travels inside the payload rather than as a header.
#[derive(Serialize)]
struct Envelope<'a, P: Serialize> {
    request: &'a str,
    nonce: String,
    #[serde(flatten)]
    fields: &'a P,
}

/// Sign a private API request.
///
/// Stamps `request` (the endpoint path) and `nonce` (decimal nanoseconds)
/// into the field set, serializes to compact JSON, base64-encodes, and signs
/// the base64 string with HMAC-SHA384 keyed by the account secret.
///
/// # Errors
///
/// Fails only if JSON serialization of the field set fails.
///
/// # Example
///
/// ```rust
/// use gemini_api_client::auth::{Credentials, sign_request};
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Fields<'a> {
///     account: &'a str,
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let credentials = Credentials::new("api_key", "api_secret");
/// let signed = sign_request(&credentials, "/v1/balances", 1234567890, &Fields { account: "primary" })?;
/// assert_eq!(signed.signature.len(), 96); // SHA-384 digest, hex encoded
/// # Ok(())
/// # }
/// ```
pub fn sign_request<P: Serialize>(
    credentials: &Credentials,
    endpoint: &str,
    nonce: u64,
    fields: &P,
) -> Result<SignedRequest, GeminiError> {
    let envelope = Envelope {
        request: endpoint,
        nonce: nonce.to_string(),
        fields,
    };
    let json = serde_json::to_vec(&envelope)?;
    let payload = BASE64.encode(&json);

    // HMAC accepts keys of any length, so this cannot fail in practice.
    let mut mac = HmacSha384::new_from_slice(credentials.expose_secret().as_bytes())
        .map_err(|e| GeminiError::InvalidInput(format!("invalid HMAC key: {e}")))?;
    mac.update(payload.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    Ok(SignedRequest { payload, signature })
}

/// Build the header set for a private API call.
///
/// The payload travels in headers and the POST body stays empty; the
/// explicit `Content-Type: text/plain` and `Content-Length: 0` are part of
/// the exchange's wire contract.
pub fn auth_headers(api_key: &str, signed: &SignedRequest) -> Result<HeaderMap, GeminiError> {
    let value = |v: &str| {
        HeaderValue::from_str(v)
            .map_err(|e| GeminiError::InvalidInput(format!("invalid header value: {e}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(HEADER_API_KEY, value(api_key)?);
    headers.insert(HEADER_PAYLOAD, value(&signed.payload)?);
    headers.insert(HEADER_SIGNATURE, value(&signed.signature)?);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain"));
    headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct OrderFields<'a> {
        symbol: &'a str,
        amount: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        account: Option<&'a str>,
    }

    fn fields() -> OrderFields<'static> {
        OrderFields {
            symbol: "btcusd",
            amount: "0.5",
            account: None,
        }
    }

    #[test]
    fn test_signature_deterministic() {
        let creds = Credentials::new("key", "secret");

        let a = sign_request(&creds, "/v1/order/new", 12345, &fields()).unwrap();
        let b = sign_request(&creds, "/v1/order/new", 12345, &fields()).unwrap();

        assert_eq!(a.payload, b.payload);
        assert_eq!(a.signature, b.signature);
    }

    #[test]
    fn test_signature_changes_with_nonce() {
        let creds = Credentials::new("key", "secret");

        let a = sign_request(&creds, "/v1/order/new", 12345, &fields()).unwrap();
        let b = sign_request(&creds, "/v1/order/new", 12346, &fields()).unwrap();

        assert_ne!(a.payload, b.payload);
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_signature_changes_with_secret() {
        let a = sign_request(&Credentials::new("key", "s1"), "/v1/orders", 1, &fields()).unwrap();
        let b = sign_request(&Credentials::new("key", "s2"), "/v1/orders", 1, &fields()).unwrap();

        // Same payload, different key, different digest.
        assert_eq!(a.payload, b.payload);
        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_signature_changes_with_fields() {
        let creds = Credentials::new("key", "secret");
        let other = OrderFields {
            symbol: "ethusd",
            ..fields()
        };

        let a = sign_request(&creds, "/v1/order/new", 1, &fields()).unwrap();
        let b = sign_request(&creds, "/v1/order/new", 1, &other).unwrap();

        assert_ne!(a.signature, b.signature);
    }

    #[test]
    fn test_payload_round_trips_to_signed_json() {
        let creds = Credentials::new("key", "secret");
        let signed = sign_request(&creds, "/v1/order/new", 987, &fields()).unwrap();

        let decoded = BASE64.decode(&signed.payload).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&decoded).unwrap();

        assert_eq!(json["request"], "/v1/order/new");
        assert_eq!(json["nonce"], "987");
        assert_eq!(json["symbol"], "btcusd");
        // Skipped optionals must not appear in the signed bytes.
        assert!(json.get("account").is_none());
    }

    #[test]
    fn test_auth_headers_wire_contract() {
        let creds = Credentials::new("my-api-key", "secret");
        let signed = sign_request(&creds, "/v1/balances", 1, &serde_json::json!({})).unwrap();
        let headers = auth_headers("my-api-key", &signed).unwrap();

        assert_eq!(headers.get(HEADER_API_KEY).unwrap(), "my-api-key");
        assert_eq!(headers.get(HEADER_PAYLOAD).unwrap(), signed.payload.as_str());
        assert_eq!(
            headers.get(HEADER_SIGNATURE).unwrap(),
            signed.signature.as_str()
        );
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "text/plain");
        assert_eq!(headers.get(CONTENT_LENGTH).unwrap(), "0");
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "no-cache");
    }

    #[test]
    fn test_signature_is_hex_sha384() {
        let creds = Credentials::new("key", "secret");
        let signed = sign_request(&creds, "/v1/balances", 1, &serde_json::json!({})).unwrap();

        assert_eq!(signed.signature.len(), 96);
        assert!(signed.signature.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
