//! Response types for the public market-data endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Detailed information about a trading symbol.
///
/// Served by both the per-symbol and the list detail endpoints; fields only
/// present on the per-symbol variant are defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDetails {
    /// Symbol name, e.g. "btcusd"
    pub symbol: String,
    /// Base currency code
    pub base_currency: String,
    /// Quote currency code
    pub quote_currency: String,
    /// Minimum price increment
    pub tick_size: Decimal,
    /// Minimum quote amount increment
    pub quote_increment: Decimal,
    /// Minimum order size, in base currency
    pub min_order_size: Decimal,
    /// Trading status, e.g. "open"
    pub status: String,
    /// Whether the asset supports wrapping
    #[serde(default)]
    pub wrap_enabled: bool,
    /// Product type, e.g. "spot"
    #[serde(default)]
    pub product_type: Option<String>,
    /// Contract type for derivatives
    #[serde(default)]
    pub contract_type: Option<String>,
    /// Pricing currency for derivative contracts
    #[serde(default)]
    pub contract_price_currency: Option<String>,
}

/// Ticker data from the v2 ticker endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerV2 {
    /// Symbol name
    pub symbol: String,
    /// Open price from 24 hours ago
    pub open: Decimal,
    /// High price over the last 24 hours
    pub high: Decimal,
    /// Low price over the last 24 hours
    pub low: Decimal,
    /// Current price
    pub close: Decimal,
    /// Hourly prices over the last 24 hours, most recent first
    #[serde(default)]
    pub changes: Vec<Decimal>,
    /// Current best bid
    pub bid: Decimal,
    /// Current best ask
    pub ask: Decimal,
}

/// Quote currencies Gemini lists against, longest code first so compound
/// codes match before their suffixes.
const QUOTE_CURRENCIES: [&str; 8] = ["gusd", "usd", "btc", "eth", "eur", "gbp", "sgd", "dai"];

/// Extract the base currency from a symbol string.
///
/// Longest suffix match against the known quote currencies; symbols matching
/// none fall back to their first three characters when long enough, else the
/// whole symbol.
pub fn extract_base_currency(symbol: &str) -> String {
    let symbol = symbol.to_lowercase();

    for quote in QUOTE_CURRENCIES {
        if let Some(base) = symbol.strip_suffix(quote) {
            return base.to_uppercase();
        }
    }

    // Byte slicing is safe here: anything non-ASCII takes the whole-symbol
    // fallback.
    if symbol.len() >= 6 && symbol.is_ascii() {
        symbol[..3].to_uppercase()
    } else {
        symbol.to_uppercase()
    }
}

/// Extract the quote currency from a symbol string.
///
/// Longest suffix match against the known quote currencies; symbols matching
/// none fall back to their last three characters when long enough, else USD.
pub fn extract_quote_currency(symbol: &str) -> String {
    let symbol = symbol.to_lowercase();

    for quote in QUOTE_CURRENCIES {
        if symbol.ends_with(quote) {
            return quote.to_uppercase();
        }
    }

    if symbol.len() >= 6 && symbol.is_ascii() {
        symbol[symbol.len() - 3..].to_uppercase()
    } else {
        "USD".to_string()
    }
}
