//! Public REST API endpoints (no authentication required).
//!
//! Dispatched on the public rate budget; no credentials are involved.

mod types;

pub use types::*;

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::GeminiError;
use crate::exchange::TradingPair;
use crate::rest::GeminiRestClient;
use crate::rest::endpoints::public;

impl GeminiRestClient {
    /// List all available trading symbols.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gemini_api_client::rest::GeminiRestClient;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = GeminiRestClient::new()?;
    ///     for symbol in client.list_symbols().await? {
    ///         println!("{symbol}");
    ///     }
    ///     Ok(())
    /// }
    /// ```
    pub async fn list_symbols(&self) -> Result<Vec<String>, GeminiError> {
        let symbols: Vec<String> = self.public_get(public::SYMBOLS).await?;
        debug!(count = symbols.len(), "fetched symbols");
        Ok(symbols)
    }

    /// Get detailed information for a single symbol.
    pub async fn symbol_details(&self, symbol: &str) -> Result<SymbolDetails, GeminiError> {
        self.public_get(&format!("{}/{symbol}", public::SYMBOL_DETAILS))
            .await
    }

    /// Get detailed information for every listed symbol, one request per
    /// symbol.
    ///
    /// Best-effort aggregation: a symbol whose detail request fails is
    /// skipped and logged, and the successful subset is returned. One bad
    /// symbol never fails the whole call.
    pub async fn all_symbol_details(&self) -> Result<Vec<SymbolDetails>, GeminiError> {
        let symbols = self.list_symbols().await?;

        let mut all_details = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            match self.symbol_details(symbol).await {
                Ok(details) => all_details.push(details),
                Err(error) => {
                    warn!(symbol, %error, "failed to fetch details for symbol");
                }
            }
        }

        debug!(count = all_details.len(), "fetched all symbol details");
        Ok(all_details)
    }

    /// Get ticker data for a symbol.
    pub async fn ticker(&self, symbol: &str) -> Result<TickerV2, GeminiError> {
        self.public_get(&format!("{}/{symbol}", public::TICKER_V2))
            .await
    }

    /// Fetch all trading pairs.
    ///
    /// Composes the symbol list with the symbol detail list. A symbol missing
    /// from the detail set still yields a pair, with its base and quote
    /// currencies extracted heuristically from the symbol string.
    pub async fn trading_pairs(&self) -> Result<Vec<TradingPair>, GeminiError> {
        let symbols = self.list_symbols().await?;
        let details: Vec<SymbolDetails> = self.public_get(public::SYMBOL_DETAILS).await?;

        let details_by_symbol: HashMap<String, SymbolDetails> = details
            .into_iter()
            .map(|detail| (detail.symbol.to_lowercase(), detail))
            .collect();

        let mut pairs = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            match details_by_symbol.get(&symbol.to_lowercase()) {
                Some(detail) => pairs.push(TradingPair {
                    symbol: detail.symbol.to_uppercase(),
                    base_asset: detail.base_currency.to_uppercase(),
                    quote_asset: detail.quote_currency.to_uppercase(),
                    status: detail.status.clone(),
                    min_qty: detail.min_order_size,
                    // The detail endpoint carries no maximum or step size.
                    max_qty: Decimal::ZERO,
                    step_size: Decimal::ZERO,
                    tick_size: detail.tick_size,
                }),
                None => pairs.push(TradingPair {
                    symbol: symbol.to_uppercase(),
                    base_asset: extract_base_currency(&symbol),
                    quote_asset: extract_quote_currency(&symbol),
                    status: "TRADING".to_string(),
                    min_qty: Decimal::ZERO,
                    max_qty: Decimal::ZERO,
                    step_size: Decimal::ZERO,
                    tick_size: Decimal::ZERO,
                }),
            }
        }

        Ok(pairs)
    }
}
