//! Gemini REST API endpoint constants.

/// Base URL for the production Gemini REST API.
pub const GEMINI_BASE_URL: &str = "https://api.gemini.com";

/// Base URL for the Gemini sandbox environment.
pub const GEMINI_SANDBOX_URL: &str = "https://api.sandbox.gemini.com";

/// Public endpoints (no authentication required).
pub mod public {
    /// List available trading symbols.
    pub const SYMBOLS: &str = "/v1/symbols";
    /// Symbol details; append `/{symbol}` for a single symbol.
    pub const SYMBOL_DETAILS: &str = "/v1/symbols/details";
    /// Ticker data; append `/{symbol}`.
    pub const TICKER_V2: &str = "/v2/ticker";
}

/// Private endpoints (authentication required).
pub mod private {
    /// Place a new order.
    pub const NEW_ORDER: &str = "/v1/order/new";
    /// Cancel an order.
    pub const CANCEL_ORDER: &str = "/v1/order/cancel";
    /// Get the status of an order.
    pub const ORDER_STATUS: &str = "/v1/order/status";
    /// List active orders.
    pub const ACTIVE_ORDERS: &str = "/v1/orders";
    /// Get available balances.
    pub const BALANCES: &str = "/v1/balances";
    /// Get notional balances; append `/{currency}`.
    pub const NOTIONAL_BALANCES: &str = "/v1/notionalbalances";
    /// List deposit addresses; append `/{network}`.
    pub const DEPOSIT_ADDRESSES: &str = "/v1/addresses";
}
