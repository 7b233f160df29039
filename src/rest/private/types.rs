//! Request and response types for the private endpoints.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::common::{OrderSide, OrderStatus, OrderType};

/// Parameters for placing a new order.
///
/// The `request` path and `nonce` are stamped in at signing time; field
/// order here is the order they appear in the signed payload. Optional
/// fields left unset are omitted from the signed bytes entirely.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderRequest {
    /// Trading symbol, e.g. "btcusd"
    pub symbol: String,
    /// Order quantity, in base currency
    pub amount: Decimal,
    /// Limit price; not used for market orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Buy or sell
    pub side: OrderSide,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Caller-supplied order identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Execution options, e.g. "maker-or-cancel"
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// Sub-account name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl NewOrderRequest {
    /// Create a new order request with the required fields; optional fields
    /// start unset.
    pub fn new(
        symbol: impl Into<String>,
        amount: Decimal,
        side: OrderSide,
        order_type: OrderType,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            price: None,
            side,
            order_type,
            client_order_id: None,
            options: Vec::new(),
            account: None,
        }
    }

    /// Set the limit price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set a client order id.
    pub fn client_order_id(mut self, id: impl Into<String>) -> Self {
        self.client_order_id = Some(id.into());
        self
    }

    /// Add an execution option.
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Scope the order to a sub-account.
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }
}

/// Parameters for querying the status of an order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OrderStatusRequest {
    /// Exchange-assigned order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Caller-supplied order id, usable instead of `order_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
    /// Include the order's trades in the response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_trades: Option<bool>,
    /// Sub-account name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,
}

impl OrderStatusRequest {
    /// Query by exchange-assigned order id.
    pub fn by_order_id(order_id: impl Into<String>) -> Self {
        Self {
            order_id: Some(order_id.into()),
            ..Self::default()
        }
    }

    /// Query by client order id.
    pub fn by_client_order_id(client_order_id: impl Into<String>) -> Self {
        Self {
            client_order_id: Some(client_order_id.into()),
            ..Self::default()
        }
    }
}

/// An order, as returned by the order endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Exchange-assigned order id
    pub order_id: String,
    /// Numeric alias of `order_id`
    #[serde(default)]
    pub id: String,
    /// Trading symbol
    pub symbol: String,
    /// Always "gemini"
    #[serde(default)]
    pub exchange: String,
    /// Volume-weighted average execution price
    #[serde(default)]
    pub avg_execution_price: Option<Decimal>,
    /// Buy or sell
    pub side: OrderSide,
    /// Order type
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// Placement time, seconds since epoch as a string
    #[serde(default)]
    pub timestamp: String,
    /// Placement time in milliseconds
    #[serde(default)]
    pub timestampms: i64,
    /// Whether the order is resting on the book
    pub is_live: bool,
    /// Whether the order was cancelled
    pub is_cancelled: bool,
    /// Whether the order is hidden
    #[serde(default)]
    pub is_hidden: bool,
    /// Whether the order was forced by the exchange
    #[serde(default)]
    pub was_forced: bool,
    /// Amount executed so far
    #[serde(default)]
    pub executed_amount: Option<Decimal>,
    /// Amount still open
    #[serde(default)]
    pub remaining_amount: Option<Decimal>,
    /// Execution options the order was placed with
    #[serde(default)]
    pub options: Vec<String>,
    /// Limit price
    #[serde(default)]
    pub price: Option<Decimal>,
    /// Originally submitted amount
    #[serde(default)]
    pub original_amount: Option<Decimal>,
    /// Caller-supplied order id, when one was given
    #[serde(default)]
    pub client_order_id: Option<String>,
}

impl Order {
    /// Lifecycle state derived from the live/cancelled flags.
    pub fn status(&self) -> OrderStatus {
        if self.is_cancelled {
            OrderStatus::Cancelled
        } else if self.is_live {
            OrderStatus::Open
        } else {
            OrderStatus::Closed
        }
    }
}

/// Account balance for one currency.
#[derive(Debug, Clone, Deserialize)]
pub struct Balance {
    /// Balance type, e.g. "exchange"
    #[serde(rename = "type", default)]
    pub balance_type: String,
    /// Currency code
    pub currency: String,
    /// Total amount
    pub amount: Decimal,
    /// Amount available for trading
    pub available: Decimal,
    /// Amount available for withdrawal
    #[serde(rename = "availableForWithdrawal")]
    pub available_for_withdrawal: Decimal,
}

/// Account balance with notional values in a requested currency.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotionalBalance {
    /// Currency code
    pub currency: String,
    /// Total amount
    pub amount: Decimal,
    /// Total amount, in the notional currency
    pub amount_notional: Decimal,
    /// Amount available for trading
    pub available: Decimal,
    /// Available amount, in the notional currency
    pub available_notional: Decimal,
    /// Amount available for withdrawal
    pub available_for_withdrawal: Decimal,
    /// Withdrawable amount, in the notional currency
    pub available_for_withdrawal_notional: Decimal,
}

/// A deposit address on some network.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositAddress {
    /// The address itself
    pub address: String,
    /// Creation time in milliseconds since epoch
    pub timestamp: i64,
    /// Caller-assigned label
    #[serde(default)]
    pub label: Option<String>,
    /// Memo for networks that require one
    #[serde(default)]
    pub memo: Option<String>,
    /// Network name, e.g. "bitcoin"
    #[serde(default)]
    pub network: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_order_request_skips_unset_optionals() {
        let request = NewOrderRequest::new(
            "btcusd",
            "0.5".parse::<Decimal>().unwrap(),
            OrderSide::Buy,
            OrderType::ExchangeLimit,
        );
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["symbol"], "btcusd");
        assert_eq!(json["amount"], "0.5");
        assert_eq!(json["type"], "exchange limit");
        assert!(json.get("price").is_none());
        assert!(json.get("client_order_id").is_none());
        assert!(json.get("options").is_none());
        assert!(json.get("account").is_none());
    }

    #[test]
    fn test_new_order_request_builders() {
        let request = NewOrderRequest::new(
            "ethusd",
            "2".parse::<Decimal>().unwrap(),
            OrderSide::Sell,
            OrderType::ExchangeLimit,
        )
        .price("3500.00".parse::<Decimal>().unwrap())
        .option("maker-or-cancel")
        .client_order_id("my-order-1");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["price"], "3500.00");
        assert_eq!(json["options"][0], "maker-or-cancel");
        assert_eq!(json["client_order_id"], "my-order-1");
    }

    #[test]
    fn test_order_status_derivation() {
        let json = r#"{
            "order_id": "44375901",
            "id": "44375901",
            "symbol": "btcusd",
            "exchange": "gemini",
            "avg_execution_price": "400.00",
            "side": "buy",
            "type": "exchange limit",
            "timestamp": "1494870642",
            "timestampms": 1494870642156,
            "is_live": false,
            "is_cancelled": false,
            "is_hidden": false,
            "was_forced": false,
            "executed_amount": "3",
            "remaining_amount": "0",
            "options": [],
            "price": "400.00",
            "original_amount": "3"
        }"#;
        let order: Order = serde_json::from_str(json).unwrap();
        assert_eq!(order.status(), OrderStatus::Closed);
        assert_eq!(order.side, OrderSide::Buy);
        assert_eq!(order.order_type, OrderType::ExchangeLimit);

        let mut open = order.clone();
        open.is_live = true;
        assert_eq!(open.status(), OrderStatus::Open);

        let mut cancelled = order;
        cancelled.is_cancelled = true;
        assert_eq!(cancelled.status(), OrderStatus::Cancelled);
    }

    #[test]
    fn test_balance_from_wire() {
        let json = r#"{
            "type": "exchange",
            "currency": "BTC",
            "amount": "1154.62034001",
            "available": "1129.10517279",
            "availableForWithdrawal": "1129.10517279"
        }"#;
        let balance: Balance = serde_json::from_str(json).unwrap();
        assert_eq!(balance.currency, "BTC");
        assert_eq!(
            balance.available,
            "1129.10517279".parse::<Decimal>().unwrap()
        );
    }
}
