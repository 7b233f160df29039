//! Common domain types for the Gemini API.

use serde::{Deserialize, Serialize};

/// Buy or sell side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    /// Buy order
    Buy,
    /// Sell order
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

/// Order type, using Gemini's exact wire strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Limit order on the exchange book
    #[serde(rename = "exchange limit")]
    ExchangeLimit,
    /// Order only eligible for the auction
    #[serde(rename = "auction-only")]
    AuctionOnly,
    /// Market buy order
    #[serde(rename = "market buy")]
    MarketBuy,
    /// Market sell order
    #[serde(rename = "market sell")]
    MarketSell,
    /// Immediate-or-cancel limit order
    #[serde(rename = "immediate-or-cancel")]
    ImmediateOrCancel,
    /// Fill-or-kill limit order
    #[serde(rename = "fill-or-kill")]
    FillOrKill,
    /// Indication of interest
    #[serde(rename = "indication-of-interest")]
    IndicationOfInterest,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderType::ExchangeLimit => "exchange limit",
            OrderType::AuctionOnly => "auction-only",
            OrderType::MarketBuy => "market buy",
            OrderType::MarketSell => "market sell",
            OrderType::ImmediateOrCancel => "immediate-or-cancel",
            OrderType::FillOrKill => "fill-or-kill",
            OrderType::IndicationOfInterest => "indication-of-interest",
        };
        write!(f, "{s}")
    }
}

/// Lifecycle state of an order, derived from its live/cancelled flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Resting on the book
    Open,
    /// Fully executed
    Closed,
    /// Cancelled before completion
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Open => write!(f, "open"),
            OrderStatus::Closed => write!(f, "closed"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_wire_strings() {
        let json = serde_json::to_string(&OrderType::ExchangeLimit).unwrap();
        assert_eq!(json, r#""exchange limit""#);

        let parsed: OrderType = serde_json::from_str(r#""immediate-or-cancel""#).unwrap();
        assert_eq!(parsed, OrderType::ImmediateOrCancel);
    }

    #[test]
    fn test_order_side_roundtrip() {
        assert_eq!(serde_json::to_string(&OrderSide::Buy).unwrap(), r#""buy""#);
        let side: OrderSide = serde_json::from_str(r#""sell""#).unwrap();
        assert_eq!(side, OrderSide::Sell);
    }
}
