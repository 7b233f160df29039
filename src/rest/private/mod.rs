//! Private REST API endpoints (authentication required).
//!
//! Every operation here requires both an API key and secret; a client
//! missing either fails with [`GeminiError::MissingCredentials`] before any
//! network traffic. Requests are dispatched on the private rate budget with
//! the signed-envelope headers built by [`crate::auth`].

mod types;

pub use types::*;

use serde::Serialize;
use tracing::debug;

use crate::error::GeminiError;
use crate::rest::GeminiRestClient;
use crate::rest::endpoints::private;

/// Sub-account scoping shared by several private requests.
#[derive(Serialize)]
struct AccountParams<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    account: Option<&'a str>,
}

impl GeminiRestClient {
    /// Place a new order.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use gemini_api_client::rest::GeminiRestClient;
    /// use gemini_api_client::rest::private::NewOrderRequest;
    /// use gemini_api_client::types::common::{OrderSide, OrderType};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = GeminiRestClient::builder()
    ///         .credentials("api_key", "api_secret")
    ///         .build()?;
    ///
    ///     let request = NewOrderRequest::new(
    ///         "btcusd",
    ///         "0.01".parse()?,
    ///         OrderSide::Buy,
    ///         OrderType::ExchangeLimit,
    ///     )
    ///     .price("25000.00".parse()?);
    ///
    ///     let order = client.place_order(&request).await?;
    ///     println!("placed {}", order.order_id);
    ///     Ok(())
    /// }
    /// ```
    pub async fn place_order(&self, request: &NewOrderRequest) -> Result<Order, GeminiError> {
        debug!(
            symbol = %request.symbol,
            side = %request.side,
            order_type = %request.order_type,
            "placing order"
        );
        let order: Order = self.private_post(private::NEW_ORDER, request).await?;
        debug!(order_id = %order.order_id, "order placed");
        Ok(order)
    }

    /// Cancel an existing order.
    pub async fn cancel_order(
        &self,
        order_id: &str,
        account: Option<&str>,
    ) -> Result<Order, GeminiError> {
        #[derive(Serialize)]
        struct Params<'a> {
            order_id: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            account: Option<&'a str>,
        }

        debug!(order_id, "cancelling order");
        let order: Order = self
            .private_post(private::CANCEL_ORDER, &Params { order_id, account })
            .await?;
        debug!(order_id = %order.order_id, "order cancelled");
        Ok(order)
    }

    /// Get the status of a specific order.
    pub async fn order_status(&self, request: &OrderStatusRequest) -> Result<Order, GeminiError> {
        self.private_post(private::ORDER_STATUS, request).await
    }

    /// List all active orders.
    pub async fn active_orders(&self, account: Option<&str>) -> Result<Vec<Order>, GeminiError> {
        let orders: Vec<Order> = self
            .private_post(private::ACTIVE_ORDERS, &AccountParams { account })
            .await?;
        debug!(count = orders.len(), "fetched active orders");
        Ok(orders)
    }

    /// Get available balances for the account.
    pub async fn available_balances(
        &self,
        account: Option<&str>,
    ) -> Result<Vec<Balance>, GeminiError> {
        let balances: Vec<Balance> = self
            .private_post(private::BALANCES, &AccountParams { account })
            .await?;
        debug!(count = balances.len(), "fetched available balances");
        Ok(balances)
    }

    /// Get balances with notional values in the given currency.
    pub async fn notional_balances(
        &self,
        currency: &str,
        account: Option<&str>,
    ) -> Result<Vec<NotionalBalance>, GeminiError> {
        let endpoint = format!("{}/{currency}", private::NOTIONAL_BALANCES);
        let balances: Vec<NotionalBalance> = self
            .private_post(&endpoint, &AccountParams { account })
            .await?;
        debug!(count = balances.len(), currency, "fetched notional balances");
        Ok(balances)
    }

    /// List deposit addresses for the given network.
    pub async fn deposit_addresses(
        &self,
        network: &str,
        account: Option<&str>,
    ) -> Result<Vec<DepositAddress>, GeminiError> {
        let endpoint = format!("{}/{network}", private::DEPOSIT_ADDRESSES);
        let addresses: Vec<DepositAddress> = self
            .private_post(&endpoint, &AccountParams { account })
            .await?;
        debug!(count = addresses.len(), network, "listed deposit addresses");
        Ok(addresses)
    }
}
