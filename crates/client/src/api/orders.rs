//! Order and payment endpoints.

use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing::instrument;

use sole_trader_core::OrderId;

use super::ShopClient;
use super::types::{CheckoutRequest, Order, PaymentOrder, PaymentVerification};
use crate::error::ClientError;

impl ShopClient {
    /// Place an order from the current cart contents.
    ///
    /// The server drains the cart into a new order; callers should refresh
    /// their cart view afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the checkout is rejected or the request fails.
    #[instrument(skip_all)]
    pub async fn checkout(
        &self,
        credential: &SecretString,
        request: &CheckoutRequest,
    ) -> Result<Order, ClientError> {
        let req = Self::authed(
            self.http()
                .post(self.endpoint(&["orders", "checkout"]))
                .json(request),
            credential,
        );
        self.execute(req).await
    }

    /// List the current user's orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn my_orders(&self, credential: &SecretString) -> Result<Vec<Order>, ClientError> {
        let req = Self::authed(self.http().get(self.endpoint(&["orders"])), credential);
        self.execute(req).await
    }

    /// Get one order by id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown id, or another error
    /// if the API request fails.
    #[instrument(skip_all, fields(order_id = %order_id))]
    pub async fn get_order(
        &self,
        credential: &SecretString,
        order_id: OrderId,
    ) -> Result<Order, ClientError> {
        let url = self.endpoint(&["orders", &order_id.to_string()]);
        let req = Self::authed(self.http().get(url), credential);
        self.execute(req).await
    }

    /// Cancel an order that has not shipped yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the order cannot be cancelled or the request
    /// fails.
    #[instrument(skip_all, fields(order_id = %order_id))]
    pub async fn cancel_order(
        &self,
        credential: &SecretString,
        order_id: OrderId,
    ) -> Result<Order, ClientError> {
        let url = self.endpoint(&["orders", "cancel", &order_id.to_string()]);
        let req = Self::authed(self.http().put(url), credential);
        self.execute(req).await
    }

    // =========================================================================
    // Payment gateway handshake
    // =========================================================================

    /// Create a gateway order for an online payment of `amount`.
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway order cannot be created.
    #[instrument(skip_all)]
    pub async fn create_payment_order(
        &self,
        credential: &SecretString,
        amount: Decimal,
    ) -> Result<PaymentOrder, ClientError> {
        let body = serde_json::json!({ "amount": amount });
        let req = Self::authed(
            self.http()
                .post(self.endpoint(&["payment", "create-order"]))
                .json(&body),
            credential,
        );
        self.execute(req).await
    }

    /// Verify a completed gateway payment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] if the signature does not check
    /// out server-side, or another error if the request fails.
    #[instrument(skip_all)]
    pub async fn verify_payment(
        &self,
        credential: &SecretString,
        verification: &PaymentVerification,
    ) -> Result<(), ClientError> {
        let req = Self::authed(
            self.http()
                .post(self.endpoint(&["payment", "verify"]))
                .json(verification),
            credential,
        );
        self.execute_unit(req).await
    }
}
