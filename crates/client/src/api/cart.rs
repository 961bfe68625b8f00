//! Cart endpoints.
//!
//! The server is the sole source of truth for cart contents: every mutation
//! here round-trips and returns the full, authoritative line-item list, never
//! a delta. Callers replace their entire local view with the returned list.

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::instrument;

use sole_trader_core::{LineItemId, ProductId, ShoeSize};

use super::ShopClient;
use super::types::{AddItemRequest, CartPayload, LineItem, UpdateQuantityRequest};
use crate::error::ClientError;

/// Session-scoped cart operations.
///
/// All operations require a valid bearer credential and return the complete
/// updated line-item list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CartApi: Send + Sync {
    /// Fetch the current cart.
    async fn get_cart(&self, credential: &SecretString) -> Result<Vec<LineItem>, ClientError>;

    /// Add a (product, size) line. The server merges repeated adds of the
    /// same pair into one line by incrementing its quantity.
    async fn add_item(
        &self,
        credential: &SecretString,
        product_id: ProductId,
        size: ShoeSize,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ClientError>;

    /// Remove a line by its server-assigned id.
    async fn remove_item(
        &self,
        credential: &SecretString,
        line_item_id: LineItemId,
    ) -> Result<Vec<LineItem>, ClientError>;

    /// Set the quantity of an existing line.
    async fn update_quantity(
        &self,
        credential: &SecretString,
        line_item_id: LineItemId,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ClientError>;

    /// Remove every line from the cart.
    async fn clear(&self, credential: &SecretString) -> Result<Vec<LineItem>, ClientError>;
}

#[async_trait]
impl CartApi for ShopClient {
    #[instrument(skip_all)]
    async fn get_cart(&self, credential: &SecretString) -> Result<Vec<LineItem>, ClientError> {
        let req = Self::authed(self.http().get(self.endpoint(&["cart"])), credential);
        let payload: CartPayload = self.execute(req).await?;
        Ok(payload.items)
    }

    #[instrument(skip_all, fields(product_id = %product_id, size = %size, quantity = quantity))]
    async fn add_item(
        &self,
        credential: &SecretString,
        product_id: ProductId,
        size: ShoeSize,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ClientError> {
        let body = AddItemRequest {
            product_id,
            size,
            quantity,
        };
        let req = Self::authed(
            self.http().post(self.endpoint(&["cart"])).json(&body),
            credential,
        );
        self.execute_unit(req).await?;

        // Fetch the updated cart after the mutation
        self.get_cart(credential).await
    }

    #[instrument(skip_all, fields(line_item_id = %line_item_id))]
    async fn remove_item(
        &self,
        credential: &SecretString,
        line_item_id: LineItemId,
    ) -> Result<Vec<LineItem>, ClientError> {
        let url = self.endpoint(&["cart", &line_item_id.to_string()]);
        let req = Self::authed(self.http().delete(url), credential);
        self.execute_unit(req).await?;

        self.get_cart(credential).await
    }

    #[instrument(skip_all, fields(line_item_id = %line_item_id, quantity = quantity))]
    async fn update_quantity(
        &self,
        credential: &SecretString,
        line_item_id: LineItemId,
        quantity: u32,
    ) -> Result<Vec<LineItem>, ClientError> {
        let url = self.endpoint(&["cart", &line_item_id.to_string()]);
        let body = UpdateQuantityRequest { quantity };
        let req = Self::authed(self.http().put(url).json(&body), credential);
        self.execute_unit(req).await?;

        self.get_cart(credential).await
    }

    #[instrument(skip_all)]
    async fn clear(&self, credential: &SecretString) -> Result<Vec<LineItem>, ClientError> {
        let req = Self::authed(self.http().delete(self.endpoint(&["cart"])), credential);
        self.execute_unit(req).await?;

        self.get_cart(credential).await
    }
}
