//! Wishlist endpoints.

use async_trait::async_trait;
use secrecy::SecretString;
use tracing::instrument;

use sole_trader_core::ProductId;

use super::ShopClient;
use super::types::WishlistEntry;
use crate::error::ClientError;

/// Session-scoped wishlist operations.
///
/// Unlike the cart, the toggle endpoint does not return the updated list;
/// the wishlist store applies the membership change optimistically and rolls
/// back on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WishlistApi: Send + Sync {
    /// Fetch the full wishlist.
    async fn get_wishlist(
        &self,
        credential: &SecretString,
    ) -> Result<Vec<WishlistEntry>, ClientError>;

    /// Flip membership of a product. Toggling twice returns to the original
    /// state.
    async fn toggle(
        &self,
        credential: &SecretString,
        product_id: ProductId,
    ) -> Result<(), ClientError>;
}

#[async_trait]
impl WishlistApi for ShopClient {
    #[instrument(skip_all)]
    async fn get_wishlist(
        &self,
        credential: &SecretString,
    ) -> Result<Vec<WishlistEntry>, ClientError> {
        let req = Self::authed(self.http().get(self.endpoint(&["wishlist"])), credential);
        self.execute(req).await
    }

    #[instrument(skip_all, fields(product_id = %product_id))]
    async fn toggle(
        &self,
        credential: &SecretString,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["wishlist", &product_id.to_string()]);
        let req = Self::authed(self.http().post(url), credential);
        self.execute_unit(req).await
    }
}
