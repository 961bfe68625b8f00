//! Admin back-office endpoints.
//!
//! All operations require a credential belonging to an admin user; the
//! server enforces the role check. Product mutations invalidate the catalog
//! cache so storefront reads see the change immediately.

use secrecy::SecretString;
use tracing::instrument;

use sole_trader_core::{ProductId, UserId};

use super::ShopClient;
use super::types::{
    DashboardStats, ImageUpload, NewProduct, Order, Product, ProductUpdate, UserSummary,
};
use crate::error::ClientError;

impl ShopClient {
    /// List every order in the system.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn all_orders(&self, credential: &SecretString) -> Result<Vec<Order>, ClientError> {
        let req = Self::authed(
            self.http().get(self.endpoint(&["orders", "admin", "all"])),
            credential,
        );
        self.execute(req).await
    }

    /// Aggregated revenue and fulfillment numbers for the dashboard.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn dashboard_stats(
        &self,
        credential: &SecretString,
    ) -> Result<DashboardStats, ClientError> {
        let req = Self::authed(
            self.http()
                .get(self.endpoint(&["orders", "admin", "dashboard"]))
                .query(&[("type", "all")]),
            credential,
        );
        self.execute(req).await
    }

    // =========================================================================
    // User management
    // =========================================================================

    /// List all registered users.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip_all)]
    pub async fn list_users(
        &self,
        credential: &SecretString,
    ) -> Result<Vec<UserSummary>, ClientError> {
        let req = Self::authed(self.http().get(self.endpoint(&["users"])), credential);
        self.execute(req).await
    }

    /// Block or unblock a user account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown user, or another
    /// error if the request fails.
    #[instrument(skip_all, fields(user_id = %user_id, blocked = blocked))]
    pub async fn set_user_blocked(
        &self,
        credential: &SecretString,
        user_id: UserId,
        blocked: bool,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["users", "block-unblock", &user_id.to_string()]);
        let body = serde_json::json!({ "isBlocked": blocked });
        let req = Self::authed(self.http().put(url).json(&body), credential);
        self.execute_unit(req).await
    }

    /// Permanently delete a user account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown user, or another
    /// error if the request fails.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn delete_user(
        &self,
        credential: &SecretString,
        user_id: UserId,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["users", &user_id.to_string()]);
        let req = Self::authed(self.http().delete(url), credential);
        self.execute_unit(req).await
    }

    // =========================================================================
    // Product management
    // =========================================================================

    /// Create a product with attached images (multipart form upload).
    ///
    /// # Errors
    ///
    /// Returns an error if the product is rejected or the upload fails.
    #[instrument(skip_all, fields(name = %product.name))]
    pub async fn create_product(
        &self,
        credential: &SecretString,
        product: &NewProduct,
        images: Vec<ImageUpload>,
    ) -> Result<Product, ClientError> {
        let form = product_form(serde_json::to_string(product)?, images)?;
        let req = Self::authed(
            self.http()
                .post(self.endpoint(&["products"]))
                .multipart(form),
            credential,
        );
        let created: Product = self.execute(req).await?;

        self.invalidate_product(created.id).await;
        Ok(created)
    }

    /// Update an existing product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is rejected or the request fails.
    #[instrument(skip_all, fields(product_id = %update.id))]
    pub async fn update_product(
        &self,
        credential: &SecretString,
        update: &ProductUpdate,
    ) -> Result<Product, ClientError> {
        let req = Self::authed(
            self.http().put(self.endpoint(&["products"])).json(update),
            credential,
        );
        let updated: Product = self.execute(req).await?;

        self.invalidate_product(updated.id).await;
        Ok(updated)
    }

    /// Flip a product between active and deactivated.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown product, or another
    /// error if the request fails.
    #[instrument(skip_all, fields(product_id = %product_id))]
    pub async fn toggle_product_status(
        &self,
        credential: &SecretString,
        product_id: ProductId,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(&["products", "status", &product_id.to_string()]);
        let req = Self::authed(self.http().patch(url), credential);
        self.execute_unit(req).await?;

        self.invalidate_product(product_id).await;
        Ok(())
    }
}

/// Assemble the multipart form: product fields as a JSON part plus one part
/// per image.
fn product_form(
    product_json: String,
    images: Vec<ImageUpload>,
) -> Result<reqwest::multipart::Form, ClientError> {
    let mut form = reqwest::multipart::Form::new().part(
        "product",
        reqwest::multipart::Part::text(product_json).mime_str("application/json")?,
    );

    for image in images {
        let part = reqwest::multipart::Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)?;
        form = form.part("images", part);
    }

    Ok(form)
}
