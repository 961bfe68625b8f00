//! Catalog endpoints: products and categories.
//!
//! Catalog reads are anonymous and cached for 5 minutes. Filtered queries
//! are not cached. Admin product mutations invalidate the affected entries.

use tracing::{debug, instrument};

use sole_trader_core::{CategoryId, ProductId};

use super::ShopClient;
use super::cache::CacheValue;
use super::types::{Category, Product, ProductFilter};
use crate::error::ClientError;

impl ShopClient {
    /// Get the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, ClientError> {
        let cache_key = "products".to_owned();

        if let Some(CacheValue::Products(products)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .execute(self.http().get(self.endpoint(&["products"])))
            .await?;

        self.cache()
            .insert(cache_key, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Get a product by its id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the product does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn get_product(&self, product_id: ProductId) -> Result<Product, ClientError> {
        let cache_key = format!("product:{product_id}");

        if let Some(CacheValue::Product(product)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .execute(
                self.http()
                    .get(self.endpoint(&["products", &product_id.to_string()])),
            )
            .await?;

        self.cache()
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Search and filter products. Results are not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, filter))]
    pub async fn filter_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, ClientError> {
        let req = self
            .http()
            .get(self.endpoint(&["products", "filter"]))
            .query(filter);
        self.execute(req).await
    }

    /// Get all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_categories(&self) -> Result<Vec<Category>, ClientError> {
        let cache_key = "categories".to_owned();

        if let Some(CacheValue::Categories(categories)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let categories: Vec<Category> = self
            .execute(self.http().get(self.endpoint(&["category"])))
            .await?;

        self.cache()
            .insert(cache_key, CacheValue::Categories(categories.clone()))
            .await;

        Ok(categories)
    }

    /// Get a category by its id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the category does not exist, or
    /// another error if the API request fails.
    #[instrument(skip(self), fields(category_id = %category_id))]
    pub async fn get_category(&self, category_id: CategoryId) -> Result<Category, ClientError> {
        let cache_key = format!("category:{category_id}");

        if let Some(CacheValue::Category(category)) = self.cache().get(&cache_key).await {
            debug!("Cache hit for category");
            return Ok(*category);
        }

        let category: Category = self
            .execute(
                self.http()
                    .get(self.endpoint(&["category", &category_id.to_string()])),
            )
            .await?;

        self.cache()
            .insert(cache_key, CacheValue::Category(Box::new(category.clone())))
            .await;

        Ok(category)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product and the product list.
    pub async fn invalidate_product(&self, product_id: ProductId) {
        self.cache()
            .invalidate(&format!("product:{product_id}"))
            .await;
        self.cache().invalidate(&"products".to_owned()).await;
    }

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.cache().invalidate_all();
        self.cache().run_pending_tasks().await;
    }
}
