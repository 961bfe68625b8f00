//! Wire types for the shop REST API.
//!
//! Field names follow the backend's camelCase JSON convention. Prices travel
//! as decimal strings and are parsed into [`Decimal`] on arrival.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sole_trader_core::{
    CategoryId, Email, LineItemId, OrderId, OrderStatus, PaymentMethod, PaymentStatus, ProductId,
    ShoeSize, UserId,
};

// =============================================================================
// Cart
// =============================================================================

/// One (product, size) pairing in the cart, with quantity and the price
/// snapshotted when the line was added.
///
/// The server guarantees at most one line per (product, size) pair; adding
/// the same pair again increments the quantity instead of duplicating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Server-assigned line identifier, unique per line.
    pub id: LineItemId,
    pub product_id: ProductId,
    pub size: ShoeSize,
    pub quantity: u32,
    /// Unit price snapshot at add time.
    pub price: Decimal,
}

impl LineItem {
    /// Price × quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Cart resource as returned by the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    #[serde(default)]
    pub items: Vec<LineItem>,
}

/// Body for `POST /cart`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub product_id: ProductId,
    pub size: ShoeSize,
    pub quantity: u32,
}

/// Body for `PUT /cart/{lineItemId}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub quantity: u32,
}

// =============================================================================
// Wishlist
// =============================================================================

/// One wishlist membership entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub product_id: ProductId,
}

// =============================================================================
// Auth
// =============================================================================

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: String,
    pub email: Email,
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Response of `POST /auth/refresh-token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// User identity as returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub is_admin: bool,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub sizes: Vec<ShoeSize>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Query parameters for `GET /products/filter`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descending: Option<bool>,
}

// =============================================================================
// Orders & payment
// =============================================================================

/// One line of a placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub size: ShoeSize,
    pub quantity: u32,
    pub price: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub shipping_address: String,
}

/// Body for `POST /orders/checkout`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: String,
    pub payment_method: PaymentMethod,
}

/// Gateway order handle from `POST /payment/create-order`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
}

/// Body for `POST /payment/verify`.
///
/// Field names match what the Razorpay checkout hands back.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

// =============================================================================
// Admin
// =============================================================================

/// Aggregated dashboard numbers from `GET /orders/admin/dashboard`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    #[serde(default)]
    pub total_revenue: Decimal,
    #[serde(default)]
    pub total_products_purchased: u64,
    #[serde(default)]
    pub delivered_orders_count: u64,
}

/// User row for the admin user list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub is_blocked: bool,
}

/// Fields for creating a product (sent as multipart form alongside images).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub sizes: Vec<ShoeSize>,
}

/// Fields for updating an existing product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: ProductId,
    pub name: String,
    pub brand: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: CategoryId,
    pub sizes: Vec<ShoeSize>,
}

/// An image to attach to a product, uploaded as one multipart part.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
