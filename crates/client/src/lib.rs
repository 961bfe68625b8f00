//! Sole Trader Client - Headless shop SDK.
//!
//! # Architecture
//!
//! - The shop backend is source of truth - cart mutations round-trip and the
//!   server's full line-item list replaces local state wholesale
//! - The wishlist is the one optimistic exception: membership flips locally
//!   first and rolls back on failure
//! - Sessions are a two-state machine (`Anonymous` / `Authenticated`) with
//!   tokens persisted in durable storage; cart and wishlist contents are
//!   never persisted client-side
//! - Catalog reads are cached in-memory via `moka` (5 minute TTL)
//!
//! # Example
//!
//! ```rust,ignore
//! use sole_trader_client::{Shop, ShopConfig};
//!
//! let shop = Shop::new(ShopConfig::from_env()?)?;
//! shop.init().await?;
//!
//! shop.session().login("asha@example.com", "password").await?;
//! shop.cart().add(product.id, size, 1).await?;
//! println!("{} items", shop.cart().line_count());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod store;

pub use api::types::{
    AuthTokens, Category, CheckoutRequest, DashboardStats, ImageUpload, LineItem, NewProduct,
    Order, OrderItem, PaymentOrder, PaymentVerification, Product, ProductFilter, ProductUpdate,
    RegistrationRequest, UserProfile, UserSummary, WishlistEntry,
};
pub use api::{AuthApi, CartApi, ShopClient, WishlistApi};
pub use config::{ConfigError, ShopConfig};
pub use error::ClientError;
pub use session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionManager, SessionState,
    StoredSession,
};
pub use state::Shop;
pub use store::{CartStore, WishlistStore};
