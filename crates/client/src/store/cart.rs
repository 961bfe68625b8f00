//! Client-side cart state.
//!
//! The store holds the client's believed view of the cart. The server is the
//! sole source of truth: every mutation round-trips and the server's full
//! line-item list replaces the local snapshot atomically. The client never
//! patches a single item locally, which sidesteps drift between client and
//! server line identity entirely.
//!
//! Mutations on one cart are serialized behind an async mutex. Two in-flight
//! mutations whose responses resolve out of order would otherwise leave the
//! snapshot reflecting only the last-resolved response.

use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use tokio::sync::Mutex;

use sole_trader_core::{CurrencyCode, LineItemId, Money, ProductId, ShoeSize};

use super::with_credential_retry;
use crate::api::CartApi;
use crate::api::types::LineItem;
use crate::error::ClientError;
use crate::session::SessionManager;

/// Smallest orderable line quantity.
const MIN_QUANTITY: u32 = 1;
/// Largest orderable line quantity. Zero routes to removal, not update, and
/// the UI never offers more than this.
const MAX_QUANTITY: u32 = 99;

/// Owns the in-memory cart snapshot and mediates all cart mutations.
///
/// Cheaply cloneable; clones share the snapshot.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    api: Arc<dyn CartApi>,
    session: SessionManager,
    items: RwLock<Vec<LineItem>>,
    /// Serializes mutations: queue, don't fire concurrently.
    mutation_lock: Mutex<()>,
}

impl CartStore {
    /// Create an empty cart store.
    #[must_use]
    pub fn new(api: Arc<dyn CartApi>, session: SessionManager) -> Self {
        Self {
            inner: Arc::new(CartStoreInner {
                api,
                session,
                items: RwLock::new(Vec::new()),
                mutation_lock: Mutex::new(()),
            }),
        }
    }

    // =========================================================================
    // Mutations (serialized, authenticated)
    // =========================================================================

    /// Re-fetch the cart from the server and replace the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when anonymous, or the API
    /// error otherwise.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let _guard = self.inner.mutation_lock.lock().await;
        let api = Arc::clone(&self.inner.api);
        let items = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            async move { api.get_cart(&credential).await }
        })
        .await?;
        self.replace(items);
        Ok(())
    }

    /// Add `quantity` of a (product, size) pairing.
    ///
    /// Adding a pair already in the cart increments that line's quantity
    /// server-side rather than duplicating the line.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a quantity outside [1, 99]
    /// (no request is issued), [`ClientError::NotAuthenticated`] when
    /// anonymous, or the API error otherwise.
    pub async fn add(
        &self,
        product_id: ProductId,
        size: ShoeSize,
        quantity: u32,
    ) -> Result<(), ClientError> {
        validate_quantity(quantity)?;

        let _guard = self.inner.mutation_lock.lock().await;
        let api = Arc::clone(&self.inner.api);
        let items = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            let size = size.clone();
            async move { api.add_item(&credential, product_id, size, quantity).await }
        })
        .await?;
        self.replace(items);
        Ok(())
    }

    /// Remove a line by its server-assigned id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown id,
    /// [`ClientError::NotAuthenticated`] when anonymous, or the API error
    /// otherwise.
    pub async fn remove(&self, line_item_id: LineItemId) -> Result<(), ClientError> {
        let _guard = self.inner.mutation_lock.lock().await;
        let api = Arc::clone(&self.inner.api);
        let items = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            async move { api.remove_item(&credential, line_item_id).await }
        })
        .await?;
        self.replace(items);
        Ok(())
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a quantity outside [1, 99]
    /// (no request is issued), [`ClientError::NotFound`] for an unknown id,
    /// [`ClientError::NotAuthenticated`] when anonymous, or the API error
    /// otherwise.
    pub async fn set_quantity(
        &self,
        line_item_id: LineItemId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        validate_quantity(quantity)?;

        let _guard = self.inner.mutation_lock.lock().await;
        let api = Arc::clone(&self.inner.api);
        let items = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            async move {
                api.update_quantity(&credential, line_item_id, quantity)
                    .await
            }
        })
        .await?;
        self.replace(items);
        Ok(())
    }

    /// Remove every line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when anonymous, or the API
    /// error otherwise.
    pub async fn clear(&self) -> Result<(), ClientError> {
        let _guard = self.inner.mutation_lock.lock().await;
        let api = Arc::clone(&self.inner.api);
        let items = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            async move { api.clear(&credential).await }
        })
        .await?;
        self.replace(items);
        Ok(())
    }

    /// Drop the snapshot without a network call (session teardown).
    pub fn clear_local(&self) {
        self.replace(Vec::new());
    }

    // =========================================================================
    // Reads (lock-free of the mutation queue)
    // =========================================================================

    /// The current snapshot.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.inner.items.read().map_or_else(|_| Vec::new(), |g| g.clone())
    }

    /// Number of line items. This is the cart badge count.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.inner.items.read().map_or(0, |g| g.len())
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.inner
            .items
            .read()
            .map_or(0, |g| g.iter().map(|item| item.quantity).sum())
    }

    /// Σ price × quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        let amount = self.inner.items.read().map_or(Decimal::ZERO, |g| {
            g.iter().map(LineItem::line_total).sum()
        });
        Money::new(amount, CurrencyCode::INR)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    /// Whether a (product, size) pairing is already in the cart.
    ///
    /// Relies on the server's one-line-per-pair invariant.
    #[must_use]
    pub fn contains(&self, product_id: ProductId, size: &ShoeSize) -> bool {
        self.line_id_for(product_id, size).is_some()
    }

    /// The line id for a (product, size) pairing, if present.
    #[must_use]
    pub fn line_id_for(&self, product_id: ProductId, size: &ShoeSize) -> Option<LineItemId> {
        self.inner.items.read().ok().and_then(|g| {
            g.iter()
                .find(|item| item.product_id == product_id && &item.size == size)
                .map(|item| item.id)
        })
    }

    fn replace(&self, items: Vec<LineItem>) {
        if let Ok(mut guard) = self.inner.items.write() {
            *guard = items;
        }
    }
}

fn validate_quantity(quantity: u32) -> Result<(), ClientError> {
    if (MIN_QUANTITY..=MAX_QUANTITY).contains(&quantity) {
        Ok(())
    } else {
        Err(ClientError::Validation(format!(
            "quantity must be between {MIN_QUANTITY} and {MAX_QUANTITY}, got {quantity}"
        )))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicI64, Ordering};

    use async_trait::async_trait;
    use secrecy::{ExposeSecret, SecretString};

    use sole_trader_core::{Email, UserId};

    use crate::api::auth::MockAuthApi;
    use crate::api::cart::MockCartApi;
    use crate::api::types::{AuthTokens, UserProfile};
    use crate::session::{MemoryCredentialStore, SessionManager};

    /// In-memory cart backend enforcing the server-side invariants: one line
    /// per (product, size), server-assigned line ids, full list returned
    /// from every call.
    struct InMemoryCartApi {
        items: StdMutex<Vec<LineItem>>,
        next_id: AtomicI64,
        valid_tokens: StdMutex<Vec<String>>,
    }

    impl InMemoryCartApi {
        fn new() -> Self {
            Self {
                items: StdMutex::new(Vec::new()),
                next_id: AtomicI64::new(1),
                valid_tokens: StdMutex::new(vec!["access-1".to_owned()]),
            }
        }

        fn check(&self, credential: &SecretString) -> Result<(), ClientError> {
            let tokens = self.valid_tokens.lock().unwrap();
            if tokens.iter().any(|t| t == credential.expose_secret()) {
                Ok(())
            } else {
                Err(ClientError::Unauthorized("invalid token".to_owned()))
            }
        }

        fn snapshot(&self) -> Vec<LineItem> {
            self.items.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CartApi for InMemoryCartApi {
        async fn get_cart(
            &self,
            credential: &SecretString,
        ) -> Result<Vec<LineItem>, ClientError> {
            self.check(credential)?;
            Ok(self.snapshot())
        }

        async fn add_item(
            &self,
            credential: &SecretString,
            product_id: ProductId,
            size: ShoeSize,
            quantity: u32,
        ) -> Result<Vec<LineItem>, ClientError> {
            self.check(credential)?;
            let mut items = self.items.lock().unwrap();
            if let Some(existing) = items
                .iter_mut()
                .find(|item| item.product_id == product_id && item.size == size)
            {
                existing.quantity = (existing.quantity + quantity).min(MAX_QUANTITY);
            } else {
                items.push(LineItem {
                    id: LineItemId::new(self.next_id.fetch_add(1, Ordering::SeqCst)),
                    product_id,
                    size,
                    quantity,
                    price: Decimal::new(199_900, 2),
                });
            }
            Ok(items.clone())
        }

        async fn remove_item(
            &self,
            credential: &SecretString,
            line_item_id: LineItemId,
        ) -> Result<Vec<LineItem>, ClientError> {
            self.check(credential)?;
            let mut items = self.items.lock().unwrap();
            let before = items.len();
            items.retain(|item| item.id != line_item_id);
            if items.len() == before {
                return Err(ClientError::NotFound(format!(
                    "cart item {line_item_id}"
                )));
            }
            Ok(items.clone())
        }

        async fn update_quantity(
            &self,
            credential: &SecretString,
            line_item_id: LineItemId,
            quantity: u32,
        ) -> Result<Vec<LineItem>, ClientError> {
            self.check(credential)?;
            let mut items = self.items.lock().unwrap();
            let item = items
                .iter_mut()
                .find(|item| item.id == line_item_id)
                .ok_or_else(|| ClientError::NotFound(format!("cart item {line_item_id}")))?;
            item.quantity = quantity;
            Ok(items.clone())
        }

        async fn clear(&self, credential: &SecretString) -> Result<Vec<LineItem>, ClientError> {
            self.check(credential)?;
            let mut items = self.items.lock().unwrap();
            items.clear();
            Ok(items.clone())
        }
    }

    fn tokens() -> AuthTokens {
        AuthTokens {
            user: UserProfile {
                id: UserId::new(1),
                name: "Asha".to_owned(),
                email: Email::parse("asha@example.com").unwrap(),
                is_admin: false,
            },
            access_token: "access-1".to_owned(),
            refresh_token: "refresh-1".to_owned(),
        }
    }

    async fn logged_in_session() -> SessionManager {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        let session =
            SessionManager::new(Arc::new(auth), Box::new(MemoryCredentialStore::default()));
        session.login("asha@example.com", "pw").await.unwrap();
        session
    }

    fn size(s: &str) -> ShoeSize {
        ShoeSize::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_repeated_add_merges_into_one_line() {
        let session = logged_in_session().await;
        let store = CartStore::new(Arc::new(InMemoryCartApi::new()), session);

        store.add(ProductId::new(42), size("10"), 2).await.unwrap();
        let items = store.items();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 2);

        store.add(ProductId::new(42), size("10"), 1).await.unwrap();
        let items = store.items();
        assert_eq!(items.len(), 1, "same (product, size) must not duplicate");
        assert_eq!(items.first().unwrap().quantity, 3);

        // Same product, different size gets its own line
        store.add(ProductId::new(42), size("9"), 1).await.unwrap();
        assert_eq!(store.line_count(), 2);
    }

    #[tokio::test]
    async fn test_example_scenario_add_add_remove() {
        let session = logged_in_session().await;
        let store = CartStore::new(Arc::new(InMemoryCartApi::new()), session);

        assert!(store.is_empty());
        store.add(ProductId::new(42), size("10"), 2).await.unwrap();
        store.add(ProductId::new(42), size("10"), 1).await.unwrap();

        let line_id = store
            .line_id_for(ProductId::new(42), &size("10"))
            .expect("line must exist");
        store.remove(line_id).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_cart_empty_after_clear() {
        let session = logged_in_session().await;
        let store = CartStore::new(Arc::new(InMemoryCartApi::new()), session);

        store.add(ProductId::new(1), size("8"), 1).await.unwrap();
        store.add(ProductId::new(2), size("9"), 2).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.is_empty());

        store.refresh().await.unwrap();
        assert!(store.is_empty(), "server cart must be empty after clear");
    }

    #[tokio::test]
    async fn test_quantity_bounds_rejected_without_network_call() {
        let session = logged_in_session().await;
        let mut api = MockCartApi::new();
        api.expect_update_quantity().never();
        api.expect_add_item().never();
        let store = CartStore::new(Arc::new(api), session);

        let err = store
            .set_quantity(LineItemId::new(1), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = store
            .set_quantity(LineItemId::new(1), 100)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));

        let err = store
            .add(ProductId::new(1), size("8"), 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_anonymous_mutation_rejected_locally() {
        let session = SessionManager::new(
            Arc::new(MockAuthApi::new()),
            Box::new(MemoryCredentialStore::default()),
        );
        let mut api = MockCartApi::new();
        api.expect_add_item().never();
        api.expect_get_cart().never();
        let store = CartStore::new(Arc::new(api), session);

        let err = store
            .add(ProductId::new(42), size("10"), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_remove_unknown_line_is_not_found() {
        let session = logged_in_session().await;
        let store = CartStore::new(Arc::new(InMemoryCartApi::new()), session);

        let err = store.remove(LineItemId::new(999)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_derived_counts_and_subtotal() {
        let session = logged_in_session().await;
        let store = CartStore::new(Arc::new(InMemoryCartApi::new()), session);

        store.add(ProductId::new(1), size("8"), 2).await.unwrap();
        store.add(ProductId::new(2), size("9"), 3).await.unwrap();

        // Badge count is the number of lines, not the quantity sum
        assert_eq!(store.line_count(), 2);
        assert_eq!(store.total_quantity(), 5);
        // 5 × 1999.00
        assert_eq!(store.subtotal().amount, Decimal::new(999_500, 2));
    }

    #[tokio::test]
    async fn test_expired_token_refreshes_once_and_retries() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        auth.expect_refresh()
            .times(1)
            .returning(|_| Ok("access-2".to_owned()));
        let session =
            SessionManager::new(Arc::new(auth), Box::new(MemoryCredentialStore::default()));
        session.login("asha@example.com", "pw").await.unwrap();

        let api = Arc::new(InMemoryCartApi::new());
        // The backend stops honoring the first token; only access-2 works.
        *api.valid_tokens.lock().unwrap() = vec!["access-2".to_owned()];

        let store = CartStore::new(Arc::clone(&api) as Arc<dyn CartApi>, session.clone());
        store.add(ProductId::new(7), size("11"), 1).await.unwrap();
        assert_eq!(store.line_count(), 1);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_session_teardown_clears_cart_state() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        let session =
            SessionManager::new(Arc::new(auth), Box::new(MemoryCredentialStore::default()));
        session.login("asha@example.com", "pw").await.unwrap();

        let store = CartStore::new(Arc::new(InMemoryCartApi::new()), session.clone());
        session.on_teardown({
            let store = store.clone();
            move || store.clear_local()
        });

        store.add(ProductId::new(1), size("8"), 1).await.unwrap();
        assert_eq!(store.line_count(), 1);

        session.logout();
        assert!(store.is_empty());
        assert!(matches!(
            store.refresh().await,
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_clear_local_drops_snapshot_only() {
        let session = logged_in_session().await;
        let api = Arc::new(InMemoryCartApi::new());
        let store = CartStore::new(Arc::clone(&api) as Arc<dyn CartApi>, session);

        store.add(ProductId::new(1), size("8"), 1).await.unwrap();
        store.clear_local();
        assert!(store.is_empty());
        // server still has the line
        assert_eq!(api.snapshot().len(), 1);
    }
}
