//! Client-side wishlist state.
//!
//! The wishlist is the one place that applies optimistic local mutation:
//! `toggle` flips membership immediately, then calls the server, and rolls
//! back to the exact pre-toggle membership on failure. Toggles for the same
//! product are serialized behind a per-product lock so rapid repeated
//! toggles cannot lose updates; toggles for different products may overlap.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;

use sole_trader_core::ProductId;

use super::with_credential_retry;
use crate::api::WishlistApi;
use crate::error::ClientError;
use crate::session::SessionManager;

/// Owns the in-memory wishlist membership set.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct WishlistStore {
    inner: Arc<WishlistStoreInner>,
}

struct WishlistStoreInner {
    api: Arc<dyn WishlistApi>,
    session: SessionManager,
    members: RwLock<HashSet<ProductId>>,
    /// One lock per product: at most one in-flight toggle per id.
    in_flight: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl WishlistStore {
    /// Create an empty wishlist store.
    #[must_use]
    pub fn new(api: Arc<dyn WishlistApi>, session: SessionManager) -> Self {
        Self {
            inner: Arc::new(WishlistStoreInner {
                api,
                session,
                members: RwLock::new(HashSet::new()),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Re-fetch the wishlist from the server and replace local membership.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when anonymous, or the API
    /// error otherwise.
    pub async fn refresh(&self) -> Result<(), ClientError> {
        let api = Arc::clone(&self.inner.api);
        let entries = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            async move { api.get_wishlist(&credential).await }
        })
        .await?;

        if let Ok(mut members) = self.inner.members.write() {
            *members = entries.into_iter().map(|entry| entry.product_id).collect();
        }
        Ok(())
    }

    /// Flip membership of a product, optimistically.
    ///
    /// Local membership changes before the request is sent. On failure the
    /// pre-toggle membership is restored exactly and the error surfaced.
    /// Returns the new membership on success (`true` = now in the wishlist).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when anonymous (no request
    /// issued), or the API error after rollback otherwise.
    pub async fn toggle(&self, product_id: ProductId) -> Result<bool, ClientError> {
        // Gate before touching local state: anonymous toggles must not
        // flicker the UI.
        self.inner.session.credential()?;

        let product_lock = self.lock_for(product_id).await;
        let _guard = product_lock.lock().await;

        let was_present = self.apply_flip(product_id);

        let api = Arc::clone(&self.inner.api);
        let result = with_credential_retry(&self.inner.session, move |credential| {
            let api = Arc::clone(&api);
            async move { api.toggle(&credential, product_id).await }
        })
        .await;

        match result {
            Ok(()) => Ok(!was_present),
            Err(e) => {
                self.restore(product_id, was_present);
                Err(e)
            }
        }
    }

    /// Whether a product is currently believed to be in the wishlist.
    #[must_use]
    pub fn is_in_wishlist(&self, product_id: ProductId) -> bool {
        self.inner
            .members
            .read()
            .is_ok_and(|members| members.contains(&product_id))
    }

    /// Product ids currently in the wishlist, in ascending order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        let mut ids: Vec<ProductId> = self
            .inner
            .members
            .read()
            .map_or_else(|_| Vec::new(), |members| members.iter().copied().collect());
        ids.sort_unstable();
        ids
    }

    /// Number of wishlist entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.members.read().map_or(0, |members| members.len())
    }

    /// Whether the wishlist is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop local membership without a network call (session teardown).
    pub fn clear_local(&self) {
        if let Ok(mut members) = self.inner.members.write() {
            members.clear();
        }
    }

    async fn lock_for(&self, product_id: ProductId) -> Arc<Mutex<()>> {
        let mut map = self.inner.in_flight.lock().await;
        Arc::clone(map.entry(product_id).or_default())
    }

    /// Flip membership and return the previous state.
    fn apply_flip(&self, product_id: ProductId) -> bool {
        self.inner.members.write().map_or(false, |mut members| {
            if members.remove(&product_id) {
                true
            } else {
                members.insert(product_id);
                false
            }
        })
    }

    /// Restore the exact pre-toggle membership.
    fn restore(&self, product_id: ProductId, was_present: bool) {
        if let Ok(mut members) = self.inner.members.write() {
            if was_present {
                members.insert(product_id);
            } else {
                members.remove(&product_id);
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex as StdMutex;

    use async_trait::async_trait;
    use secrecy::SecretString;

    use sole_trader_core::{Email, UserId};

    use crate::api::auth::MockAuthApi;
    use crate::api::types::{AuthTokens, UserProfile, WishlistEntry};
    use crate::api::wishlist::MockWishlistApi;
    use crate::session::{MemoryCredentialStore, SessionManager};

    /// In-memory wishlist backend: toggle flips membership, idempotent from
    /// the server's perspective.
    #[derive(Default)]
    struct InMemoryWishlistApi {
        members: StdMutex<HashSet<ProductId>>,
    }

    #[async_trait]
    impl WishlistApi for InMemoryWishlistApi {
        async fn get_wishlist(
            &self,
            _credential: &SecretString,
        ) -> Result<Vec<WishlistEntry>, ClientError> {
            Ok(self
                .members
                .lock()
                .unwrap()
                .iter()
                .map(|&product_id| WishlistEntry { product_id })
                .collect())
        }

        async fn toggle(
            &self,
            _credential: &SecretString,
            product_id: ProductId,
        ) -> Result<(), ClientError> {
            let mut members = self.members.lock().unwrap();
            if !members.remove(&product_id) {
                members.insert(product_id);
            }
            Ok(())
        }
    }

    /// Wishlist backend that always fails its network call.
    struct FailingWishlistApi;

    #[async_trait]
    impl WishlistApi for FailingWishlistApi {
        async fn get_wishlist(
            &self,
            _credential: &SecretString,
        ) -> Result<Vec<WishlistEntry>, ClientError> {
            Err(ClientError::Server {
                status: 503,
                message: "down".to_owned(),
            })
        }

        async fn toggle(
            &self,
            _credential: &SecretString,
            _product_id: ProductId,
        ) -> Result<(), ClientError> {
            Err(ClientError::Server {
                status: 503,
                message: "down".to_owned(),
            })
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

    #[tokio::test]
    async fn test_double_toggle_restores_original_membership() {
        let session = logged_in_session().await;
        let store = WishlistStore::new(Arc::new(InMemoryWishlistApi::default()), session);
        let product = ProductId::new(42);

        assert!(!store.is_in_wishlist(product));
        assert!(store.toggle(product).await.unwrap());
        assert!(store.is_in_wishlist(product));
        assert!(!store.toggle(product).await.unwrap());
        assert!(!store.is_in_wishlist(product));
    }

    #[tokio::test]
    async fn test_failed_toggle_rolls_back_exactly() {
        let session = logged_in_session().await;
        let store = WishlistStore::new(Arc::new(FailingWishlistApi), session);
        let product = ProductId::new(42);

        // absent -> optimistic add -> failure -> absent again
        let err = store.toggle(product).await.unwrap_err();
        assert!(matches!(err, ClientError::Server { .. }));
        assert!(!store.is_in_wishlist(product));
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn test_failed_toggle_rolls_back_to_present() {
        let session = logged_in_session().await;
        let api = Arc::new(InMemoryWishlistApi::default());
        let store = WishlistStore::new(
            Arc::clone(&api) as Arc<dyn WishlistApi>,
            session.clone(),
        );
        let product = ProductId::new(7);

        store.toggle(product).await.unwrap();
        assert!(store.is_in_wishlist(product));

        // present -> optimistic remove -> failure -> present again
        let failing = WishlistStore::new(Arc::new(FailingWishlistApi), session);
        // seed the failing store with the same membership
        failing.apply_flip(product);
        assert!(failing.is_in_wishlist(product));

        let err = failing.toggle(product).await.unwrap_err();
        assert!(matches!(err, ClientError::Server { .. }));
        assert!(
            failing.is_in_wishlist(product),
            "rollback must restore membership, not just undo an add"
        );
    }

    #[tokio::test]
    async fn test_anonymous_toggle_rejected_without_network_call() {
        let session = SessionManager::new(
            Arc::new(MockAuthApi::new()),
            Box::new(MemoryCredentialStore::default()),
        );
        let mut api = MockWishlistApi::new();
        api.expect_toggle().never();
        let store = WishlistStore::new(Arc::new(api), session);

        let err = store.toggle(ProductId::new(42)).await.unwrap_err();
        assert!(matches!(err, ClientError::NotAuthenticated));
        assert!(!store.is_in_wishlist(ProductId::new(42)));
    }

    #[tokio::test]
    async fn test_concurrent_toggles_on_same_product_serialize() {
        let session = logged_in_session().await;
        let api = Arc::new(InMemoryWishlistApi::default());
        let store = WishlistStore::new(Arc::clone(&api) as Arc<dyn WishlistApi>, session);
        let product = ProductId::new(42);

        let (a, b) = tokio::join!(store.toggle(product), store.toggle(product));
        a.unwrap();
        b.unwrap();

        // Two toggles return to the original state, locally and server-side
        assert!(!store.is_in_wishlist(product));
        assert!(api.members.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_membership() {
        let session = logged_in_session().await;
        let api = Arc::new(InMemoryWishlistApi::default());
        api.members.lock().unwrap().insert(ProductId::new(1));
        api.members.lock().unwrap().insert(ProductId::new(2));

        let store = WishlistStore::new(Arc::clone(&api) as Arc<dyn WishlistApi>, session);
        store.refresh().await.unwrap();

        assert_eq!(
            store.product_ids(),
            vec![ProductId::new(1), ProductId::new(2)]
        );
    }
}
