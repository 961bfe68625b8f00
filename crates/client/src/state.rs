//! Shared application state.
//!
//! [`Shop`] is the single manager instance injected into all consumers. It
//! wires the API client, session manager, and stores together, including the
//! teardown path: when the session ends (logout or unrecoverable 401), the
//! cart and wishlist drop their in-memory state.

use std::sync::Arc;

use crate::api::ShopClient;
use crate::config::ShopConfig;
use crate::error::ClientError;
use crate::session::{FileCredentialStore, SessionManager, SessionState};
use crate::store::{CartStore, WishlistStore};

/// Application state shared across all consumers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct Shop {
    inner: Arc<ShopInner>,
}

struct ShopInner {
    config: ShopConfig,
    client: ShopClient,
    session: SessionManager,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl Shop {
    /// Wire up the client, session, and stores from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: ShopConfig) -> Result<Self, ClientError> {
        let client = ShopClient::new(&config)?;

        let session = SessionManager::new(
            Arc::new(client.clone()),
            Box::new(FileCredentialStore::new(config.session_file.clone())),
        );
        let cart = CartStore::new(Arc::new(client.clone()), session.clone());
        let wishlist = WishlistStore::new(Arc::new(client.clone()), session.clone());

        session.on_teardown({
            let cart = cart.clone();
            move || cart.clear_local()
        });
        session.on_teardown({
            let wishlist = wishlist.clone();
            move || wishlist.clear_local()
        });

        Ok(Self {
            inner: Arc::new(ShopInner {
                config,
                client,
                session,
                cart,
                wishlist,
            }),
        })
    }

    /// Hydrate the session from durable storage and, when authenticated,
    /// prime the cart and wishlist from the server.
    ///
    /// Failures to prime the stores are logged and tolerated - the session
    /// stays up and the stores start empty.
    ///
    /// # Errors
    ///
    /// Returns an error if durable session storage cannot be read.
    pub async fn init(&self) -> Result<SessionState, ClientError> {
        let state = self.session().hydrate()?;

        if matches!(state, SessionState::Authenticated(_)) {
            if let Err(e) = self.cart().refresh().await {
                tracing::warn!(error = %e, "Failed to load cart on session establishment");
            }
            if let Err(e) = self.wishlist().refresh().await {
                tracing::warn!(error = %e, "Failed to load wishlist on session establishment");
            }
        }

        Ok(state)
    }

    /// Get a reference to the configuration.
    #[must_use]
    pub fn config(&self) -> &ShopConfig {
        &self.inner.config
    }

    /// Get a reference to the shop API client.
    #[must_use]
    pub fn client(&self) -> &ShopClient {
        &self.inner.client
    }

    /// Get a reference to the session manager.
    #[must_use]
    pub fn session(&self) -> &SessionManager {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }
}
