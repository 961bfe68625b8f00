//! Session state machine and durable credential storage.
//!
//! The session is either `Anonymous` (no credential, all cart/wishlist
//! mutations rejected locally) or `Authenticated` (bearer credential attached
//! to every outgoing request). Login persists the tokens to durable storage
//! so a session survives process restarts; cart and wishlist contents are
//! never persisted - they are re-fetched from the server on session
//! establishment.
//!
//! A 401 from any endpoint is recovered by exchanging the refresh token for
//! a new access token exactly once. If the refresh itself is refused, the
//! session is torn down: durable storage cleared, in-memory state dropped,
//! and teardown listeners notified so the stores clear their state.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use sole_trader_core::Email;

use crate::api::AuthApi;
use crate::api::types::{RegistrationRequest, UserProfile};
use crate::error::ClientError;

// =============================================================================
// Durable storage
// =============================================================================

/// Tokens and profile persisted across process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSession {
    pub user: UserProfile,
    pub access_token: String,
    pub refresh_token: String,
}

/// Durable storage for the session credential.
pub trait CredentialStore: Send + Sync {
    /// Load the persisted session, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    fn load(&self) -> Result<Option<StoredSession>, ClientError>;

    /// Persist the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    fn save(&self, session: &StoredSession) -> Result<(), ClientError>;

    /// Remove any persisted session.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage backend fails.
    fn clear(&self) -> Result<(), ClientError>;
}

/// JSON-file credential store.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store backed by the given file path.
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::Storage(e)),
        };
        let session = serde_json::from_str(&raw)?;
        Ok(Some(session))
    }

    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ClientError::Storage(e)),
        }
    }
}

/// In-memory credential store, for tests and tools that must not touch disk.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    session: Mutex<Option<StoredSession>>,
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<StoredSession>, ClientError> {
        Ok(self.session.lock().map_or(None, |s| s.clone()))
    }

    fn save(&self, session: &StoredSession) -> Result<(), ClientError> {
        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(session.clone());
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        if let Ok(mut slot) = self.session.lock() {
            *slot = None;
        }
        Ok(())
    }
}

// =============================================================================
// Session manager
// =============================================================================

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No credential; mutations are rejected locally.
    Anonymous,
    /// Credential present; attached to every outgoing request.
    Authenticated(UserProfile),
}

struct ActiveSession {
    user: UserProfile,
    access_token: SecretString,
    refresh_token: SecretString,
}

type TeardownListener = Box<dyn Fn() + Send + Sync>;

/// Holds the current credential and user identity, and gates whether
/// cart/wishlist/order operations are permitted.
///
/// Cheaply cloneable; clones share state.
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    auth: Arc<dyn AuthApi>,
    store: Box<dyn CredentialStore>,
    active: RwLock<Option<ActiveSession>>,
    listeners: Mutex<Vec<TeardownListener>>,
}

impl SessionManager {
    /// Create a session manager in the `Anonymous` state.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthApi>, store: Box<dyn CredentialStore>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                auth,
                store,
                active: RwLock::new(None),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// Restore a persisted session from durable storage, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if durable storage cannot be read.
    pub fn hydrate(&self) -> Result<SessionState, ClientError> {
        let Some(stored) = self.inner.store.load()? else {
            return Ok(SessionState::Anonymous);
        };

        let user = stored.user.clone();
        self.set_active(ActiveSession {
            user: stored.user,
            access_token: stored.access_token.into(),
            refresh_token: stored.refresh_token.into(),
        });
        tracing::debug!(user = %user.email, "Restored persisted session");
        Ok(SessionState::Authenticated(user))
    }

    /// Log in with email and password.
    ///
    /// On success the tokens are persisted durably and the session becomes
    /// `Authenticated`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a malformed email,
    /// [`ClientError::Unauthorized`] for wrong credentials, or another error
    /// if the request or storage fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile, ClientError> {
        let email = Email::parse(email).map_err(|e| ClientError::Validation(e.to_string()))?;

        let tokens = self.inner.auth.login(email, password.to_owned()).await?;

        self.inner.store.save(&StoredSession {
            user: tokens.user.clone(),
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        })?;

        let user = tokens.user.clone();
        self.set_active(ActiveSession {
            user: tokens.user,
            access_token: tokens.access_token.into(),
            refresh_token: tokens.refresh_token.into(),
        });
        tracing::info!(user = %user.email, "Logged in");
        Ok(user)
    }

    /// Create a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] for a malformed email or a
    /// rejected registration, or another error if the request fails.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ClientError> {
        let email = Email::parse(email).map_err(|e| ClientError::Validation(e.to_string()))?;
        self.inner
            .auth
            .register(RegistrationRequest {
                name: name.to_owned(),
                email,
                password: password.to_owned(),
            })
            .await
    }

    /// Log out: clear durable storage, drop in-memory state, notify
    /// teardown listeners.
    pub fn logout(&self) {
        self.teardown();
    }

    /// Current observable state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.inner.active.read().map_or(SessionState::Anonymous, |guard| {
            guard
                .as_ref()
                .map_or(SessionState::Anonymous, |active| {
                    SessionState::Authenticated(active.user.clone())
                })
        })
    }

    /// Whether a credential is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.state(), SessionState::Authenticated(_))
    }

    /// The logged-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        match self.state() {
            SessionState::Authenticated(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    /// The bearer credential for outgoing requests.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] when the session is
    /// `Anonymous` - the local gate that blocks mutations without a network
    /// call.
    pub fn credential(&self) -> Result<SecretString, ClientError> {
        self.inner
            .active
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .as_ref()
                    .map(|active| active.access_token.expose_secret().into())
            })
            .ok_or(ClientError::NotAuthenticated)
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// Called by the stores after a 401. On success the new credential is
    /// stored (memory and durable) and returned for the retry. On failure
    /// the session is torn down.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotAuthenticated`] if no session is active, or
    /// [`ClientError::Unauthorized`] if the refresh was refused.
    pub async fn refresh(&self) -> Result<SecretString, ClientError> {
        let refresh_token = self
            .inner
            .active
            .read()
            .ok()
            .and_then(|guard| {
                guard
                    .as_ref()
                    .map(|active| SecretString::from(active.refresh_token.expose_secret()))
            })
            .ok_or(ClientError::NotAuthenticated)?;

        match self.inner.auth.refresh(&refresh_token).await {
            Ok(access_token) => {
                self.replace_access_token(&access_token);
                Ok(SecretString::from(access_token))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, tearing down session");
                self.teardown();
                Err(ClientError::Unauthorized("session expired".to_owned()))
            }
        }
    }

    /// Register a callback to run when the session is torn down (logout or
    /// unrecoverable authorization failure).
    pub fn on_teardown(&self, listener: impl Fn() + Send + Sync + 'static) {
        if let Ok(mut listeners) = self.inner.listeners.lock() {
            listeners.push(Box::new(listener));
        }
    }

    /// Tear the session down after an unrecoverable authorization failure.
    pub(crate) fn teardown(&self) {
        if let Err(e) = self.inner.store.clear() {
            tracing::warn!(error = %e, "Failed to clear durable session storage");
        }
        if let Ok(mut guard) = self.inner.active.write() {
            *guard = None;
        }
        if let Ok(listeners) = self.inner.listeners.lock() {
            for listener in listeners.iter() {
                listener();
            }
        }
        tracing::info!("Session torn down");
    }

    fn set_active(&self, active: ActiveSession) {
        if let Ok(mut guard) = self.inner.active.write() {
            *guard = Some(active);
        }
    }

    fn replace_access_token(&self, access_token: &str) {
        if let Ok(mut guard) = self.inner.active.write()
            && let Some(active) = guard.as_mut()
        {
            active.access_token = SecretString::from(access_token);

            let stored = StoredSession {
                user: active.user.clone(),
                access_token: access_token.to_owned(),
                refresh_token: active.refresh_token.expose_secret().to_owned(),
            };
            drop(guard);
            if let Err(e) = self.inner.store.save(&stored) {
                tracing::warn!(error = %e, "Failed to persist refreshed session");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use sole_trader_core::UserId;

    use crate::api::auth::MockAuthApi;
    use crate::api::types::AuthTokens;

    fn profile() -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            name: "Asha".to_owned(),
            email: Email::parse("asha@example.com").unwrap(),
            is_admin: false,
        }
    }

    fn tokens() -> AuthTokens {
        AuthTokens {
            user: profile(),
            access_token: "access-1".to_owned(),
            refresh_token: "refresh-1".to_owned(),
        }
    }

    fn manager(auth: MockAuthApi) -> SessionManager {
        SessionManager::new(Arc::new(auth), Box::new(MemoryCredentialStore::default()))
    }

    #[tokio::test]
    async fn test_login_transitions_to_authenticated() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        let session = manager(auth);

        assert!(!session.is_authenticated());
        let user = session.login("asha@example.com", "hunter22").await.unwrap();
        assert_eq!(user, profile());
        assert_eq!(session.state(), SessionState::Authenticated(profile()));
        assert!(session.credential().is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_email_without_calling_api() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().never();
        let session = manager(auth);

        let err = session.login("not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn test_credential_when_anonymous() {
        let session = manager(MockAuthApi::new());
        assert!(matches!(
            session.credential(),
            Err(ClientError::NotAuthenticated)
        ));
    }

    #[tokio::test]
    async fn test_hydrate_restores_persisted_session() {
        let store = MemoryCredentialStore::default();
        store
            .save(&StoredSession {
                user: profile(),
                access_token: "access-1".to_owned(),
                refresh_token: "refresh-1".to_owned(),
            })
            .unwrap();

        let session = SessionManager::new(Arc::new(MockAuthApi::new()), Box::new(store));
        let state = session.hydrate().unwrap();
        assert_eq!(state, SessionState::Authenticated(profile()));
        assert_eq!(
            session.credential().unwrap().expose_secret(),
            "access-1"
        );
    }

    #[tokio::test]
    async fn test_refresh_replaces_access_token() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        auth.expect_refresh()
            .returning(|_| Ok("access-2".to_owned()));
        let session = manager(auth);

        session.login("asha@example.com", "pw").await.unwrap();
        let new_credential = session.refresh().await.unwrap();
        assert_eq!(new_credential.expose_secret(), "access-2");
        assert_eq!(
            session.credential().unwrap().expose_secret(),
            "access-2"
        );
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn test_failed_refresh_tears_down_and_notifies() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        auth.expect_refresh()
            .returning(|_| Err(ClientError::Unauthorized("refresh expired".to_owned())));
        let session = manager(auth);

        let fired = Arc::new(AtomicUsize::new(0));
        let fired_clone = Arc::clone(&fired);
        session.on_teardown(move || {
            fired_clone.fetch_add(1, Ordering::SeqCst);
        });

        session.login("asha@example.com", "pw").await.unwrap();
        let err = session.refresh().await.unwrap_err();
        assert!(matches!(err, ClientError::Unauthorized(_)));
        assert!(!session.is_authenticated());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_logout_clears_durable_storage() {
        let mut auth = MockAuthApi::new();
        auth.expect_login().returning(|_, _| Ok(tokens()));
        let session = manager(auth);

        session.login("asha@example.com", "pw").await.unwrap();
        session.logout();
        assert!(!session.is_authenticated());
        // a second hydrate finds nothing
        assert_eq!(session.hydrate().unwrap(), SessionState::Anonymous);
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCredentialStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().unwrap().is_none());

        let stored = StoredSession {
            user: profile(),
            access_token: "a".to_owned(),
            refresh_token: "r".to_owned(),
        };
        store.save(&stored).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.user, profile());
        assert_eq!(loaded.access_token, "a");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // clearing twice is fine
        store.clear().unwrap();
    }
}
