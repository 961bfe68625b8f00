//! Auth endpoints.
//!
//! Login yields a short-lived access token and a refresh token. The session
//! manager owns the refresh-on-401 flow; this module only speaks the wire
//! protocol.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use sole_trader_core::Email;

use super::ShopClient;
use super::types::{AuthTokens, LoginRequest, RefreshResponse, RegistrationRequest};
use crate::error::ClientError;

/// Authentication operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchange email and password for tokens and the user profile.
    async fn login(&self, email: Email, password: String) -> Result<AuthTokens, ClientError>;

    /// Create a new account.
    async fn register(&self, registration: RegistrationRequest) -> Result<(), ClientError>;

    /// Exchange a refresh token for a fresh access token.
    async fn refresh(&self, refresh_token: &SecretString) -> Result<String, ClientError>;
}

#[async_trait]
impl AuthApi for ShopClient {
    #[instrument(skip_all, fields(email = %email))]
    async fn login(&self, email: Email, password: String) -> Result<AuthTokens, ClientError> {
        let body = LoginRequest { email, password };
        let req = self
            .http()
            .post(self.endpoint(&["auth", "login"]))
            .json(&body);
        self.execute(req).await
    }

    #[instrument(skip_all, fields(email = %registration.email))]
    async fn register(&self, registration: RegistrationRequest) -> Result<(), ClientError> {
        let req = self
            .http()
            .post(self.endpoint(&["auth", "register"]))
            .json(&registration);
        self.execute_unit(req).await
    }

    #[instrument(skip_all)]
    async fn refresh(&self, refresh_token: &SecretString) -> Result<String, ClientError> {
        let body = serde_json::json!({ "refreshToken": refresh_token.expose_secret() });
        let req = self
            .http()
            .post(self.endpoint(&["auth", "refresh-token"]))
            .json(&body);
        let response: RefreshResponse = self.execute(req).await?;
        Ok(response.access_token)
    }
}
