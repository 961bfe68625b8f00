//! Client-side state stores.
//!
//! The stores own the in-memory view of server-side state. UI layers hold
//! read references and dispatch mutations; they never patch store contents
//! directly.

pub mod cart;
pub mod wishlist;

pub use cart::CartStore;
pub use wishlist::WishlistStore;

use std::future::Future;

use secrecy::SecretString;

use crate::error::ClientError;
use crate::session::SessionManager;

/// Run an authenticated API call with a single refresh-and-retry on 401.
///
/// The session gate runs first: when `Anonymous` this returns
/// [`ClientError::NotAuthenticated`] without invoking `op` at all. A 401
/// from the first attempt triggers one token refresh (which tears the
/// session down if it is refused); a 401 on the retry is unrecoverable and
/// also tears the session down.
pub(crate) async fn with_credential_retry<T, F, Fut>(
    session: &SessionManager,
    op: F,
) -> Result<T, ClientError>
where
    F: Fn(SecretString) -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let credential = session.credential()?;

    match op(credential).await {
        Err(ClientError::Unauthorized(_)) => {
            let credential = session.refresh().await?;
            match op(credential).await {
                Err(ClientError::Unauthorized(message)) => {
                    session.teardown();
                    Err(ClientError::Unauthorized(message))
                }
                other => other,
            }
        }
        other => other,
    }
}
