//! Unified error handling for the shop client.
//!
//! Every fallible SDK operation returns [`ClientError`]. Validation failures
//! are raised before any network traffic; authorization failures feed the
//! session teardown path; nothing is silently swallowed.

use thiserror::Error;

/// Errors that can occur when talking to the shop API or mutating local state.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No credential is present; the operation was rejected locally without
    /// issuing a request.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The server rejected the credential (HTTP 401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Resource not found (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before transmission, or by the server as malformed
    /// (HTTP 400/422).
    #[error("validation error: {0}")]
    Validation(String),

    /// HTTP transport failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server failed (HTTP 5xx) or answered with an unexpected status.
    #[error("server error (HTTP {status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        message: String,
    },

    /// Rate limited by the server.
    #[error("rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Durable session storage failed.
    #[error("session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl ClientError {
    /// Whether this error signals an invalid or expired credential.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::Unauthorized(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::NotFound("line item 9".to_string());
        assert_eq!(err.to_string(), "not found: line item 9");

        let err = ClientError::Validation("quantity must be 1-99".to_string());
        assert_eq!(err.to_string(), "validation error: quantity must be 1-99");

        let err = ClientError::Server {
            status: 503,
            message: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "server error (HTTP 503): maintenance");
    }

    #[test]
    fn test_rate_limited_display() {
        let err = ClientError::RateLimited(30);
        assert_eq!(err.to_string(), "rate limited, retry after 30 seconds");
    }

    #[test]
    fn test_is_auth_failure() {
        assert!(ClientError::NotAuthenticated.is_auth_failure());
        assert!(ClientError::Unauthorized("expired".into()).is_auth_failure());
        assert!(!ClientError::NotFound("x".into()).is_auth_failure());
    }
}
