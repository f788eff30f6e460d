//! Error types for the Martian client.

use std::time::Duration;

use thiserror::Error;

/// Errors from SDK operations.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The client is missing configuration (credentials, URLs).
    #[error("client not configured: {0}")]
    NotConfigured(String),

    /// A judge spec failed local validation.
    #[error("invalid judge spec: {0}")]
    Spec(#[from] martian_core::SpecError),

    /// A routing constraint failed local validation.
    #[error("invalid routing constraint: {0}")]
    Constraint(#[from] martian_core::ConstraintError),

    /// A caller-chosen resource id the API would reject.
    #[error(transparent)]
    Id(#[from] martian_core::IdError),

    /// Transport-level failure (connection, DNS, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The request exceeded its timeout.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// HTTP 429 from the API.
    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    /// HTTP 401/403 from the API.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// HTTP 404 from the API.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// HTTP 409, or a pre-create existence check tripped.
    #[error("resource already exists: {0}")]
    AlreadyExists(String),

    /// Any other non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected JSON.
    #[error("failed to parse response: {0}")]
    Parse(String),

    /// A training job did not reach a terminal status within the poll
    /// timeout. The job keeps running server-side; polling can be resumed.
    #[error("training job {job} did not complete within {waited:?}")]
    PollTimeout { job: String, waited: Duration },
}

impl ClientError {
    /// Whether a retry could plausibly succeed. Gates the transport's
    /// backoff loop; auth and not-found failures are never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimited { .. } => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ClientError::Network("reset".to_string()).is_retryable());
        assert!(ClientError::Timeout(Duration::from_secs(5)).is_retryable());
        assert!(ClientError::RateLimited { retry_after: None }.is_retryable());
        assert!(ClientError::Api {
            status: 503,
            message: "unavailable".to_string()
        }
        .is_retryable());

        assert!(!ClientError::Auth("bad key".to_string()).is_retryable());
        assert!(!ClientError::NotFound("judges/x".to_string()).is_retryable());
        assert!(!ClientError::Api {
            status: 400,
            message: "bad request".to_string()
        }
        .is_retryable());
    }
}
