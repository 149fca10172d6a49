//! Error types for the row store
//!
//! Classifies remote failures so the adapter can decide between retrying
//! and surfacing:
//! - Transport failures (service unreachable)
//! - Access denial
//! - Rate limiting and transient API errors
//! - Rejected requests and malformed responses

/// Errors raised by a [`RowStore`](crate::RowStore) implementation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Remote service could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Remote service denied access (bad or expired credentials)
    #[error("access denied: {0}")]
    Denied(String),

    /// Remote service asked us to slow down
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Transient server-side failure
    #[error("transient store error: {0}")]
    Transient(String),

    /// Request was rejected and will not succeed on retry
    #[error("request rejected (status {status}): {message}")]
    Rejected {
        /// HTTP-like status code
        status: u16,
        /// Remote message
        message: String,
    },

    /// Response could not be interpreted
    #[error("malformed store response: {0}")]
    Malformed(String),
}

impl StoreError {
    /// Check whether the failure may clear up on its own
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Unavailable(_) | Self::RateLimited(_) | Self::Transient(_)
        )
    }

    /// Classify an HTTP status code returned by the remote service
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => Self::Denied(message),
            429 => Self::RateLimited(message),
            500..=599 => Self::Transient(message),
            _ => Self::Rejected { status, message },
        }
    }
}
