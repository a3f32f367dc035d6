//! # Gateway Errors
//!
//! Error types for counterparty gateway operations.
//!
//! This module provides error types for message submission and history
//! fetching against a PFI's message endpoint.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::infrastructure::gateway::error::GatewayError;
//!
//! let error = GatewayError::timeout("request timed out after 5000ms");
//! assert!(error.is_retryable());
//!
//! let error = GatewayError::rejected("rfq references an unknown offering");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for counterparty gateway operations.
///
/// Transient transport failures are retryable; an explicit refusal from the
/// counterparty is final and must not be retried.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Request timed out.
    #[error("gateway timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
        /// Timeout duration in milliseconds.
        timeout_ms: Option<u64>,
    },

    /// Network or connection error.
    #[error("gateway connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("gateway rate limit exceeded: {message}")]
    RateLimited {
        /// Error message.
        message: String,
        /// Retry after duration in milliseconds.
        retry_after_ms: Option<u64>,
    },

    /// Authentication or authorization failure.
    #[error("gateway authentication error: {message}")]
    Authentication {
        /// Error message.
        message: String,
    },

    /// The counterparty refused the submitted message.
    #[error("gateway rejected message: {reason}")]
    Rejected {
        /// Why the message was refused.
        reason: String,
    },

    /// Protocol or format error.
    #[error("gateway protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Internal gateway error.
    #[error("gateway internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl GatewayError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: None,
        }
    }

    /// Creates a timeout error with duration.
    #[must_use]
    pub fn timeout_with_duration(message: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            message: message.into(),
            timeout_ms: Some(timeout_ms),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a rate limited error.
    #[must_use]
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: None,
        }
    }

    /// Creates a rate limited error with retry duration.
    #[must_use]
    pub fn rate_limited_with_retry(message: impl Into<String>, retry_after_ms: u64) -> Self {
        Self::RateLimited {
            message: message.into(),
            retry_after_ms: Some(retry_after_ms),
        }
    }

    /// Creates an authentication error.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
        }
    }

    /// Creates a rejection error.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected {
            reason: reason.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is retryable.
    ///
    /// Retryable errors are transient and may succeed on retry.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout { .. } | Self::Connection { .. } | Self::RateLimited { .. }
        )
    }

    /// Returns true if the counterparty explicitly refused the message.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns the retry delay in milliseconds, if the counterparty gave one.
    #[must_use]
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            Self::RateLimited { retry_after_ms, .. } => *retry_after_ms,
            _ => None,
        }
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
