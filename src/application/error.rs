//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent failures during lifecycle operations: missing
//! resources, invalid state, and wrapped failures from the domain and
//! infrastructure layers.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)       - Lifecycle rule violations
//! ├── Store(StoreError)         - Persistence failures
//! ├── Gateway(GatewayError)     - Counterparty transport failures
//! ├── Identity(IdentityError)   - Credential resolution failures
//! ├── Offering(OfferingError)   - Offering lookup failures
//! └── ... (specific not-found and lifecycle variants)
//! ```
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::application::error::ApplicationError;
//!
//! let err = ApplicationError::exchange_not_found("exch_123");
//! assert!(err.is_not_found());
//! ```

use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::infrastructure::gateway::{GatewayError, OfferingError};
use crate::infrastructure::identity::IdentityError;
use crate::infrastructure::persistence::StoreError;

/// Application layer error.
///
/// Wraps domain and infrastructure errors with lifecycle-specific
/// context for operation failures.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from lifecycle rules.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Persistence error from the exchange or quote store.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Transport error from the message gateway.
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Credential resolution error.
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Offering lookup error.
    #[error("offering error: {0}")]
    Offering(#[from] OfferingError),

    /// No signing credentials are registered for the customer.
    #[error("no signing credentials for customer: {0}")]
    IdentityNotFound(String),

    /// The offering does not exist or is no longer available.
    #[error("offering not available: {0}")]
    OfferingNotFound(String),

    /// The exchange does not exist.
    #[error("exchange not found: {0}")]
    ExchangeNotFound(String),

    /// No quote is awaiting a decision on the exchange.
    #[error("no quote awaiting decision for exchange: {0}")]
    QuoteNotFound(String),

    /// The submission pool has shut down and accepts no more work.
    #[error("submission pool is shut down")]
    SubmissionPoolClosed,

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a missing-credentials error.
    #[must_use]
    pub fn identity_not_found(customer_id: impl Into<String>) -> Self {
        Self::IdentityNotFound(customer_id.into())
    }

    /// Creates a missing-offering error.
    #[must_use]
    pub fn offering_not_found(offering_id: impl Into<String>) -> Self {
        Self::OfferingNotFound(offering_id.into())
    }

    /// Creates a missing-exchange error.
    #[must_use]
    pub fn exchange_not_found(exchange_id: impl Into<String>) -> Self {
        Self::ExchangeNotFound(exchange_id.into())
    }

    /// Creates a missing-quote error.
    #[must_use]
    pub fn quote_not_found(exchange_id: impl Into<String>) -> Self {
        Self::QuoteNotFound(exchange_id.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Gateway(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::IdentityNotFound(_)
                | Self::OfferingNotFound(_)
                | Self::ExchangeNotFound(_)
                | Self::QuoteNotFound(_)
        )
    }

    /// Returns true if this error reports a lost race against a
    /// concurrent writer.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Store(e) => e.is_conflict() || e.is_version_conflict(),
            _ => false,
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
