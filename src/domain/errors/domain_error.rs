//! # Domain Errors
//!
//! Typed domain error definitions.
//!
//! This module provides the [`DomainError`] enum for representing
//! domain-level errors with numeric error codes.
//!
//! # Error Code Ranges
//!
//! - **1000-1999**: Validation errors
//! - **2000-2999**: State errors
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::errors::DomainError;
//!
//! let error = DomainError::InvalidCurrencyCode("<blank>".to_string());
//! assert_eq!(error.code(), 1001);
//! ```

use crate::domain::value_objects::exchange_status::ExchangeStatus;
use crate::domain::value_objects::ids::ExchangeId;
use thiserror::Error;

/// Domain-level error with numeric error codes.
///
/// Provides typed errors for domain operations with consistent
/// error codes for logging and API responses.
///
/// # Error Code Ranges
///
/// | Range | Category |
/// |-------|----------|
/// | 1000-1999 | Validation errors |
/// | 2000-2999 | State errors |
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::errors::DomainError;
///
/// let error = DomainError::InvalidAmount("payin amount must be positive".to_string());
/// assert!(error.code() >= 1000 && error.code() < 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // ========================================================================
    // Validation Errors (1000-1999)
    // ========================================================================
    /// Invalid currency code.
    #[error("invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// A required field was empty.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    // ========================================================================
    // State Errors (2000-2999)
    // ========================================================================
    /// Invalid lifecycle transition attempted.
    #[error("invalid status transition from {from} to {to}")]
    InvalidStatusTransition {
        /// The current status.
        from: ExchangeStatus,
        /// The attempted target status.
        to: ExchangeStatus,
    },

    /// The quote on record was already resolved by an order or close.
    #[error("quote for exchange {0} is already resolved")]
    QuoteAlreadyResolved(ExchangeId),
}

impl DomainError {
    /// Returns the numeric error code.
    ///
    /// # Error Code Ranges
    ///
    /// - 1000-1999: Validation errors
    /// - 2000-2999: State errors
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidCurrencyCode("x".to_string()).code(), 1001);
    /// assert_eq!(DomainError::EmptyField("payin_method").code(), 1003);
    /// ```
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            // Validation errors (1000-1999)
            Self::InvalidCurrencyCode(_) => 1001,
            Self::InvalidAmount(_) => 1002,
            Self::EmptyField(_) => 1003,

            // State errors (2000-2999)
            Self::InvalidStatusTransition { .. } => 2001,
            Self::QuoteAlreadyResolved(_) => 2002,
        }
    }

    /// Returns the error category name.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::errors::DomainError;
    ///
    /// assert_eq!(DomainError::InvalidAmount("x".to_string()).category(), "validation");
    /// ```
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.code() {
            1000..=1999 => "validation",
            2000..=2999 => "state",
            _ => "unknown",
        }
    }

    /// Returns true if this is a validation error.
    #[inline]
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self.code(), 1000..=1999)
    }

    /// Returns true if this is a state error.
    #[inline]
    #[must_use]
    pub const fn is_state_error(&self) -> bool {
        matches!(self.code(), 2000..=2999)
    }
}
