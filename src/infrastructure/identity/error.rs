//! Error types for credential resolution and message signing.

use thiserror::Error;

/// Errors raised while resolving signing credentials or producing
/// signatures.
///
/// `NotFound` is the routine case: the wallet holds no key material for
/// the requesting customer, so no protocol message can be authored on
/// their behalf. `Provider` and `Signing` cover backend and
/// cryptographic failures respectively.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// No signing credentials are registered for the customer.
    #[error("no signing credentials registered for customer '{customer_id}'")]
    NotFound {
        /// Customer whose credentials were requested.
        customer_id: String,
    },

    /// The credential backend failed to answer.
    #[error("identity provider failure: {message}")]
    Provider {
        /// Description of the backend failure.
        message: String,
    },

    /// Producing a signature over a message failed.
    #[error("message signing failed: {message}")]
    Signing {
        /// Description of the signing failure.
        message: String,
    },
}

impl IdentityError {
    /// Creates a not-found error for the given customer.
    pub fn not_found(customer_id: impl Into<String>) -> Self {
        Self::NotFound {
            customer_id: customer_id.into(),
        }
    }

    /// Creates a provider failure error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider {
            message: message.into(),
        }
    }

    /// Creates a signing failure error.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }

    /// Returns `true` if the error is a missing-credentials error.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for identity operations.
pub type IdentityResult<T> = Result<T, IdentityError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_customer_id() {
        let err = IdentityError::not_found("did:key:alice");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("did:key:alice"));
    }

    #[test]
    fn provider_and_signing_are_not_not_found() {
        assert!(!IdentityError::provider("backend down").is_not_found());
        assert!(!IdentityError::signing("bad key").is_not_found());
    }
}
