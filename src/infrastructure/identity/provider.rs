//! Credential resolution for protocol participants.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::value_objects::CustomerId;
use crate::infrastructure::identity::credentials::SigningCredentials;
use crate::infrastructure::identity::error::IdentityResult;
use crate::infrastructure::identity::IdentityError;

/// Resolves signing credentials for a customer.
///
/// The submission path resolves credentials twice: once when an
/// exchange is opened, and again immediately before each outbound
/// message is signed. Implementations must therefore tolerate repeated
/// lookups for the same customer.
#[async_trait]
pub trait IdentityProvider: Send + Sync + std::fmt::Debug {
    /// Returns the signing credentials registered for `customer_id`.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NotFound`] if no credentials are
    /// registered, or [`IdentityError::Provider`] if the backend fails.
    async fn resolve_credentials(
        &self,
        customer_id: &CustomerId,
    ) -> IdentityResult<SigningCredentials>;
}

/// In-memory identity provider with a fixed credential set.
///
/// Built once at startup and immutable afterwards. Suitable for tests
/// and single-tenant deployments where key material comes from
/// configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityProvider {
    credentials: HashMap<CustomerId, SigningCredentials>,
}

impl StaticIdentityProvider {
    /// Creates an empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers credentials for a customer, replacing any existing
    /// entry.
    #[must_use]
    pub fn with_credentials(
        mut self,
        customer_id: CustomerId,
        credentials: SigningCredentials,
    ) -> Self {
        self.credentials.insert(customer_id, credentials);
        self
    }

    /// Returns the number of registered customers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Returns `true` if no credentials are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn resolve_credentials(
        &self,
        customer_id: &CustomerId,
    ) -> IdentityResult<SigningCredentials> {
        self.credentials
            .get(customer_id)
            .cloned()
            .ok_or_else(|| IdentityError::not_found(customer_id.as_str()))
    }
}
