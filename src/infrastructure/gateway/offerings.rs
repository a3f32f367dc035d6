//! Offering lookup.
//!
//! An offering is a PFI's advertised currency pair: what it accepts,
//! what it pays out, at what indicative rate, and which verifiable
//! claims a customer must present. Exchanges are always opened against
//! a concrete offering, so the lifecycle engine validates the offering
//! before authoring an RFQ.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::value_objects::{CurrencyCode, OfferingId, PfiId, Timestamp};

/// Errors raised while looking up an offering.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OfferingError {
    /// The offering does not exist, or is no longer available.
    #[error("offering '{id}' not found")]
    NotFound {
        /// Offering that was requested.
        id: String,
    },

    /// The offering source failed to answer.
    #[error("offering lookup failed: {message}")]
    Lookup {
        /// Description of the lookup failure.
        message: String,
    },
}

impl OfferingError {
    /// Creates a not-found error for the given offering.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Creates a lookup failure error.
    pub fn lookup(message: impl Into<String>) -> Self {
        Self::Lookup {
            message: message.into(),
        }
    }

    /// Returns `true` if the error is a missing-offering error.
    #[inline]
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Convenience alias for offering lookups.
pub type OfferingResult<T> = Result<T, OfferingError>;

/// A PFI's advertised currency pair.
///
/// The `required_claims` metadata is carried for credential selection
/// by callers; nothing in the lifecycle engine interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offering {
    /// Offering identifier within the PFI's catalog.
    pub id: OfferingId,
    /// PFI that published the offering.
    pub pfi_id: PfiId,
    /// Human-readable description of the pair.
    pub description: String,
    /// Currency the customer pays in.
    pub payin_currency: CurrencyCode,
    /// Currency the customer receives.
    pub payout_currency: CurrencyCode,
    /// Indicative payout units per payin unit.
    pub rate: Decimal,
    /// Claim kinds the PFI requires from the customer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_claims: Vec<String>,
    /// When the offering stops accepting new exchanges, if bounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<Timestamp>,
}

impl Offering {
    /// Creates an open-ended offering with no required claims.
    #[must_use]
    pub fn new(
        id: OfferingId,
        pfi_id: PfiId,
        description: impl Into<String>,
        payin_currency: CurrencyCode,
        payout_currency: CurrencyCode,
        rate: Decimal,
    ) -> Self {
        Self {
            id,
            pfi_id,
            description: description.into(),
            payin_currency,
            payout_currency,
            rate,
            required_claims: Vec::new(),
            expires_at: None,
        }
    }

    /// Sets the claim kinds the PFI requires.
    #[must_use]
    pub fn with_required_claims(mut self, claims: Vec<String>) -> Self {
        self.required_claims = claims;
        self
    }

    /// Bounds the offering's availability.
    #[must_use]
    pub fn with_expiry(mut self, expires_at: Timestamp) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns `true` if the offering has stopped accepting exchanges.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| at.is_expired())
    }
}

/// Resolves offerings by identifier.
#[async_trait]
pub trait OfferingLookup: Send + Sync + std::fmt::Debug {
    /// Returns the offering registered under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`OfferingError::NotFound`] if no such offering exists,
    /// or [`OfferingError::Lookup`] if the source fails.
    async fn find_offering(&self, id: &OfferingId) -> OfferingResult<Offering>;
}

/// In-memory offering catalog with a fixed set of entries.
///
/// Built once at startup and immutable afterwards. Suitable for tests
/// and deployments where the catalog comes from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticOfferingLookup {
    offerings: HashMap<OfferingId, Offering>,
}

impl StaticOfferingLookup {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an offering, replacing any existing entry.
    #[must_use]
    pub fn with_offering(mut self, offering: Offering) -> Self {
        self.offerings.insert(offering.id.clone(), offering);
        self
    }

    /// Returns the number of registered offerings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offerings.len()
    }

    /// Returns `true` if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offerings.is_empty()
    }
}

#[async_trait]
impl OfferingLookup for StaticOfferingLookup {
    async fn find_offering(&self, id: &OfferingId) -> OfferingResult<Offering> {
        self.offerings
            .get(id)
            .cloned()
            .ok_or_else(|| OfferingError::not_found(id.as_str()))
    }
}
