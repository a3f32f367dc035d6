//! # Store Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the store traits (ports) that abstract persistence
//! operations. Implementations can use different backends; the crate ships
//! thread-safe in-memory stores suitable for tests and single-process use.
//!
//! # Available Stores
//!
//! - [`ExchangeStore`]: persistence for [`Exchange`] aggregates
//! - [`QuoteStore`]: persistence for adopted [`Quote`] records
//!
//! Exchanges are never deleted: failed and completed exchanges stay queryable
//! as the audit record of the negotiation.
//!
//! # Examples
//!
//! ```ignore
//! use pfi_exchange::infrastructure::persistence::traits::ExchangeStore;
//!
//! async fn poll_candidates(store: &impl ExchangeStore) {
//!     let waiting = store.find_awaiting_counterparty().await.unwrap();
//!     println!("{} exchanges awaiting the counterparty", waiting.len());
//! }
//! ```

use crate::domain::entities::exchange::Exchange;
use crate::domain::entities::quote::{Quote, QuoteResolution};
use crate::domain::value_objects::ids::{CustomerId, ExchangeId};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("Duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Optimistic locking conflict.
    #[error(
        "Version conflict: {entity_type} with id {id} has been modified (got {actual}, tried to write {expected})"
    )]
    VersionConflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// Version the writer supplied.
        expected: u64,
        /// Version currently stored.
        actual: u64,
    },

    /// State conflict.
    #[error("Conflict: {entity_type} with id {id}: {message}")]
    Conflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
        /// What conflicted.
        message: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a version conflict error.
    #[must_use]
    pub fn version_conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        expected: u64,
        actual: u64,
    ) -> Self {
        Self::VersionConflict {
            entity_type,
            id: id.into(),
            expected,
            actual,
        }
    }

    /// Creates a state conflict error.
    #[must_use]
    pub fn conflict(
        entity_type: &'static str,
        id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Conflict {
            entity_type,
            id: id.into(),
            message: message.into(),
        }
    }

    /// Creates a serialization error.
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a duplicate error.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns true if this is a version conflict error.
    #[must_use]
    pub fn is_version_conflict(&self) -> bool {
        matches!(self, Self::VersionConflict { .. })
    }

    /// Returns true if this is a state conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store for [`Exchange`] aggregates.
///
/// # Save Semantics
///
/// [`save`](ExchangeStore::save) is an insert for a version 1 aggregate and
/// a version-checked update otherwise: a version 1 save over an existing id
/// is a [`StoreError::Duplicate`], and an update whose version does not
/// exceed the stored version is a [`StoreError::VersionConflict`].
///
/// # Examples
///
/// ```ignore
/// use pfi_exchange::infrastructure::persistence::traits::ExchangeStore;
///
/// async fn example(store: &impl ExchangeStore) {
///     let exchange = store.find_by_id(&exchange_id).await?;
///     let mine = store.find_by_customer(&customer_id).await?;
/// }
/// ```
#[async_trait]
pub trait ExchangeStore: Send + Sync + fmt::Debug {
    /// Saves an exchange.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` when inserting over an existing id,
    /// and `StoreError::VersionConflict` when updating from a stale copy.
    async fn save(&self, exchange: &Exchange) -> StoreResult<()>;

    /// Finds an exchange by ID.
    ///
    /// Returns `None` if the exchange does not exist.
    async fn find_by_id(&self, id: &ExchangeId) -> StoreResult<Option<Exchange>>;

    /// Finds all exchanges where the counterparty holds the next move.
    ///
    /// These are the candidates the reconciler polls for new messages.
    async fn find_awaiting_counterparty(&self) -> StoreResult<Vec<Exchange>>;

    /// Finds exchanges opened by the given customer.
    async fn find_by_customer(&self, customer_id: &CustomerId) -> StoreResult<Vec<Exchange>>;

    /// Counts all exchanges.
    async fn count(&self) -> StoreResult<u64>;
}

/// Store for adopted [`Quote`] records.
///
/// At most one quote is kept per exchange; the first one saved wins and a
/// later insert for the same exchange is a [`StoreError::Duplicate`].
///
/// # Examples
///
/// ```ignore
/// use pfi_exchange::infrastructure::persistence::traits::QuoteStore;
/// use pfi_exchange::domain::entities::quote::QuoteResolution;
///
/// async fn example(store: &impl QuoteStore) {
///     let claimed = store.resolve(&exchange_id, QuoteResolution::Ordered).await?;
/// }
/// ```
#[async_trait]
pub trait QuoteStore: Send + Sync + fmt::Debug {
    /// Saves a quote.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Duplicate` when inserting over an existing
    /// exchange id, and `StoreError::VersionConflict` when updating from a
    /// stale copy.
    async fn save(&self, quote: &Quote) -> StoreResult<()>;

    /// Finds the quote adopted for an exchange.
    ///
    /// Returns `None` if no quote has been adopted.
    async fn find_by_exchange(&self, exchange_id: &ExchangeId) -> StoreResult<Option<Quote>>;

    /// Finds all quotes the customer has not yet resolved.
    async fn find_unresolved(&self) -> StoreResult<Vec<Quote>>;

    /// Atomically claims the quote for an exchange with a resolution.
    ///
    /// The check and the write happen under one lock, so exactly one of two
    /// racing callers wins; the loser observes the conflict.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no quote exists for the exchange,
    /// and `StoreError::Conflict` if it was already resolved.
    async fn resolve(
        &self,
        exchange_id: &ExchangeId,
        resolution: QuoteResolution,
    ) -> StoreResult<Quote>;

    /// Counts all quotes.
    async fn count(&self) -> StoreResult<u64>;
}
