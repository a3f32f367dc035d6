//! # In-Memory Quote Store
//!
//! In-memory implementation of [`QuoteStore`].
//!
//! Keyed by exchange id, so the one-quote-per-exchange invariant is
//! structural. Resolution claims run the check and the write under a single
//! write lock.

use crate::domain::entities::quote::{Quote, QuoteResolution};
use crate::domain::value_objects::ids::ExchangeId;
use crate::infrastructure::persistence::traits::{QuoteStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`QuoteStore`].
///
/// Uses a thread-safe `HashMap` keyed by exchange id with the same
/// insert/update version semantics as the exchange store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuoteStore {
    storage: Arc<RwLock<HashMap<ExchangeId, Quote>>>,
}

impl InMemoryQuoteStore {
    /// Creates a new empty in-memory quote store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of quotes in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage
            .try_read()
            .map(|guard| guard.len())
            .unwrap_or(0)
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears all quotes from the store.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

#[async_trait]
impl QuoteStore for InMemoryQuoteStore {
    async fn save(&self, quote: &Quote) -> StoreResult<()> {
        let mut storage = self.storage.write().await;
        match storage.get(quote.exchange_id()) {
            Some(_) if quote.version() == 1 => Err(StoreError::duplicate(
                "Quote",
                quote.exchange_id().as_str(),
            )),
            Some(existing) if quote.version() <= existing.version() => {
                Err(StoreError::version_conflict(
                    "Quote",
                    quote.exchange_id().as_str(),
                    quote.version(),
                    existing.version(),
                ))
            }
            _ => {
                storage.insert(quote.exchange_id().clone(), quote.clone());
                Ok(())
            }
        }
    }

    async fn find_by_exchange(&self, exchange_id: &ExchangeId) -> StoreResult<Option<Quote>> {
        let storage = self.storage.read().await;
        Ok(storage.get(exchange_id).cloned())
    }

    async fn find_unresolved(&self) -> StoreResult<Vec<Quote>> {
        let storage = self.storage.read().await;
        let unresolved: Vec<Quote> = storage
            .values()
            .filter(|q| !q.is_resolved())
            .cloned()
            .collect();
        Ok(unresolved)
    }

    async fn resolve(
        &self,
        exchange_id: &ExchangeId,
        resolution: QuoteResolution,
    ) -> StoreResult<Quote> {
        let mut storage = self.storage.write().await;
        let quote = storage
            .get_mut(exchange_id)
            .ok_or_else(|| StoreError::not_found("Quote", exchange_id.as_str()))?;
        quote
            .mark_resolved(resolution)
            .map_err(|_| StoreError::conflict("Quote", exchange_id.as_str(), "already resolved"))?;
        Ok(quote.clone())
    }

    async fn count(&self) -> StoreResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}
