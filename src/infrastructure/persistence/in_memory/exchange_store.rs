//! # In-Memory Exchange Store
//!
//! In-memory implementation of [`ExchangeStore`].
//!
//! This implementation uses a thread-safe `HashMap` for storage, making it
//! suitable for unit tests and single-process deployments without database
//! dependencies.

use crate::domain::entities::exchange::Exchange;
use crate::domain::value_objects::ids::{CustomerId, ExchangeId};
use crate::infrastructure::persistence::traits::{ExchangeStore, StoreError, StoreResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ExchangeStore`].
///
/// Uses a thread-safe `HashMap` keyed by exchange id. A version 1 save is
/// treated as an insert and a higher version as an update; stale writers
/// are rejected with a version conflict.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExchangeStore {
    storage: Arc<RwLock<HashMap<ExchangeId, Exchange>>>,
}

impl InMemoryExchangeStore {
    /// Creates a new empty in-memory exchange store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of exchanges in the store.
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

    /// Clears all exchanges from the store.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

#[async_trait]
impl ExchangeStore for InMemoryExchangeStore {
    async fn save(&self, exchange: &Exchange) -> StoreResult<()> {
        let mut storage = self.storage.write().await;
        match storage.get(exchange.id()) {
            Some(_) if exchange.version() == 1 => Err(StoreError::duplicate(
                "Exchange",
                exchange.id().as_str(),
            )),
            Some(existing) if exchange.version() <= existing.version() => {
                Err(StoreError::version_conflict(
                    "Exchange",
                    exchange.id().as_str(),
                    exchange.version(),
                    existing.version(),
                ))
            }
            _ => {
                storage.insert(exchange.id().clone(), exchange.clone());
                Ok(())
            }
        }
    }

    async fn find_by_id(&self, id: &ExchangeId) -> StoreResult<Option<Exchange>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_awaiting_counterparty(&self) -> StoreResult<Vec<Exchange>> {
        let storage = self.storage.read().await;
        let waiting: Vec<Exchange> = storage
            .values()
            .filter(|e| e.is_awaiting_counterparty())
            .cloned()
            .collect();
        Ok(waiting)
    }

    async fn find_by_customer(&self, customer_id: &CustomerId) -> StoreResult<Vec<Exchange>> {
        let storage = self.storage.read().await;
        let mine: Vec<Exchange> = storage
            .values()
            .filter(|e| e.customer_id() == customer_id)
            .cloned()
            .collect();
        Ok(mine)
    }

    async fn count(&self) -> StoreResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}
