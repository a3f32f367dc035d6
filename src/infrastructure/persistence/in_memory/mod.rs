//! # In-Memory Stores
//!
//! In-memory store implementations for tests and single-process use.
//!
//! ## Available Stores
//!
//! - [`InMemoryExchangeStore`]: exchange persistence
//! - [`InMemoryQuoteStore`]: adopted quote persistence
//!
//! ## Thread Safety
//!
//! Both implementations use `Arc<RwLock<HashMap>>` for thread-safe access,
//! and [`InMemoryQuoteStore`] performs its resolution check-and-claim under
//! a single write lock.

pub mod exchange_store;
pub mod quote_store;

pub use exchange_store::InMemoryExchangeStore;
pub use quote_store::InMemoryQuoteStore;
