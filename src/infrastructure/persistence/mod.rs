//! # Persistence Layer
//!
//! Store traits and their implementations.
//!
//! ## Store Traits (Ports)
//!
//! - [`ExchangeStore`]: persistence for exchange aggregates
//! - [`QuoteStore`]: persistence for adopted quotes
//!
//! ## Implementations
//!
//! - `in_memory`: thread-safe in-memory stores for tests and
//!   single-process deployments

pub mod in_memory;
pub mod traits;

pub use in_memory::{InMemoryExchangeStore, InMemoryQuoteStore};
pub use traits::{ExchangeStore, QuoteStore, StoreError, StoreResult};
