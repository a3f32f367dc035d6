//! # Domain Entities
//!
//! Aggregate roots and entities representing core business concepts.
//!
//! ## Aggregates
//!
//! - [`Exchange`]: one customer/PFI negotiation with its lifecycle state machine
//!
//! ## Entities
//!
//! - [`Quote`]: the adopted counterparty quote and its later progress

pub mod exchange;
pub mod quote;

pub use exchange::Exchange;
pub use quote::{Quote, QuoteResolution};
