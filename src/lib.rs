//! # PFI Exchange
//!
//! Wallet-side exchange lifecycle engine for RFQ negotiations with
//! participating financial institutions (PFIs) over an asynchronous
//! message protocol (RFQ, Quote, Order, OrderStatus, Close).
//!
//! ## Architecture
//!
//! This crate follows Domain-Driven Design with a layered architecture:
//!
//! - **Domain Layer** (`domain`): Exchange and quote entities, message model, value objects
//! - **Application Layer** (`application`): Lifecycle engine, reconciler, submission pool, retry
//! - **Infrastructure Layer** (`infrastructure`): Message gateway, identity, in-memory persistence
//!
//! ## Example
//!
//! ```rust,ignore
//! use pfi_exchange::application::LifecycleEngine;
//! use pfi_exchange::domain::value_objects::PaymentSelections;
//!
//! // Open an exchange against a published offering
//! let exchange_id = engine
//!     .create_exchange(customer_id, offering_id, selections)
//!     .await?;
//!
//! // After the reconciler adopts the PFI's quote, accept it
//! if engine.is_rfq_settled(&exchange_id).await? {
//!     engine.decide_on_quote(&exchange_id, true, None).await?;
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
