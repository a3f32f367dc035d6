//! # Domain Layer
//!
//! Core business logic following Domain-Driven Design principles.
//!
//! This layer contains:
//! - **Entities**: the [`entities::Exchange`] aggregate and the adopted
//!   [`entities::Quote`]
//! - **Messages**: the customer/PFI protocol vocabulary and signed wrapper
//! - **Value Objects**: immutable types with validation (lifecycle status,
//!   identifiers, payment details, timestamps)
//! - **Errors**: domain-specific error types

pub mod entities;
pub mod errors;
pub mod messages;
pub mod value_objects;
