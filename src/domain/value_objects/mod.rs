//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ExchangeId`], [`MessageId`]: UUID-based identifiers
//! - [`CustomerId`], [`PfiId`], [`OfferingId`]: String-based identifiers
//!
//! ## Lifecycle Types
//!
//! - [`ExchangeStatus`]: exchange lifecycle states with transition rules
//! - [`Stage`], [`StageOutcome`]: the axes an [`ExchangeStatus`] is built from
//!
//! ## Payment Types
//!
//! - [`CurrencyCode`]: validated, upper-cased currency code
//! - [`PaymentDetails`]: one quoted side (currency, amount, fee, instructions)
//! - [`PaymentSelections`]: the customer's payin amount and method kinds
//!
//! ## Time
//!
//! - [`Timestamp`]: UTC timestamp with millisecond precision

pub mod exchange_status;
pub mod ids;
pub mod payment;
pub mod timestamp;

pub use exchange_status::{ExchangeStatus, Stage, StageOutcome};
pub use ids::{CustomerId, ExchangeId, MessageId, OfferingId, PfiId};
pub use payment::{CurrencyCode, PaymentDetails, PaymentInstruction, PaymentSelections};
pub use timestamp::Timestamp;
