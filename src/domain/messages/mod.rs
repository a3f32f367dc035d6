//! # Protocol Messages
//!
//! The customer/PFI message vocabulary: five message kinds sharing common
//! metadata, plus the signed wrapper submitted over the wire.
//!
//! - [`Message`]: envelope enum, one variant per kind
//! - [`MessageKind`], [`MessageMetadata`]: kind tag and shared header
//! - [`RfqMessage`], [`QuoteMessage`], [`OrderStatusMessage`], [`CloseMessage`]:
//!   kind-specific bodies ([`Message::Order`] carries metadata only)
//! - [`SignedMessage`]: a message with its detached signature

pub mod bodies;
pub mod message;

pub use bodies::{CloseMessage, OrderStatusMessage, QuoteMessage, QuotedSide, RfqMessage};
pub use message::{Message, MessageKind, MessageMetadata, SignedMessage};
