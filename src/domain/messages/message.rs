//! # Protocol Message Envelope
//!
//! The message vocabulary exchanged between a customer and a PFI, and the
//! signed wrapper submitted over the wire.
//!
//! # Message Flow
//!
//! ```text
//! customer                          PFI
//!    |-- rfq ------------------------>|
//!    |<------------------------ quote |
//!    |                                |
//!    |-- order ----------------------># accept path
//!    |<------------------ order_status|  (zero or more)
//!    |<------------------------ close |
//!    |                                |
//!    |-- close ----------------------># reject path
//! ```
//!
//! Customer-authored messages are built through the constructors here and
//! signed before submission. Counterparty-authored messages arrive through
//! history fetches and are deserialized from the wire form.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::messages::{Message, MessageKind};
//! use pfi_exchange::domain::value_objects::ids::{CustomerId, OfferingId, PfiId};
//! use pfi_exchange::domain::value_objects::payment::PaymentSelections;
//! use rust_decimal::Decimal;
//!
//! let selections = PaymentSelections::new(Decimal::new(100, 0), "BANK", "WALLET").unwrap();
//! let rfq = Message::rfq(
//!     &CustomerId::new("did:ex:customer"),
//!     &PfiId::new("did:ex:pfi"),
//!     OfferingId::new("off_1"),
//!     &selections,
//! );
//! assert_eq!(rfq.kind(), MessageKind::Rfq);
//! assert_eq!(rfq.metadata().from, "did:ex:customer");
//! ```

use crate::domain::messages::bodies::{
    CloseMessage, OrderStatusMessage, QuoteMessage, RfqMessage,
};
use crate::domain::value_objects::ids::{CustomerId, ExchangeId, MessageId, OfferingId, PfiId};
use crate::domain::value_objects::payment::PaymentSelections;
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of a protocol message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Customer requests a firm quote against an offering.
    Rfq,
    /// Counterparty responds with a priced, expiring quote.
    Quote,
    /// Customer accepts the quoted terms.
    Order,
    /// Counterparty reports settlement progress.
    OrderStatus,
    /// Either party ends the exchange.
    Close,
}

impl MessageKind {
    /// Returns the wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rfq => "rfq",
            Self::Quote => "quote",
            Self::Order => "order",
            Self::OrderStatus => "order_status",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Common metadata carried by every protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageMetadata {
    /// Unique identifier for this message.
    pub id: MessageId,
    /// The exchange this message belongs to.
    pub exchange_id: ExchangeId,
    /// Subject of the sender.
    pub from: String,
    /// Subject of the recipient.
    pub to: String,
    /// When this message was created by its author.
    pub created_at: Timestamp,
}

impl MessageMetadata {
    /// Creates metadata with a freshly minted message id and the current time.
    #[must_use]
    pub fn new(exchange_id: ExchangeId, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: MessageId::generate(),
            exchange_id,
            from: from.into(),
            to: to.into(),
            created_at: Timestamp::now(),
        }
    }

    /// Creates metadata with specific values (for reconstruction).
    #[must_use]
    pub fn from_parts(
        id: MessageId,
        exchange_id: ExchangeId,
        from: impl Into<String>,
        to: impl Into<String>,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            exchange_id,
            from: from.into(),
            to: to.into(),
            created_at,
        }
    }
}

/// A protocol message: metadata plus a kind-specific body.
///
/// The exchange id is minted when the RFQ message is constructed; every
/// later message in the exchange carries that same id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Message {
    /// Customer request for a firm quote.
    Rfq {
        /// Message metadata.
        metadata: MessageMetadata,
        /// RFQ body.
        data: RfqMessage,
    },
    /// Counterparty's priced response.
    Quote {
        /// Message metadata.
        metadata: MessageMetadata,
        /// Quote body.
        data: QuoteMessage,
    },
    /// Customer acceptance of the quoted terms.
    Order {
        /// Message metadata.
        metadata: MessageMetadata,
    },
    /// Counterparty settlement progress report.
    OrderStatus {
        /// Message metadata.
        metadata: MessageMetadata,
        /// Status body.
        data: OrderStatusMessage,
    },
    /// Termination of the exchange by either party.
    Close {
        /// Message metadata.
        metadata: MessageMetadata,
        /// Close body.
        data: CloseMessage,
    },
}

impl Message {
    /// Builds a customer-authored RFQ, minting a new exchange id.
    #[must_use]
    pub fn rfq(
        customer: &CustomerId,
        pfi: &PfiId,
        offering_id: OfferingId,
        selections: &PaymentSelections,
    ) -> Self {
        Self::Rfq {
            metadata: MessageMetadata::new(
                ExchangeId::generate(),
                customer.as_str(),
                pfi.as_str(),
            ),
            data: RfqMessage::new(offering_id, selections),
        }
    }

    /// Builds a customer-authored order accepting the quoted terms.
    #[must_use]
    pub fn order(customer: &CustomerId, pfi: &PfiId, exchange_id: ExchangeId) -> Self {
        Self::Order {
            metadata: MessageMetadata::new(exchange_id, customer.as_str(), pfi.as_str()),
        }
    }

    /// Builds a customer-authored close rejecting the quoted terms.
    #[must_use]
    pub fn close(
        customer: &CustomerId,
        pfi: &PfiId,
        exchange_id: ExchangeId,
        reason: Option<String>,
    ) -> Self {
        Self::Close {
            metadata: MessageMetadata::new(exchange_id, customer.as_str(), pfi.as_str()),
            data: CloseMessage::new(reason),
        }
    }

    /// Builds a counterparty-authored quote (history replay and simulation).
    #[must_use]
    pub fn quote(
        pfi: &PfiId,
        customer: &CustomerId,
        exchange_id: ExchangeId,
        data: QuoteMessage,
    ) -> Self {
        Self::Quote {
            metadata: MessageMetadata::new(exchange_id, pfi.as_str(), customer.as_str()),
            data,
        }
    }

    /// Builds a counterparty-authored order status (history replay and simulation).
    #[must_use]
    pub fn order_status(
        pfi: &PfiId,
        customer: &CustomerId,
        exchange_id: ExchangeId,
        status: impl Into<String>,
    ) -> Self {
        Self::OrderStatus {
            metadata: MessageMetadata::new(exchange_id, pfi.as_str(), customer.as_str()),
            data: OrderStatusMessage::new(status),
        }
    }

    /// Builds a counterparty-authored close (history replay and simulation).
    #[must_use]
    pub fn close_by_counterparty(
        pfi: &PfiId,
        customer: &CustomerId,
        exchange_id: ExchangeId,
        reason: Option<String>,
    ) -> Self {
        Self::Close {
            metadata: MessageMetadata::new(exchange_id, pfi.as_str(), customer.as_str()),
            data: CloseMessage::new(reason),
        }
    }

    /// Returns the kind of this message.
    #[must_use]
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Rfq { .. } => MessageKind::Rfq,
            Self::Quote { .. } => MessageKind::Quote,
            Self::Order { .. } => MessageKind::Order,
            Self::OrderStatus { .. } => MessageKind::OrderStatus,
            Self::Close { .. } => MessageKind::Close,
        }
    }

    /// Returns this message's metadata.
    #[must_use]
    pub const fn metadata(&self) -> &MessageMetadata {
        match self {
            Self::Rfq { metadata, .. }
            | Self::Quote { metadata, .. }
            | Self::Order { metadata }
            | Self::OrderStatus { metadata, .. }
            | Self::Close { metadata, .. } => metadata,
        }
    }

    /// Returns the id of this message.
    #[must_use]
    pub const fn id(&self) -> &MessageId {
        &self.metadata().id
    }

    /// Returns the exchange this message belongs to.
    #[must_use]
    pub const fn exchange_id(&self) -> &ExchangeId {
        &self.metadata().exchange_id
    }

    /// Returns when this message was created by its author.
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.metadata().created_at
    }

    /// Returns the quote body if this is a quote message.
    #[must_use]
    pub const fn as_quote(&self) -> Option<&QuoteMessage> {
        match self {
            Self::Quote { data, .. } => Some(data),
            _ => None,
        }
    }
}

/// A protocol message wrapped with its detached signature.
///
/// Produced by signing credentials before submission; the counterparty
/// verifies the signature against the key named by `key_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedMessage {
    /// The signed message.
    pub message: Message,
    /// Identifier of the key that produced the signature.
    pub key_id: String,
    /// Detached signature over the canonical message serialization.
    pub signature: String,
}

impl SignedMessage {
    /// Wraps a message with its signature.
    #[must_use]
    pub fn new(message: Message, key_id: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            message,
            key_id: key_id.into(),
            signature: signature.into(),
        }
    }
}
