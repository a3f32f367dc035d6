//! # Message Gateway Trait
//!
//! Port definition for the counterparty message transport.
//!
//! This module defines the [`MessageGateway`] trait that transport
//! implementations must provide: submitting signed customer messages to a
//! PFI and fetching the full message history of an exchange.
//!
//! # Examples
//!
//! ```ignore
//! use pfi_exchange::infrastructure::gateway::traits::MessageGateway;
//!
//! async fn poll(gateway: &impl MessageGateway) {
//!     let history = gateway
//!         .fetch_history(&pfi_id, &exchange_id, &credentials)
//!         .await?;
//!     println!("{} messages on record", history.len());
//! }
//! ```

use crate::domain::messages::{Message, MessageKind, SignedMessage};
use crate::domain::value_objects::ids::{ExchangeId, MessageId, PfiId};
use crate::domain::value_objects::timestamp::Timestamp;
use crate::infrastructure::gateway::error::GatewayResult;
use crate::infrastructure::identity::SigningCredentials;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Acknowledgement returned by the counterparty for a submitted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// Id of the message the counterparty accepted.
    pub message_id: MessageId,
    /// When the counterparty accepted it.
    pub accepted_at: Timestamp,
}

impl SubmissionAck {
    /// Creates a submission acknowledgement.
    #[must_use]
    pub fn new(message_id: MessageId, accepted_at: Timestamp) -> Self {
        Self {
            message_id,
            accepted_at,
        }
    }
}

/// Transport for the customer/PFI message protocol.
///
/// One implementation serves every PFI the wallet talks to; the target is
/// addressed per call.
#[async_trait]
pub trait MessageGateway: Send + Sync + fmt::Debug {
    /// Submits a signed customer message to the counterparty.
    ///
    /// # Errors
    ///
    /// Returns a retryable [`GatewayError`](super::error::GatewayError) on
    /// transient transport failures, and `GatewayError::Rejected` when the
    /// counterparty refuses the message.
    async fn submit(
        &self,
        kind: MessageKind,
        message: &SignedMessage,
    ) -> GatewayResult<SubmissionAck>;

    /// Fetches the full message history of an exchange, oldest first.
    ///
    /// The counterparty authenticates the caller against the credentials'
    /// subject, so only the exchange owner can read its history.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`](super::error::GatewayError) if the request
    /// fails or the response cannot be parsed.
    async fn fetch_history(
        &self,
        pfi_id: &PfiId,
        exchange_id: &ExchangeId,
        credentials: &SigningCredentials,
    ) -> GatewayResult<Vec<Message>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn submission_ack_serde_roundtrip() {
        let ack = SubmissionAck::new(MessageId::generate(), Timestamp::now());
        let json = serde_json::to_string(&ack).unwrap();
        let deserialized: SubmissionAck = serde_json::from_str(&json).unwrap();
        assert_eq!(ack, deserialized);
    }
}
