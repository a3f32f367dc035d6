//! # Quote Entity
//!
//! The adopted counterparty quote for an exchange.
//!
//! This module provides the [`Quote`] entity: the priced response a PFI sent
//! for an exchange, lifted out of the wire message into validated payment
//! details. One quote is kept per exchange (the first one seen wins), and it
//! accumulates the counterparty's later progress reports: order status labels
//! and the eventual close reason.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::entities::quote::Quote;
//! use pfi_exchange::domain::messages::{MessageMetadata, QuoteMessage, QuotedSide};
//! use pfi_exchange::domain::value_objects::ids::{ExchangeId, MessageId};
//! use pfi_exchange::domain::value_objects::timestamp::Timestamp;
//! use rust_decimal::Decimal;
//!
//! let metadata = MessageMetadata::new(ExchangeId::new("ex_1"), "did:ex:pfi", "did:ex:customer");
//! let body = QuoteMessage::new(
//!     Timestamp::now().add_secs(300),
//!     QuotedSide::new("USD", Decimal::new(10000, 2)),
//!     QuotedSide::new("KES", Decimal::new(1290000, 2)),
//! );
//!
//! let quote = Quote::from_message(&metadata, &body).unwrap();
//! assert_eq!(quote.payin().currency().as_str(), "USD");
//! assert!(!quote.is_resolved());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::messages::{MessageMetadata, QuoteMessage, QuotedSide};
use crate::domain::value_objects::ids::ExchangeId;
use crate::domain::value_objects::payment::{CurrencyCode, PaymentDetails};
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How the customer resolved a quote.
///
/// Unresolved quotes carry no marker; once resolved, the marker is permanent
/// and a second resolution attempt is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteResolution {
    /// The customer accepted the quote and submitted an order.
    Ordered,
    /// The customer rejected the quote and submitted a close.
    Closed,
}

impl QuoteResolution {
    /// Returns the canonical name of this resolution.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ordered => "ORDERED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for QuoteResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The adopted quote for an exchange.
///
/// Built from the first quote message seen for an exchange. Both sides are
/// validated on construction; later counterparty progress (order status,
/// close reason) is recorded against the same record.
///
/// # Invariants
///
/// - Fees and instructions stay on the side that quoted them
/// - Resolution is write-once
/// - Version increases on every observable mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The exchange this quote belongs to.
    exchange_id: ExchangeId,
    /// When the counterparty created the quote message.
    created_at: Timestamp,
    /// When this quote stops being honored.
    expires_at: Timestamp,
    /// What the customer pays.
    payin: PaymentDetails,
    /// What the customer receives.
    payout: PaymentDetails,
    /// Latest counterparty order status label, if any.
    order_status: Option<String>,
    /// Close reason reported by either party, if any.
    close_reason: Option<String>,
    /// How the customer resolved this quote, if they have.
    resolution: Option<QuoteResolution>,
    /// Version for optimistic locking.
    version: u64,
}

impl Quote {
    /// Builds a quote record from a counterparty quote message.
    ///
    /// Expiry is not checked here: an already expired quote is still a valid
    /// record, and callers decide whether to adopt or discard it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCurrencyCode` or
    /// `DomainError::InvalidAmount` if either quoted side fails validation.
    pub fn from_message(metadata: &MessageMetadata, data: &QuoteMessage) -> DomainResult<Self> {
        Ok(Self {
            exchange_id: metadata.exchange_id.clone(),
            created_at: metadata.created_at,
            expires_at: data.expires_at,
            payin: Self::side_details(&data.payin)?,
            payout: Self::side_details(&data.payout)?,
            order_status: None,
            close_reason: None,
            resolution: None,
            version: 1,
        })
    }

    /// Creates a quote with specific values (for reconstruction from storage).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        exchange_id: ExchangeId,
        created_at: Timestamp,
        expires_at: Timestamp,
        payin: PaymentDetails,
        payout: PaymentDetails,
        order_status: Option<String>,
        close_reason: Option<String>,
        resolution: Option<QuoteResolution>,
        version: u64,
    ) -> Self {
        Self {
            exchange_id,
            created_at,
            expires_at,
            payin,
            payout,
            order_status,
            close_reason,
            resolution,
            version,
        }
    }

    fn side_details(side: &QuotedSide) -> DomainResult<PaymentDetails> {
        let currency = CurrencyCode::new(side.currency_code.as_str())?;
        let mut details = PaymentDetails::new(currency, side.amount)?;
        if let Some(fee) = side.fee {
            details = details.with_fee(fee)?;
        }
        if let Some(instruction) = &side.payment_instruction {
            details = details.with_instruction(instruction.clone());
        }
        Ok(details)
    }

    // ========== Accessors ==========

    /// Returns the exchange this quote belongs to.
    #[inline]
    #[must_use]
    pub fn exchange_id(&self) -> &ExchangeId {
        &self.exchange_id
    }

    /// Returns when the counterparty created the quote message.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this quote stops being honored.
    #[inline]
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Returns the payin side.
    #[inline]
    #[must_use]
    pub fn payin(&self) -> &PaymentDetails {
        &self.payin
    }

    /// Returns the payout side.
    #[inline]
    #[must_use]
    pub fn payout(&self) -> &PaymentDetails {
        &self.payout
    }

    /// Returns the latest counterparty order status label, if any.
    #[inline]
    #[must_use]
    pub fn order_status(&self) -> Option<&str> {
        self.order_status.as_deref()
    }

    /// Returns the close reason, if one was recorded.
    #[inline]
    #[must_use]
    pub fn close_reason(&self) -> Option<&str> {
        self.close_reason.as_deref()
    }

    /// Returns how the customer resolved this quote, if they have.
    #[inline]
    #[must_use]
    pub const fn resolution(&self) -> Option<QuoteResolution> {
        self.resolution
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true if this quote has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_expired()
    }

    /// Returns true if the customer has resolved this quote.
    #[inline]
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    // ========== Mutations ==========

    /// Marks this quote as resolved by the customer.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::QuoteAlreadyResolved` if a resolution was
    /// already recorded.
    pub fn mark_resolved(&mut self, resolution: QuoteResolution) -> DomainResult<()> {
        if self.resolution.is_some() {
            return Err(DomainError::QuoteAlreadyResolved(self.exchange_id.clone()));
        }
        self.resolution = Some(resolution);
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    /// Records the latest counterparty order status label.
    pub fn record_order_status(&mut self, status: impl Into<String>) {
        self.order_status = Some(status.into());
        self.version = self.version.saturating_add(1);
    }

    /// Records the close reason for this exchange.
    pub fn record_close(&mut self, reason: Option<String>) {
        self.close_reason = reason;
        self.version = self.version.saturating_add(1);
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quote({} {} -> {} {} for {})",
            self.payin.amount(),
            self.payin.currency(),
            self.payout.amount(),
            self.payout.currency(),
            self.exchange_id
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::payment::PaymentInstruction;
    use rust_decimal::Decimal;

    fn test_metadata() -> MessageMetadata {
        MessageMetadata::new(ExchangeId::new("ex_1"), "did:ex:pfi", "did:ex:customer")
    }

    fn test_body() -> QuoteMessage {
        QuoteMessage::new(
            Timestamp::now().add_secs(300),
            QuotedSide::new("USD", Decimal::new(10000, 2)).with_fee(Decimal::new(50, 2)),
            QuotedSide::new("KES", Decimal::new(1290000, 2)).with_fee(Decimal::new(1000, 2)),
        )
    }

    fn test_quote() -> Quote {
        Quote::from_message(&test_metadata(), &test_body()).unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn from_message_maps_both_sides() {
            let quote = test_quote();
            assert_eq!(quote.exchange_id().as_str(), "ex_1");
            assert_eq!(quote.payin().currency().as_str(), "USD");
            assert_eq!(quote.payin().amount(), Decimal::new(10000, 2));
            assert_eq!(quote.payout().currency().as_str(), "KES");
            assert_eq!(quote.payout().amount(), Decimal::new(1290000, 2));
            assert_eq!(quote.version(), 1);
        }

        #[test]
        fn fees_stay_on_their_own_side() {
            let quote = test_quote();
            assert_eq!(quote.payin().fee(), Some(Decimal::new(50, 2)));
            assert_eq!(quote.payout().fee(), Some(Decimal::new(1000, 2)));
        }

        #[test]
        fn instructions_stay_on_their_own_side() {
            let body = QuoteMessage::new(
                Timestamp::now().add_secs(300),
                QuotedSide::new("USD", Decimal::new(100, 0)).with_instruction(
                    PaymentInstruction::new(Some("https://pay.example".to_string()), None),
                ),
                QuotedSide::new("KES", Decimal::new(12900, 0)),
            );
            let quote = Quote::from_message(&test_metadata(), &body).unwrap();
            assert!(quote.payin().instruction().is_some());
            assert!(quote.payout().instruction().is_none());
        }

        #[test]
        fn from_message_rejects_bad_currency() {
            let body = QuoteMessage::new(
                Timestamp::now().add_secs(300),
                QuotedSide::new("US$", Decimal::new(100, 0)),
                QuotedSide::new("KES", Decimal::new(12900, 0)),
            );
            let result = Quote::from_message(&test_metadata(), &body);
            assert!(matches!(result, Err(DomainError::InvalidCurrencyCode(_))));
        }

        #[test]
        fn from_message_rejects_non_positive_amount() {
            let body = QuoteMessage::new(
                Timestamp::now().add_secs(300),
                QuotedSide::new("USD", Decimal::ZERO),
                QuotedSide::new("KES", Decimal::new(12900, 0)),
            );
            let result = Quote::from_message(&test_metadata(), &body);
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn expired_quote_message_is_still_representable() {
            let body = QuoteMessage::new(
                Timestamp::now().sub_secs(60),
                QuotedSide::new("USD", Decimal::new(100, 0)),
                QuotedSide::new("KES", Decimal::new(12900, 0)),
            );
            let quote = Quote::from_message(&test_metadata(), &body).unwrap();
            assert!(quote.is_expired());
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn mark_resolved_ordered() {
            let mut quote = test_quote();
            assert!(quote.mark_resolved(QuoteResolution::Ordered).is_ok());
            assert_eq!(quote.resolution(), Some(QuoteResolution::Ordered));
            assert!(quote.is_resolved());
        }

        #[test]
        fn mark_resolved_closed() {
            let mut quote = test_quote();
            assert!(quote.mark_resolved(QuoteResolution::Closed).is_ok());
            assert_eq!(quote.resolution(), Some(QuoteResolution::Closed));
        }

        #[test]
        fn resolution_is_write_once() {
            let mut quote = test_quote();
            quote.mark_resolved(QuoteResolution::Ordered).unwrap();

            let result = quote.mark_resolved(QuoteResolution::Closed);
            assert!(matches!(result, Err(DomainError::QuoteAlreadyResolved(_))));
            assert_eq!(quote.resolution(), Some(QuoteResolution::Ordered));
        }
    }

    mod progress {
        use super::*;

        #[test]
        fn record_order_status_keeps_latest() {
            let mut quote = test_quote();
            quote.record_order_status("PROCESSING");
            quote.record_order_status("TRANSFERRING");
            assert_eq!(quote.order_status(), Some("TRANSFERRING"));
        }

        #[test]
        fn record_close_with_reason() {
            let mut quote = test_quote();
            quote.record_close(Some("offer withdrawn".to_string()));
            assert_eq!(quote.close_reason(), Some("offer withdrawn"));
        }

        #[test]
        fn record_close_without_reason() {
            let mut quote = test_quote();
            quote.record_close(None);
            assert!(quote.close_reason().is_none());
        }

        #[test]
        fn progress_can_arrive_after_resolution() {
            let mut quote = test_quote();
            quote.mark_resolved(QuoteResolution::Ordered).unwrap();
            quote.record_order_status("SUCCESS");
            quote.record_close(Some("settled".to_string()));
            assert_eq!(quote.order_status(), Some("SUCCESS"));
            assert_eq!(quote.close_reason(), Some("settled"));
        }
    }

    mod version {
        use super::*;

        #[test]
        fn version_increments_on_each_mutation() {
            let mut quote = test_quote();
            assert_eq!(quote.version(), 1);

            quote.record_order_status("PROCESSING");
            assert_eq!(quote.version(), 2);

            quote.mark_resolved(QuoteResolution::Ordered).unwrap();
            assert_eq!(quote.version(), 3);

            quote.record_close(None);
            assert_eq!(quote.version(), 4);
        }

        #[test]
        fn rejected_resolution_leaves_version_unchanged() {
            let mut quote = test_quote();
            quote.mark_resolved(QuoteResolution::Ordered).unwrap();
            let version = quote.version();

            assert!(quote.mark_resolved(QuoteResolution::Closed).is_err());
            assert_eq!(quote.version(), version);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_format() {
            let display = test_quote().to_string();
            assert!(display.contains("USD"));
            assert!(display.contains("KES"));
            assert!(display.contains("ex_1"));
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            let mut quote = test_quote();
            quote.mark_resolved(QuoteResolution::Ordered).unwrap();
            quote.record_order_status("SUCCESS");

            let json = serde_json::to_string(&quote).unwrap();
            let deserialized: Quote = serde_json::from_str(&json).unwrap();

            assert_eq!(quote, deserialized);
        }
    }
}
