//! # Message Bodies
//!
//! Typed payloads for each protocol message kind.
//!
//! Bodies are plain wire records: counterparty-supplied values arrive here
//! unvalidated and are lifted into validated value objects by the entities
//! that consume them. Customer-authored bodies are built from already
//! validated selections, so no checks are repeated at this layer.

use crate::domain::value_objects::ids::OfferingId;
use crate::domain::value_objects::payment::{PaymentInstruction, PaymentSelections};
use crate::domain::value_objects::timestamp::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Body of an RFQ message: what the customer wants to exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqMessage {
    /// The offering this request is placed against.
    pub offering_id: OfferingId,
    /// Amount of payin currency the customer will pay.
    pub payin_amount: Decimal,
    /// Selected payin method kind from the offering's catalog.
    pub payin_method: String,
    /// Selected payout method kind from the offering's catalog.
    pub payout_method: String,
}

impl RfqMessage {
    /// Builds an RFQ body from validated payment selections.
    #[must_use]
    pub fn new(offering_id: OfferingId, selections: &PaymentSelections) -> Self {
        Self {
            offering_id,
            payin_amount: selections.payin_amount(),
            payin_method: selections.payin_method().to_string(),
            payout_method: selections.payout_method().to_string(),
        }
    }
}

/// One side of a quoted exchange as it appears on the wire.
///
/// The currency code arrives as a raw string and is validated when the
/// quote record is built from this body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedSide {
    /// Currency of this side.
    pub currency_code: String,
    /// Amount paid or received on this side.
    pub amount: Decimal,
    /// Fee charged on this side, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
    /// Settlement instructions for this side, if supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_instruction: Option<PaymentInstruction>,
}

impl QuotedSide {
    /// Creates a quoted side with no fee or instructions.
    #[must_use]
    pub fn new(currency_code: impl Into<String>, amount: Decimal) -> Self {
        Self {
            currency_code: currency_code.into(),
            amount,
            fee: None,
            payment_instruction: None,
        }
    }

    /// Attaches a fee to this side.
    #[must_use]
    pub fn with_fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Attaches settlement instructions to this side.
    #[must_use]
    pub fn with_instruction(mut self, instruction: PaymentInstruction) -> Self {
        self.payment_instruction = Some(instruction);
        self
    }
}

/// Body of a quote message: the counterparty's priced response to an RFQ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteMessage {
    /// When this quote stops being honored.
    pub expires_at: Timestamp,
    /// What the customer pays.
    pub payin: QuotedSide,
    /// What the customer receives.
    pub payout: QuotedSide,
}

impl QuoteMessage {
    /// Creates a quote body.
    #[must_use]
    pub fn new(expires_at: Timestamp, payin: QuotedSide, payout: QuotedSide) -> Self {
        Self {
            expires_at,
            payin,
            payout,
        }
    }
}

/// Body of an order status message: free-form progress from the counterparty.
///
/// The status vocabulary belongs to the counterparty. Only the terminal
/// `"SUCCESS"` value (matched case-insensitively) has protocol meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatusMessage {
    /// Counterparty-defined status label.
    pub status: String,
}

impl OrderStatusMessage {
    /// Creates an order status body.
    #[must_use]
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }

    /// Returns true if this status reports successful settlement.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("SUCCESS")
    }
}

/// Body of a close message: why the exchange ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseMessage {
    /// Human-readable close reason, if one was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl CloseMessage {
    /// Creates a close body.
    #[must_use]
    pub fn new(reason: Option<String>) -> Self {
        Self { reason }
    }
}
