//! # Payment Value Objects
//!
//! Currency codes, quoted payment sides and customer payment selections.
//!
//! A quote carries one [`PaymentDetails`] for each side of the exchange: the
//! payin side (what the customer pays) and the payout side (what the customer
//! receives). Each side sources its currency, amount and fee from its own side
//! of the counterparty's quote message.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::value_objects::payment::{CurrencyCode, PaymentDetails};
//! use rust_decimal::Decimal;
//!
//! let currency = CurrencyCode::new("usd").unwrap();
//! assert_eq!(currency.as_str(), "USD");
//!
//! let payin = PaymentDetails::new(currency, Decimal::new(15000, 2)).unwrap();
//! assert!(payin.fee().is_none());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency code for one side of an exchange.
///
/// Normalized to upper case. Accepts ISO 4217 codes as well as longer
/// asset tickers; the only structural requirements are non-emptiness and
/// ASCII alphanumeric characters.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::payment::CurrencyCode;
///
/// let code = CurrencyCode::new("kes").unwrap();
/// assert_eq!(code.as_str(), "KES");
///
/// assert!(CurrencyCode::new("").is_err());
/// assert!(CurrencyCode::new("US-D").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Creates a currency code, normalizing to upper case.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidCurrencyCode`] if the code is empty or
    /// contains non-alphanumeric characters.
    pub fn new(code: impl Into<String>) -> DomainResult<Self> {
        let code = code.into();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DomainError::InvalidCurrencyCode(code));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Returns the currency code as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CurrencyCode {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Settlement instructions attached to one side of a quote.
///
/// Free-form counterparty-supplied fields: a link to complete payment out of
/// band and/or human-readable instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInstruction {
    /// Link the customer can follow to complete this side of the payment.
    pub link: Option<String>,
    /// Human-readable settlement instructions.
    pub instruction: Option<String>,
}

impl PaymentInstruction {
    /// Creates an instruction with both fields populated as given.
    #[must_use]
    pub fn new(link: Option<String>, instruction: Option<String>) -> Self {
        Self { link, instruction }
    }

    /// Returns true if neither field carries content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.link.is_none() && self.instruction.is_none()
    }
}

/// One quoted side of an exchange: currency, amount, optional fee and
/// optional settlement instructions.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::payment::{CurrencyCode, PaymentDetails};
/// use rust_decimal::Decimal;
///
/// let details = PaymentDetails::new(
///     CurrencyCode::new("USD").unwrap(),
///     Decimal::new(10000, 2),
/// )
/// .unwrap()
/// .with_fee(Decimal::new(50, 2))
/// .unwrap();
///
/// assert_eq!(details.fee(), Some(Decimal::new(50, 2)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Currency of this side.
    currency: CurrencyCode,
    /// Amount paid or received on this side.
    amount: Decimal,
    /// Fee charged on this side, if any.
    fee: Option<Decimal>,
    /// Settlement instructions for this side, if supplied.
    instruction: Option<PaymentInstruction>,
}

impl PaymentDetails {
    /// Creates payment details for one side of a quote.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if the amount is not positive.
    pub fn new(currency: CurrencyCode, amount: Decimal) -> DomainResult<Self> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "amount must be positive, got {amount}"
            )));
        }
        Ok(Self {
            currency,
            amount,
            fee: None,
            instruction: None,
        })
    }

    /// Attaches a fee to this side.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if the fee is negative.
    pub fn with_fee(mut self, fee: Decimal) -> DomainResult<Self> {
        if fee < Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "fee must not be negative, got {fee}"
            )));
        }
        self.fee = Some(fee);
        Ok(self)
    }

    /// Attaches settlement instructions to this side.
    #[must_use]
    pub fn with_instruction(mut self, instruction: PaymentInstruction) -> Self {
        self.instruction = Some(instruction);
        self
    }

    /// Returns the currency of this side.
    #[inline]
    #[must_use]
    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    /// Returns the amount of this side.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the fee charged on this side, if any.
    #[inline]
    #[must_use]
    pub const fn fee(&self) -> Option<Decimal> {
        self.fee
    }

    /// Returns the settlement instructions for this side, if supplied.
    #[inline]
    #[must_use]
    pub fn instruction(&self) -> Option<&PaymentInstruction> {
        self.instruction.as_ref()
    }
}

/// Customer payment selections supplied when opening an exchange.
///
/// Names the payin amount and the payment method kinds for both sides; the
/// RFQ message carries these verbatim. Method kinds are opaque strings from
/// the offering's catalog, validated only for presence.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::payment::PaymentSelections;
/// use rust_decimal::Decimal;
///
/// let selections =
///     PaymentSelections::new(Decimal::new(50000, 2), "BANK_TRANSFER", "MOMO_MPESA").unwrap();
/// assert_eq!(selections.payin_method(), "BANK_TRANSFER");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSelections {
    /// Amount of payin currency the customer wants to exchange.
    payin_amount: Decimal,
    /// Selected payin method kind.
    payin_method: String,
    /// Selected payout method kind.
    payout_method: String,
}

impl PaymentSelections {
    /// Creates payment selections for a new exchange.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidAmount`] if the payin amount is not
    /// positive, or [`DomainError::EmptyField`] if either method kind is
    /// empty.
    pub fn new(
        payin_amount: Decimal,
        payin_method: impl Into<String>,
        payout_method: impl Into<String>,
    ) -> DomainResult<Self> {
        if payin_amount <= Decimal::ZERO {
            return Err(DomainError::InvalidAmount(format!(
                "payin amount must be positive, got {payin_amount}"
            )));
        }
        let payin_method = payin_method.into();
        if payin_method.is_empty() {
            return Err(DomainError::EmptyField("payin_method"));
        }
        let payout_method = payout_method.into();
        if payout_method.is_empty() {
            return Err(DomainError::EmptyField("payout_method"));
        }
        Ok(Self {
            payin_amount,
            payin_method,
            payout_method,
        })
    }

    /// Returns the payin amount.
    #[inline]
    #[must_use]
    pub const fn payin_amount(&self) -> Decimal {
        self.payin_amount
    }

    /// Returns the selected payin method kind.
    #[inline]
    #[must_use]
    pub fn payin_method(&self) -> &str {
        &self.payin_method
    }

    /// Returns the selected payout method kind.
    #[inline]
    #[must_use]
    pub fn payout_method(&self) -> &str {
        &self.payout_method
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    mod currency_code {
        use super::*;

        #[test]
        fn normalizes_to_upper_case() {
            assert_eq!(CurrencyCode::new("usdc").unwrap().as_str(), "USDC");
        }

        #[test]
        fn rejects_empty() {
            assert_eq!(
                CurrencyCode::new(""),
                Err(DomainError::InvalidCurrencyCode(String::new()))
            );
        }

        #[test]
        fn rejects_non_alphanumeric() {
            assert!(CurrencyCode::new("US D").is_err());
            assert!(CurrencyCode::new("US-D").is_err());
        }

        #[test]
        fn display_matches_as_str() {
            let code = CurrencyCode::new("KES").unwrap();
            assert_eq!(code.to_string(), code.as_str());
        }

        #[test]
        fn serde_roundtrip() {
            let code = CurrencyCode::new("EUR").unwrap();
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, "\"EUR\"");
            let deserialized: CurrencyCode = serde_json::from_str(&json).unwrap();
            assert_eq!(code, deserialized);
        }
    }

    mod payment_details {
        use super::*;

        #[test]
        fn new_with_positive_amount() {
            let details = PaymentDetails::new(usd(), Decimal::new(100, 0)).unwrap();
            assert_eq!(details.amount(), Decimal::new(100, 0));
            assert_eq!(details.currency().as_str(), "USD");
            assert!(details.fee().is_none());
            assert!(details.instruction().is_none());
        }

        #[test]
        fn rejects_zero_amount() {
            assert!(PaymentDetails::new(usd(), Decimal::ZERO).is_err());
        }

        #[test]
        fn rejects_negative_amount() {
            assert!(PaymentDetails::new(usd(), Decimal::new(-1, 0)).is_err());
        }

        #[test]
        fn with_fee() {
            let details = PaymentDetails::new(usd(), Decimal::new(100, 0))
                .unwrap()
                .with_fee(Decimal::new(250, 2))
                .unwrap();
            assert_eq!(details.fee(), Some(Decimal::new(250, 2)));
        }

        #[test]
        fn zero_fee_is_allowed() {
            let details = PaymentDetails::new(usd(), Decimal::new(100, 0))
                .unwrap()
                .with_fee(Decimal::ZERO)
                .unwrap();
            assert_eq!(details.fee(), Some(Decimal::ZERO));
        }

        #[test]
        fn negative_fee_is_rejected() {
            let result = PaymentDetails::new(usd(), Decimal::new(100, 0))
                .unwrap()
                .with_fee(Decimal::new(-1, 0));
            assert!(result.is_err());
        }

        #[test]
        fn with_instruction() {
            let instruction = PaymentInstruction::new(
                Some("https://pay.example/abc".to_string()),
                Some("complete within 30 minutes".to_string()),
            );
            let details = PaymentDetails::new(usd(), Decimal::new(100, 0))
                .unwrap()
                .with_instruction(instruction.clone());
            assert_eq!(details.instruction(), Some(&instruction));
        }

        #[test]
        fn serde_roundtrip() {
            let details = PaymentDetails::new(usd(), Decimal::new(12345, 2))
                .unwrap()
                .with_fee(Decimal::new(99, 2))
                .unwrap();
            let json = serde_json::to_string(&details).unwrap();
            let deserialized: PaymentDetails = serde_json::from_str(&json).unwrap();
            assert_eq!(details, deserialized);
        }
    }

    mod payment_instruction {
        use super::*;

        #[test]
        fn default_is_empty() {
            assert!(PaymentInstruction::default().is_empty());
        }

        #[test]
        fn populated_is_not_empty() {
            let instruction = PaymentInstruction::new(Some("https://x".to_string()), None);
            assert!(!instruction.is_empty());
        }
    }

    mod payment_selections {
        use super::*;

        #[test]
        fn new_with_valid_fields() {
            let selections =
                PaymentSelections::new(Decimal::new(100, 0), "BANK_TRANSFER", "WALLET").unwrap();
            assert_eq!(selections.payin_amount(), Decimal::new(100, 0));
            assert_eq!(selections.payin_method(), "BANK_TRANSFER");
            assert_eq!(selections.payout_method(), "WALLET");
        }

        #[test]
        fn rejects_non_positive_amount() {
            assert!(PaymentSelections::new(Decimal::ZERO, "A", "B").is_err());
            assert!(PaymentSelections::new(Decimal::new(-5, 0), "A", "B").is_err());
        }

        #[test]
        fn rejects_empty_method_kinds() {
            assert_eq!(
                PaymentSelections::new(Decimal::new(1, 0), "", "WALLET"),
                Err(DomainError::EmptyField("payin_method"))
            );
            assert_eq!(
                PaymentSelections::new(Decimal::new(1, 0), "BANK", ""),
                Err(DomainError::EmptyField("payout_method"))
            );
        }
    }
}
