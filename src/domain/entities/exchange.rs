//! # Exchange Aggregate Root
//!
//! The exchange aggregate tracks one customer/PFI negotiation from RFQ
//! submission to completion.
//!
//! # State Machine
//!
//! ```text
//! accept path:
//!   RFQ_CREATION_PENDING → RFQ_CREATION_COMPLETED → QUOTE_CREATION_COMPLETED
//!     → ORDER_CREATION_PENDING → ORDER_CREATION_COMPLETED → EXCHANGE_COMPLETED
//!
//! reject path:
//!   QUOTE_CREATION_COMPLETED → CLOSE_CREATION_PENDING
//!     → CLOSE_CREATION_COMPLETED → EXCHANGE_COMPLETED
//! ```
//!
//! Each `*_PENDING` submission may instead end at its `*_FAILED` terminal,
//! and a counterparty close arriving before any quote completes the exchange
//! directly from `RFQ_CREATION_COMPLETED`.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::entities::exchange::Exchange;
//! use pfi_exchange::domain::value_objects::exchange_status::Stage;
//! use pfi_exchange::domain::value_objects::ids::{CustomerId, ExchangeId, OfferingId, PfiId};
//!
//! let mut exchange = Exchange::open(
//!     ExchangeId::generate(),
//!     CustomerId::new("did:ex:customer"),
//!     PfiId::new("did:ex:pfi"),
//!     OfferingId::new("off_1"),
//! );
//!
//! exchange.complete_submission(Stage::Rfq).unwrap();
//! assert!(exchange.status().is_awaiting_counterparty());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::exchange_status::{ExchangeStatus, Stage, StageOutcome};
use crate::domain::value_objects::ids::{CustomerId, ExchangeId, OfferingId, PfiId};
use crate::domain::value_objects::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Exchange aggregate root.
///
/// The central entity tracking one negotiation against a single offering:
/// which lifecycle stage it is in, whether the wallet or the counterparty
/// holds the next move, and why it failed if it did.
///
/// # Invariants
///
/// - Status moves only along the transitions [`ExchangeStatus`] allows
/// - `*_FAILED` and `EXCHANGE_COMPLETED` states are never left
/// - `failure_reason` is set exactly when a submission stage fails
/// - Version increases on every observable mutation
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::entities::exchange::Exchange;
/// use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, Stage};
/// use pfi_exchange::domain::value_objects::ids::{CustomerId, ExchangeId, OfferingId, PfiId};
///
/// let mut exchange = Exchange::open(
///     ExchangeId::generate(),
///     CustomerId::new("did:ex:customer"),
///     PfiId::new("did:ex:pfi"),
///     OfferingId::new("off_1"),
/// );
///
/// exchange.complete_submission(Stage::Rfq).unwrap();
/// exchange.adopt_quote().unwrap();
/// exchange.begin_order().unwrap();
/// exchange.complete_submission(Stage::Order).unwrap();
/// exchange.complete().unwrap();
/// assert_eq!(exchange.status(), ExchangeStatus::Completed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exchange {
    /// Unique identifier, minted with the RFQ message that opened it.
    id: ExchangeId,
    /// The customer driving this exchange.
    customer_id: CustomerId,
    /// The counterparty institution.
    pfi_id: PfiId,
    /// The offering this exchange was opened against.
    offering_id: OfferingId,
    /// Current lifecycle status.
    status: ExchangeStatus,
    /// Why the exchange failed, if it did.
    failure_reason: Option<String>,
    /// Version for optimistic locking.
    version: u64,
    /// When this exchange was opened.
    created_at: Timestamp,
    /// When this exchange was last updated.
    updated_at: Timestamp,
}

impl Exchange {
    /// Opens a new exchange in `RFQ_CREATION_PENDING`.
    ///
    /// The id is the one minted for the RFQ message; the aggregate never
    /// generates its own.
    #[must_use]
    pub fn open(
        id: ExchangeId,
        customer_id: CustomerId,
        pfi_id: PfiId,
        offering_id: OfferingId,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            customer_id,
            pfi_id,
            offering_id,
            status: ExchangeStatus::new(Stage::Rfq, StageOutcome::Pending),
            failure_reason: None,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Creates an exchange with specific values (for reconstruction from storage).
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ExchangeId,
        customer_id: CustomerId,
        pfi_id: PfiId,
        offering_id: OfferingId,
        status: ExchangeStatus,
        failure_reason: Option<String>,
        version: u64,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            customer_id,
            pfi_id,
            offering_id,
            status,
            failure_reason,
            version,
            created_at,
            updated_at,
        }
    }

    fn transition_to(&mut self, target: ExchangeStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = Timestamp::now();
        self.version = self.version.saturating_add(1);
        Ok(())
    }

    // ========== Accessors ==========

    /// Returns the exchange ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ExchangeId {
        &self.id
    }

    /// Returns the customer ID.
    #[inline]
    #[must_use]
    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Returns the counterparty PFI ID.
    #[inline]
    #[must_use]
    pub fn pfi_id(&self) -> &PfiId {
        &self.pfi_id
    }

    /// Returns the offering this exchange was opened against.
    #[inline]
    #[must_use]
    pub fn offering_id(&self) -> &OfferingId {
        &self.offering_id
    }

    /// Returns the current lifecycle status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ExchangeStatus {
        self.status
    }

    /// Returns the failure reason, if any.
    #[inline]
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns when this exchange was opened.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns when this exchange was last updated.
    #[inline]
    #[must_use]
    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    // ========== State Helpers ==========

    /// Returns true if this exchange has reached a terminal status.
    #[inline]
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns true if the counterparty holds the next move.
    #[inline]
    #[must_use]
    pub fn is_awaiting_counterparty(&self) -> bool {
        self.status.is_awaiting_counterparty()
    }

    /// Returns true if a quote has been adopted for this exchange.
    #[inline]
    #[must_use]
    pub fn quote_received(&self) -> bool {
        self.status.quote_received()
    }

    // ========== State Transitions ==========

    /// Records that the pending submission for `stage` was accepted.
    ///
    /// Transitions: `{stage}_CREATION_PENDING` → `{stage}_CREATION_COMPLETED`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if `stage` is not the
    /// pending stage.
    pub fn complete_submission(&mut self, stage: Stage) -> DomainResult<()> {
        self.transition_to(ExchangeStatus::new(stage, StageOutcome::Completed))
    }

    /// Records that the pending submission for `stage` was not accepted.
    ///
    /// Transitions: `{stage}_CREATION_PENDING` → `{stage}_CREATION_FAILED`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if `stage` is not the
    /// pending stage.
    pub fn fail_submission(&mut self, stage: Stage, reason: impl Into<String>) -> DomainResult<()> {
        self.transition_to(ExchangeStatus::new(stage, StageOutcome::Failed))?;
        self.failure_reason = Some(reason.into());
        Ok(())
    }

    /// Adopts the counterparty's quote.
    ///
    /// Transitions: `RFQ_CREATION_COMPLETED` → `QUOTE_CREATION_COMPLETED`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if no RFQ has been
    /// acknowledged or a quote was already adopted.
    pub fn adopt_quote(&mut self) -> DomainResult<()> {
        self.transition_to(ExchangeStatus::new(Stage::Quote, StageOutcome::Completed))
    }

    /// Starts an order submission accepting the adopted quote.
    ///
    /// Transitions: `QUOTE_CREATION_COMPLETED` → `ORDER_CREATION_PENDING`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if no quote is adopted.
    pub fn begin_order(&mut self) -> DomainResult<()> {
        self.transition_to(ExchangeStatus::new(Stage::Order, StageOutcome::Pending))
    }

    /// Starts a close submission rejecting the adopted quote.
    ///
    /// Transitions: `QUOTE_CREATION_COMPLETED` → `CLOSE_CREATION_PENDING`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if no quote is adopted.
    pub fn begin_close(&mut self) -> DomainResult<()> {
        self.transition_to(ExchangeStatus::new(Stage::Close, StageOutcome::Pending))
    }

    /// Completes the exchange.
    ///
    /// Transitions: `RFQ_CREATION_COMPLETED` / `ORDER_CREATION_COMPLETED` /
    /// `CLOSE_CREATION_COMPLETED` → `EXCHANGE_COMPLETED`
    ///
    /// Idempotent: completing an already completed exchange is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if called from a status
    /// that cannot complete, such as a pending submission.
    pub fn complete(&mut self) -> DomainResult<()> {
        if self.status == ExchangeStatus::Completed {
            return Ok(());
        }
        self.transition_to(ExchangeStatus::Completed)
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Exchange({} {} -> {} [{}])",
            self.id, self.customer_id, self.pfi_id, self.status
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_exchange() -> Exchange {
        Exchange::open(
            ExchangeId::generate(),
            CustomerId::new("did:ex:customer"),
            PfiId::new("did:ex:pfi"),
            OfferingId::new("off_1"),
        )
    }

    mod construction {
        use super::*;

        #[test]
        fn open_starts_with_rfq_pending() {
            let exchange = test_exchange();
            assert_eq!(
                exchange.status(),
                ExchangeStatus::new(Stage::Rfq, StageOutcome::Pending)
            );
            assert_eq!(exchange.version(), 1);
            assert!(exchange.failure_reason().is_none());
            assert!(!exchange.is_terminal());
            assert!(!exchange.quote_received());
        }

        #[test]
        fn open_keeps_the_given_id() {
            let id = ExchangeId::new("ex_given");
            let exchange = Exchange::open(
                id.clone(),
                CustomerId::new("c"),
                PfiId::new("p"),
                OfferingId::new("o"),
            );
            assert_eq!(exchange.id(), &id);
        }

        #[test]
        fn from_parts_reconstructs_verbatim() {
            let now = Timestamp::now();
            let exchange = Exchange::from_parts(
                ExchangeId::new("ex_1"),
                CustomerId::new("c"),
                PfiId::new("p"),
                OfferingId::new("o"),
                ExchangeStatus::Completed,
                None,
                7,
                now,
                now,
            );
            assert_eq!(exchange.status(), ExchangeStatus::Completed);
            assert_eq!(exchange.version(), 7);
        }
    }

    mod submission_outcomes {
        use super::*;

        #[test]
        fn complete_submission_acknowledges_rfq() {
            let mut exchange = test_exchange();
            assert!(exchange.complete_submission(Stage::Rfq).is_ok());
            assert_eq!(
                exchange.status(),
                ExchangeStatus::new(Stage::Rfq, StageOutcome::Completed)
            );
            assert!(exchange.is_awaiting_counterparty());
        }

        #[test]
        fn complete_submission_rejects_wrong_stage() {
            let mut exchange = test_exchange();
            let result = exchange.complete_submission(Stage::Order);
            assert!(matches!(
                result,
                Err(DomainError::InvalidStatusTransition { .. })
            ));
        }

        #[test]
        fn fail_submission_records_the_reason() {
            let mut exchange = test_exchange();
            exchange
                .fail_submission(Stage::Rfq, "gateway rejected rfq")
                .unwrap();
            assert_eq!(
                exchange.status(),
                ExchangeStatus::new(Stage::Rfq, StageOutcome::Failed)
            );
            assert_eq!(exchange.failure_reason(), Some("gateway rejected rfq"));
            assert!(exchange.is_terminal());
        }

        #[test]
        fn fail_submission_leaves_reason_unset_when_transition_is_invalid() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            let result = exchange.fail_submission(Stage::Rfq, "late failure");
            assert!(result.is_err());
            assert!(exchange.failure_reason().is_none());
        }

        #[test]
        fn failed_stage_accepts_no_further_moves() {
            let mut exchange = test_exchange();
            exchange.fail_submission(Stage::Rfq, "boom").unwrap();
            assert!(exchange.adopt_quote().is_err());
            assert!(exchange.complete().is_err());
        }
    }

    mod quote_adoption {
        use super::*;

        #[test]
        fn adopt_quote_after_rfq_acknowledged() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            assert!(exchange.adopt_quote().is_ok());
            assert_eq!(
                exchange.status(),
                ExchangeStatus::new(Stage::Quote, StageOutcome::Completed)
            );
            assert!(exchange.quote_received());
            assert!(!exchange.is_awaiting_counterparty());
        }

        #[test]
        fn adopt_quote_fails_before_rfq_acknowledged() {
            let mut exchange = test_exchange();
            assert!(matches!(
                exchange.adopt_quote(),
                Err(DomainError::InvalidStatusTransition { .. })
            ));
        }

        #[test]
        fn adopt_quote_is_not_repeatable() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            exchange.adopt_quote().unwrap();
            assert!(exchange.adopt_quote().is_err());
        }
    }

    mod decision_branches {
        use super::*;

        fn quoted_exchange() -> Exchange {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            exchange.adopt_quote().unwrap();
            exchange
        }

        #[test]
        fn begin_order_accepts_the_quote() {
            let mut exchange = quoted_exchange();
            assert!(exchange.begin_order().is_ok());
            assert_eq!(
                exchange.status(),
                ExchangeStatus::new(Stage::Order, StageOutcome::Pending)
            );
        }

        #[test]
        fn begin_close_rejects_the_quote() {
            let mut exchange = quoted_exchange();
            assert!(exchange.begin_close().is_ok());
            assert_eq!(
                exchange.status(),
                ExchangeStatus::new(Stage::Close, StageOutcome::Pending)
            );
        }

        #[test]
        fn decision_requires_an_adopted_quote() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            assert!(exchange.begin_order().is_err());
            assert!(exchange.begin_close().is_err());
        }

        #[test]
        fn decisions_are_mutually_exclusive() {
            let mut exchange = quoted_exchange();
            exchange.begin_order().unwrap();
            assert!(exchange.begin_close().is_err());
        }

        #[test]
        fn order_path_runs_to_completion() {
            let mut exchange = quoted_exchange();
            exchange.begin_order().unwrap();
            exchange.complete_submission(Stage::Order).unwrap();
            exchange.complete().unwrap();
            assert_eq!(exchange.status(), ExchangeStatus::Completed);
        }

        #[test]
        fn close_path_runs_to_completion() {
            let mut exchange = quoted_exchange();
            exchange.begin_close().unwrap();
            exchange.complete_submission(Stage::Close).unwrap();
            exchange.complete().unwrap();
            assert_eq!(exchange.status(), ExchangeStatus::Completed);
        }
    }

    mod completion {
        use super::*;

        #[test]
        fn counterparty_close_before_quote_completes_directly() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            assert!(exchange.complete().is_ok());
            assert_eq!(exchange.status(), ExchangeStatus::Completed);
        }

        #[test]
        fn complete_is_idempotent() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();
            exchange.complete().unwrap();
            let version = exchange.version();

            assert!(exchange.complete().is_ok());
            assert_eq!(exchange.version(), version);
        }

        #[test]
        fn complete_fails_while_submission_is_pending() {
            let mut exchange = test_exchange();
            assert!(matches!(
                exchange.complete(),
                Err(DomainError::InvalidStatusTransition { .. })
            ));
        }
    }

    mod version {
        use super::*;

        #[test]
        fn version_increments_on_each_transition() {
            let mut exchange = test_exchange();
            assert_eq!(exchange.version(), 1);

            exchange.complete_submission(Stage::Rfq).unwrap();
            assert_eq!(exchange.version(), 2);

            exchange.adopt_quote().unwrap();
            assert_eq!(exchange.version(), 3);

            exchange.begin_order().unwrap();
            assert_eq!(exchange.version(), 4);
        }

        #[test]
        fn rejected_transition_leaves_version_unchanged() {
            let mut exchange = test_exchange();
            let version = exchange.version();
            assert!(exchange.adopt_quote().is_err());
            assert_eq!(exchange.version(), version);
        }
    }

    mod display {
        use super::*;

        #[test]
        fn display_format() {
            let exchange = test_exchange();
            let display = exchange.to_string();
            assert!(display.contains("Exchange("));
            assert!(display.contains("did:ex:customer"));
            assert!(display.contains("RFQ_CREATION_PENDING"));
        }
    }

    mod serde {
        use super::*;

        #[test]
        fn serde_roundtrip() {
            let mut exchange = test_exchange();
            exchange.complete_submission(Stage::Rfq).unwrap();

            let json = serde_json::to_string(&exchange).unwrap();
            let deserialized: Exchange = serde_json::from_str(&json).unwrap();

            assert_eq!(exchange, deserialized);
        }
    }
}
