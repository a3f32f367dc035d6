//! # Exchange Lifecycle Engine
//!
//! Drives the customer side of an exchange negotiation: opening with an RFQ,
//! reporting whether the counterparty has quoted, and resolving that quote
//! with an Order or a Close. Every outbound message is handed to the
//! [`SubmissionPool`], so engine calls return as soon as the exchange record
//! is persisted in its `*_PENDING` state.
//!
//! ```text
//! create_exchange ───► RFQ_CREATION_PENDING ──ack──► RFQ_CREATION_COMPLETED
//!                                            └─err──► RFQ_CREATION_FAILED
//!
//! decide_on_quote(proceed = true)  ───► ORDER_CREATION_PENDING ──► ...
//! decide_on_quote(proceed = false) ───► CLOSE_CREATION_PENDING ──► ...
//! ```
//!
//! The pooled submission task re-resolves the customer's signing credentials,
//! signs the message, and submits it through the gateway under the engine's
//! [`RetryPolicy`]. Exactly one status transition is recorded per attempt
//! cycle: `complete_submission` on ack, `fail_submission` on rejection or
//! retry exhaustion. If credentials have vanished between the engine call and
//! the task running, the task logs and leaves the exchange pending so the
//! problem is visible rather than misfiled as a counterparty failure.

use std::sync::Arc;

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::retry::{execute_with_retry, RetryPolicy};
use crate::application::services::submission::SubmissionPool;
use crate::domain::entities::{Exchange, QuoteResolution};
use crate::domain::messages::Message;
use crate::domain::value_objects::{
    CustomerId, ExchangeId, ExchangeStatus, OfferingId, PaymentSelections, Stage, StageOutcome,
};
use crate::infrastructure::gateway::{MessageGateway, OfferingError, OfferingLookup};
use crate::infrastructure::identity::{IdentityError, IdentityProvider};
use crate::infrastructure::persistence::{ExchangeStore, QuoteStore};

/// Orchestrates customer-initiated lifecycle operations for exchanges.
///
/// The engine owns no state of its own; exchanges and quotes live in the
/// stores, and submissions run on the shared pool keyed by exchange id so
/// messages for one exchange are always sent in order.
#[derive(Debug)]
pub struct LifecycleEngine {
    exchanges: Arc<dyn ExchangeStore>,
    quotes: Arc<dyn QuoteStore>,
    gateway: Arc<dyn MessageGateway>,
    identity: Arc<dyn IdentityProvider>,
    offerings: Arc<dyn OfferingLookup>,
    pool: Arc<SubmissionPool>,
    retry_policy: RetryPolicy,
}

impl LifecycleEngine {
    /// Creates an engine over the given stores, gateway, and identity source.
    #[must_use]
    pub fn new(
        exchanges: Arc<dyn ExchangeStore>,
        quotes: Arc<dyn QuoteStore>,
        gateway: Arc<dyn MessageGateway>,
        identity: Arc<dyn IdentityProvider>,
        offerings: Arc<dyn OfferingLookup>,
        pool: Arc<SubmissionPool>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            exchanges,
            quotes,
            gateway,
            identity,
            offerings,
            pool,
            retry_policy,
        }
    }

    /// Opens a new exchange by submitting an RFQ against an offering.
    ///
    /// Verifies the customer has signing credentials and the offering exists
    /// and has not expired, persists the exchange in `RFQ_CREATION_PENDING`,
    /// and enqueues the RFQ submission. Returns the minted exchange id
    /// without waiting for the counterparty's ack.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::IdentityNotFound`] when the customer has
    /// no registered credentials, [`ApplicationError::OfferingNotFound`] when
    /// the offering is unknown or expired, and store or pool errors when
    /// persistence or dispatch fails.
    pub async fn create_exchange(
        &self,
        customer_id: CustomerId,
        offering_id: OfferingId,
        selections: PaymentSelections,
    ) -> ApplicationResult<ExchangeId> {
        if let Err(error) = self.identity.resolve_credentials(&customer_id).await {
            return Err(map_identity_error(error));
        }
        let offering = self
            .offerings
            .find_offering(&offering_id)
            .await
            .map_err(map_offering_error)?;
        if offering.is_expired() {
            return Err(ApplicationError::offering_not_found(offering_id.as_str()));
        }

        let message = Message::rfq(&customer_id, &offering.pfi_id, offering_id.clone(), &selections);
        let exchange_id = message.exchange_id().clone();
        let exchange = Exchange::open(
            exchange_id.clone(),
            customer_id,
            offering.pfi_id.clone(),
            offering_id,
        );
        self.exchanges.save(&exchange).await?;
        tracing::info!(
            %exchange_id,
            customer_id = %exchange.customer_id(),
            pfi_id = %exchange.pfi_id(),
            offering_id = %exchange.offering_id(),
            "exchange opened"
        );

        self.spawn_submission(exchange_id.clone(), Stage::Rfq, message)
            .await?;
        Ok(exchange_id)
    }

    /// Returns true once the counterparty's quote has been adopted.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::ExchangeNotFound`] when the exchange id is
    /// unknown.
    pub async fn is_rfq_settled(&self, exchange_id: &ExchangeId) -> ApplicationResult<bool> {
        let exchange = self.load_exchange(exchange_id).await?;
        Ok(exchange.quote_received())
    }

    /// Resolves the standing quote: proceed with an Order, or decline with a
    /// Close carrying an optional reason.
    ///
    /// The decision is checked against the exchange's current status before
    /// the quote is claimed with a single conditional store operation, so a
    /// refused decision never consumes the quote's write-once resolution
    /// slot and two racing decisions cannot both go out; the loser observes
    /// the quote as already resolved. Only then does the exchange transition
    /// to the pending stage and the Order or Close message get enqueued.
    ///
    /// # Errors
    ///
    /// Returns [`ApplicationError::ExchangeNotFound`] when the exchange id is
    /// unknown, [`ApplicationError::QuoteNotFound`] when no unresolved quote
    /// is on record or its adoption is not yet visible on the exchange
    /// (including a second decision on the same exchange), and store or pool
    /// errors when persistence or dispatch fails.
    pub async fn decide_on_quote(
        &self,
        exchange_id: &ExchangeId,
        proceed: bool,
        close_reason: Option<String>,
    ) -> ApplicationResult<()> {
        let mut exchange = self.load_exchange(exchange_id).await?;

        let (resolution, target) = if proceed {
            (
                QuoteResolution::Ordered,
                ExchangeStatus::Order(StageOutcome::Pending),
            )
        } else {
            (
                QuoteResolution::Closed,
                ExchangeStatus::Close(StageOutcome::Pending),
            )
        };
        // The resolution slot is write-once; claim it only once the
        // transition is known to apply to the exchange as loaded.
        if !exchange.status().can_transition_to(target) {
            return Err(ApplicationError::quote_not_found(exchange_id.as_str()));
        }
        match self.quotes.resolve(exchange_id, resolution).await {
            Ok(_) => {}
            Err(error) if error.is_not_found() || error.is_conflict() => {
                return Err(ApplicationError::quote_not_found(exchange_id.as_str()));
            }
            Err(error) => return Err(ApplicationError::Store(error)),
        }

        let (stage, message) = if proceed {
            exchange.begin_order()?;
            (
                Stage::Order,
                Message::order(exchange.customer_id(), exchange.pfi_id(), exchange_id.clone()),
            )
        } else {
            exchange.begin_close()?;
            (
                Stage::Close,
                Message::close(
                    exchange.customer_id(),
                    exchange.pfi_id(),
                    exchange_id.clone(),
                    close_reason,
                ),
            )
        };
        self.exchanges.save(&exchange).await?;
        tracing::info!(%exchange_id, proceed, "quote decision recorded");

        self.spawn_submission(exchange_id.clone(), stage, message)
            .await
    }

    async fn load_exchange(&self, exchange_id: &ExchangeId) -> ApplicationResult<Exchange> {
        self.exchanges
            .find_by_id(exchange_id)
            .await?
            .ok_or_else(|| ApplicationError::exchange_not_found(exchange_id.as_str()))
    }

    /// Hands the submit-and-advance task to the pool, keyed by exchange id.
    async fn spawn_submission(
        &self,
        exchange_id: ExchangeId,
        stage: Stage,
        message: Message,
    ) -> ApplicationResult<()> {
        let exchanges = Arc::clone(&self.exchanges);
        let identity = Arc::clone(&self.identity);
        let gateway = Arc::clone(&self.gateway);
        let policy = self.retry_policy.clone();
        let key = exchange_id.clone();
        let task = async move {
            run_submission(exchanges, identity, gateway, policy, exchange_id, stage, message).await;
        };
        self.pool.dispatch(&key, task).await
    }
}

fn map_identity_error(error: IdentityError) -> ApplicationError {
    match error {
        IdentityError::NotFound { customer_id } => {
            ApplicationError::identity_not_found(customer_id)
        }
        other => ApplicationError::Identity(other),
    }
}

fn map_offering_error(error: OfferingError) -> ApplicationError {
    match error {
        OfferingError::NotFound { id } => ApplicationError::offering_not_found(id),
        other => ApplicationError::Offering(other),
    }
}

/// Signs and submits one message, then records the outcome on the exchange.
async fn run_submission(
    exchanges: Arc<dyn ExchangeStore>,
    identity: Arc<dyn IdentityProvider>,
    gateway: Arc<dyn MessageGateway>,
    policy: RetryPolicy,
    exchange_id: ExchangeId,
    stage: Stage,
    message: Message,
) {
    let kind = message.kind();
    let customer_id = CustomerId::from(message.metadata().from.as_str());
    let credentials = match identity.resolve_credentials(&customer_id).await {
        Ok(credentials) => credentials,
        Err(error) => {
            tracing::error!(
                %exchange_id,
                %kind,
                error = %error,
                "credentials unavailable at submission, exchange left pending"
            );
            return;
        }
    };
    let signed = match credentials.sign(&message) {
        Ok(signed) => signed,
        Err(error) => {
            tracing::error!(
                %exchange_id,
                %kind,
                error = %error,
                "signing failed, exchange left pending"
            );
            return;
        }
    };

    let result = execute_with_retry(&policy, || {
        let gateway = Arc::clone(&gateway);
        let signed = signed.clone();
        async move { gateway.submit(kind, &signed).await }
    })
    .await;

    match result {
        Ok(ack) => {
            tracing::info!(
                %exchange_id,
                %kind,
                message_id = %ack.message_id,
                "message accepted by counterparty"
            );
            record_outcome(&exchanges, &exchange_id, stage, None).await;
        }
        Err(retry_error) => {
            let attempts = retry_error.attempts();
            let reason = retry_error.into_inner().to_string();
            tracing::warn!(%exchange_id, %kind, attempts, %reason, "submission failed");
            record_outcome(&exchanges, &exchange_id, stage, Some(reason)).await;
        }
    }
}

/// Applies the single status transition for a finished submission attempt.
async fn record_outcome(
    exchanges: &Arc<dyn ExchangeStore>,
    exchange_id: &ExchangeId,
    stage: Stage,
    failure: Option<String>,
) {
    let mut exchange = match exchanges.find_by_id(exchange_id).await {
        Ok(Some(exchange)) => exchange,
        Ok(None) => {
            tracing::error!(%exchange_id, "exchange missing while recording submission outcome");
            return;
        }
        Err(error) => {
            tracing::error!(
                %exchange_id,
                error = %error,
                "failed to load exchange for submission outcome"
            );
            return;
        }
    };

    let transition = match failure {
        None => exchange.complete_submission(stage),
        Some(reason) => exchange.fail_submission(stage, reason),
    };
    if let Err(error) = transition {
        tracing::error!(
            %exchange_id,
            error = %error,
            "submission outcome rejected by exchange state"
        );
        return;
    }

    if let Err(error) = exchanges.save(&exchange).await {
        tracing::error!(
            %exchange_id,
            error = %error,
            "failed to persist submission outcome"
        );
    }
}
