//! # Exchange Reconciler
//!
//! Periodic polling loop that closes the gap between local lifecycle state
//! and whatever the counterparty has done since the last look. Exchanges
//! where the counterparty holds the next move (an acknowledged RFQ, Order,
//! or Close) are polled on a fixed interval; each exchange's full message
//! history is fetched and replayed oldest-first.
//!
//! ```text
//! tick -> find_awaiting_counterparty
//!             |
//!             v  fetch_history, bounded by max_concurrent_fetches
//!         per exchange, oldest message first:
//!             Quote        -> adopt once; later sightings standing or stale
//!             Close        -> record reason, EXCHANGE_COMPLETED, stop cycle
//!             OrderStatus  -> record label; "success" completes, cycle goes on
//!             Rfq / Order  -> own echoes, skipped
//! ```
//!
//! A fetch failure affects only its exchange; the rest of the sweep
//! proceeds and the failed exchange is retried on the next tick. Every
//! sweep produces a [`SweepReport`] consumed by logs and tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::application::error::ApplicationResult;
use crate::domain::entities::{Exchange, Quote, QuoteResolution};
use crate::domain::messages::{Message, MessageMetadata, QuoteMessage};
use crate::domain::value_objects::ExchangeStatus;
use crate::infrastructure::gateway::MessageGateway;
use crate::infrastructure::identity::IdentityProvider;
use crate::infrastructure::persistence::{ExchangeStore, QuoteStore};

/// Tuning for the reconciliation loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilerConfig {
    /// Seconds between sweeps.
    pub poll_interval_secs: u64,

    /// Upper bound on concurrent history fetches within one sweep.
    pub max_concurrent_fetches: usize,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 80,
            max_concurrent_fetches: 8,
        }
    }
}

/// Counters from a single reconciliation sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Exchanges in the polled set this sweep.
    pub polled: usize,

    /// Exchanges whose history could not be fetched.
    pub fetch_failures: usize,

    /// Counterparty quotes adopted for the first time.
    pub quotes_adopted: usize,

    /// Exchanges that reached `EXCHANGE_COMPLETED` this sweep.
    pub completed: usize,

    /// Total history messages replayed.
    pub messages_seen: usize,
}

/// How a sighted counterparty quote relates to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteDisposition {
    /// First sighting: persisted and adopted.
    Adopted,

    /// Already on record for a live exchange; nothing to do.
    Standing,

    /// On record but the exchange is already settled or failed.
    Stale,
}

/// Polls counterparties for progress on exchanges awaiting their move.
///
/// Cheap to clone; clones share the running flag and loop handle, so any
/// clone can stop the loop another clone started.
#[derive(Debug, Clone)]
pub struct Reconciler {
    exchanges: Arc<dyn ExchangeStore>,
    quotes: Arc<dyn QuoteStore>,
    gateway: Arc<dyn MessageGateway>,
    identity: Arc<dyn IdentityProvider>,
    config: ReconcilerConfig,
    running: Arc<AtomicBool>,
    handle: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Reconciler {
    /// Creates a reconciler over the given stores, gateway, and identity
    /// source. The loop does not run until [`start`](Self::start).
    #[must_use]
    pub fn new(
        exchanges: Arc<dyn ExchangeStore>,
        quotes: Arc<dyn QuoteStore>,
        gateway: Arc<dyn MessageGateway>,
        identity: Arc<dyn IdentityProvider>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            exchanges,
            quotes,
            gateway,
            identity,
            config,
            running: Arc::new(AtomicBool::new(false)),
            handle: Arc::new(Mutex::new(None)),
        }
    }

    /// Returns whether the polling loop is running.
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Starts the polling loop. A second call while running is a no-op.
    ///
    /// The first sweep runs immediately; subsequent sweeps follow every
    /// `poll_interval_secs`. A sweep is always awaited before the next
    /// tick, so sweeps never overlap.
    pub fn start(&self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }
        let reconciler = self.clone();
        let handle = tokio::spawn(async move {
            let period = Duration::from_secs(reconciler.config.poll_interval_secs.max(1));
            let mut tick = tokio::time::interval(period);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            while reconciler.running.load(Ordering::SeqCst) {
                tick.tick().await;
                if !reconciler.running.load(Ordering::SeqCst) {
                    break;
                }
                let report = reconciler.sweep().await;
                if report.polled > 0 {
                    tracing::debug!(
                        polled = report.polled,
                        fetch_failures = report.fetch_failures,
                        quotes_adopted = report.quotes_adopted,
                        completed = report.completed,
                        messages_seen = report.messages_seen,
                        "reconciliation sweep finished"
                    );
                }
            }
        });
        *self.handle.lock() = Some(handle);
    }

    /// Stops the polling loop. In-flight store writes are individually
    /// consistent, so interrupting a sweep is safe; the next start picks
    /// up where the stores left off.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
        }
    }

    /// Runs one reconciliation sweep and returns its counters.
    pub async fn sweep(&self) -> SweepReport {
        let mut report = SweepReport::default();

        let pending = match self.exchanges.find_awaiting_counterparty().await {
            Ok(pending) => pending,
            Err(error) => {
                tracing::error!(error = %error, "failed to load exchanges awaiting counterparty");
                return report;
            }
        };
        report.polled = pending.len();
        if pending.is_empty() {
            return report;
        }

        let limit = self.config.max_concurrent_fetches.max(1);
        let histories = stream::iter(pending)
            .map(|exchange| async move {
                let history = self.fetch_history(&exchange).await;
                (exchange, history)
            })
            .buffer_unordered(limit)
            .collect::<Vec<_>>()
            .await;

        for (exchange, history) in histories {
            match history {
                Ok(messages) => {
                    report.messages_seen = report.messages_seen.saturating_add(messages.len());
                    self.apply_history(exchange, messages, &mut report).await;
                }
                Err(error) => {
                    report.fetch_failures = report.fetch_failures.saturating_add(1);
                    tracing::warn!(
                        exchange_id = %exchange.id(),
                        error = %error,
                        "history fetch failed, retrying next sweep"
                    );
                }
            }
        }

        report
    }

    /// Fetches one exchange's history, oldest message first.
    async fn fetch_history(&self, exchange: &Exchange) -> ApplicationResult<Vec<Message>> {
        let credentials = self
            .identity
            .resolve_credentials(exchange.customer_id())
            .await?;
        let mut messages = self
            .gateway
            .fetch_history(exchange.pfi_id(), exchange.id(), &credentials)
            .await?;
        messages.sort_by_key(Message::created_at);
        Ok(messages)
    }

    /// Replays one exchange's history against local state.
    async fn apply_history(
        &self,
        mut exchange: Exchange,
        messages: Vec<Message>,
        report: &mut SweepReport,
    ) {
        for message in messages {
            match &message {
                Message::Quote { metadata, data } => {
                    let disposition = self
                        .evaluate_quote(&mut exchange, metadata, data, report)
                        .await;
                    if disposition == QuoteDisposition::Adopted {
                        break;
                    }
                }
                Message::Close { data, .. } => {
                    self.apply_close(&mut exchange, data.reason.clone(), report)
                        .await;
                    break;
                }
                Message::OrderStatus { data, .. } => {
                    self.record_order_status(&exchange, data.status.as_str())
                        .await;
                    if data.is_success() {
                        self.complete_exchange(&mut exchange, report).await;
                    }
                }
                // Our own echoes carry no new information.
                Message::Rfq { .. } | Message::Order { .. } => {}
            }
        }
    }

    /// Decides what a sighted quote means for the exchange.
    ///
    /// The first sighting persists the quote and adopts it on the exchange
    /// as one logical step. Later sightings are standing (live exchange) or
    /// stale (exchange already settled or failed); neither re-adopts.
    async fn evaluate_quote(
        &self,
        exchange: &mut Exchange,
        metadata: &MessageMetadata,
        data: &QuoteMessage,
        report: &mut SweepReport,
    ) -> QuoteDisposition {
        match self.quotes.find_by_exchange(exchange.id()).await {
            Ok(None) => {}
            Ok(Some(_)) => {
                return if exchange.status().is_active() {
                    QuoteDisposition::Standing
                } else {
                    QuoteDisposition::Stale
                };
            }
            Err(error) => {
                tracing::warn!(
                    exchange_id = %exchange.id(),
                    error = %error,
                    "quote lookup failed, skipping message"
                );
                return QuoteDisposition::Standing;
            }
        }

        let quote = match Quote::from_message(metadata, data) {
            Ok(quote) => quote,
            Err(error) => {
                tracing::warn!(
                    exchange_id = %exchange.id(),
                    error = %error,
                    "counterparty quote rejected, skipping message"
                );
                return QuoteDisposition::Standing;
            }
        };
        if let Err(error) = self.quotes.save(&quote).await {
            tracing::warn!(
                exchange_id = %exchange.id(),
                error = %error,
                "failed to persist counterparty quote"
            );
            return QuoteDisposition::Standing;
        }
        if let Err(error) = exchange.adopt_quote() {
            tracing::warn!(
                exchange_id = %exchange.id(),
                error = %error,
                "quote persisted but exchange could not adopt it"
            );
            return QuoteDisposition::Standing;
        }
        if let Err(error) = self.exchanges.save(exchange).await {
            tracing::warn!(
                exchange_id = %exchange.id(),
                error = %error,
                "failed to persist quote adoption"
            );
            return QuoteDisposition::Standing;
        }

        report.quotes_adopted = report.quotes_adopted.saturating_add(1);
        tracing::info!(exchange_id = %exchange.id(), expires_at = %quote.expires_at(), "quote adopted");
        QuoteDisposition::Adopted
    }

    /// Applies a counterparty (or echoed) Close: annotate the quote, then
    /// finish the exchange.
    async fn apply_close(
        &self,
        exchange: &mut Exchange,
        reason: Option<String>,
        report: &mut SweepReport,
    ) {
        match self.quotes.find_by_exchange(exchange.id()).await {
            Ok(Some(mut quote)) => {
                quote.record_close(reason);
                if !quote.is_resolved() {
                    if let Err(error) = quote.mark_resolved(QuoteResolution::Closed) {
                        tracing::warn!(
                            exchange_id = %exchange.id(),
                            error = %error,
                            "could not resolve quote on close"
                        );
                    }
                }
                if let Err(error) = self.quotes.save(&quote).await {
                    tracing::warn!(
                        exchange_id = %exchange.id(),
                        error = %error,
                        "failed to persist close on quote"
                    );
                }
            }
            // Closed before ever quoting; nothing to annotate.
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(
                    exchange_id = %exchange.id(),
                    error = %error,
                    "quote lookup failed while applying close"
                );
            }
        }
        self.complete_exchange(exchange, report).await;
    }

    /// Records the latest counterparty status label on the quote.
    async fn record_order_status(&self, exchange: &Exchange, status: &str) {
        match self.quotes.find_by_exchange(exchange.id()).await {
            Ok(Some(mut quote)) => {
                quote.record_order_status(status);
                if let Err(error) = self.quotes.save(&quote).await {
                    tracing::warn!(
                        exchange_id = %exchange.id(),
                        error = %error,
                        "failed to persist order status"
                    );
                }
            }
            Ok(None) => {
                tracing::warn!(
                    exchange_id = %exchange.id(),
                    status,
                    "order status for exchange with no quote on record"
                );
            }
            Err(error) => {
                tracing::warn!(
                    exchange_id = %exchange.id(),
                    error = %error,
                    "quote lookup failed while recording order status"
                );
            }
        }
    }

    /// Transitions the exchange to `EXCHANGE_COMPLETED` and persists it.
    ///
    /// Nothing to transition or save when the exchange already concluded
    /// earlier in the batch.
    async fn complete_exchange(&self, exchange: &mut Exchange, report: &mut SweepReport) {
        if exchange.status() == ExchangeStatus::Completed {
            return;
        }
        if let Err(error) = exchange.complete() {
            tracing::warn!(
                exchange_id = %exchange.id(),
                error = %error,
                "exchange could not be completed"
            );
            return;
        }
        match self.exchanges.save(exchange).await {
            Ok(()) => {
                report.completed = report.completed.saturating_add(1);
                tracing::info!(exchange_id = %exchange.id(), "exchange completed");
            }
            Err(error) => {
                tracing::warn!(
                    exchange_id = %exchange.id(),
                    error = %error,
                    "failed to persist exchange completion"
                );
            }
        }
    }
}
