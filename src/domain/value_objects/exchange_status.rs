//! # Exchange Status
//!
//! Exchange lifecycle state machine.
//!
//! This module provides the [`ExchangeStatus`] sum type: a lifecycle stage
//! ([`Stage`]) paired with the outcome of that stage's local submission
//! ([`StageOutcome`]), plus the terminal [`Completed`](ExchangeStatus::Completed)
//! state. Thirteen states are representable and no illegal stage/outcome
//! combination can be constructed.
//!
//! # State Machine
//!
//! ```text
//! RFQ_CREATION_PENDING ──► RFQ_CREATION_COMPLETED ──► QUOTE_CREATION_COMPLETED
//!          │                       │      (quote adopted)     │
//!          ▼                       ▼                ┌─────────┴─────────┐
//! RFQ_CREATION_FAILED     EXCHANGE_COMPLETED        ▼                   ▼
//!                         (close observed)   ORDER_CREATION      CLOSE_CREATION
//!                                             _PENDING            _PENDING
//!                                                │                   │
//!                                                ▼                   ▼
//!                                             _COMPLETED ──────► EXCHANGE_COMPLETED
//!                                             _FAILED (terminal)
//! ```
//!
//! Every `*_CREATION_PENDING` state resolves to the matching `_COMPLETED` or
//! `_FAILED` state of the same stage; a `*_FAILED` state is terminal for that
//! stage and is never retried automatically.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, StageOutcome};
//!
//! let status = ExchangeStatus::Rfq(StageOutcome::Pending);
//! assert!(status.can_transition_to(ExchangeStatus::Rfq(StageOutcome::Completed)));
//! assert!(!status.can_transition_to(ExchangeStatus::Completed));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle stage of an exchange.
///
/// Each stage corresponds to one locally-submitted or remotely-received
/// protocol message kind on the critical path of the negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    /// Opening request-for-quote submission.
    Rfq,

    /// Counterparty quote reception.
    Quote,

    /// Order submission against an adopted quote.
    Order,

    /// Close submission abandoning the exchange.
    Close,
}

impl Stage {
    /// Returns the canonical upper-case name of the stage.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rfq => "RFQ",
            Self::Quote => "QUOTE",
            Self::Order => "ORDER",
            Self::Close => "CLOSE",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of a stage's local submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageOutcome {
    /// Submission dispatched, result not yet known.
    Pending,

    /// Submission failed after retries or was rejected (terminal for the stage).
    Failed,

    /// Submission acknowledged, or the remote side delivered the stage's message.
    Completed,
}

impl StageOutcome {
    /// Returns the canonical upper-case name of the outcome.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Failed => "FAILED",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Exchange lifecycle status.
///
/// A stage/outcome pair, or the terminal [`Completed`](Self::Completed) state
/// reached when the counterparty confirms settlement or closes the exchange.
/// Transitions are monotonic along the lifecycle graph and enforced via
/// [`can_transition_to`](Self::can_transition_to); nothing ever reverts to an
/// earlier stage.
///
/// Serializes as the canonical status name
/// (`RFQ_CREATION_PENDING` .. `EXCHANGE_COMPLETED`), see [`fmt::Display`] and
/// [`FromStr`].
///
/// # Terminal States
///
/// - Any `*_CREATION_FAILED` state (terminal for its stage, no automatic retry)
/// - [`Completed`](Self::Completed) (`EXCHANGE_COMPLETED`)
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, StageOutcome};
///
/// let status = ExchangeStatus::Order(StageOutcome::Completed);
/// assert!(!status.is_terminal());
/// assert!(status.is_awaiting_counterparty());
/// assert_eq!(status.to_string(), "ORDER_CREATION_COMPLETED");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeStatus {
    /// RFQ stage with the given local submission outcome.
    Rfq(StageOutcome),

    /// Quote stage; completed when a counterparty quote is adopted.
    Quote(StageOutcome),

    /// Order stage with the given local submission outcome.
    Order(StageOutcome),

    /// Close stage with the given local submission outcome.
    Close(StageOutcome),

    /// The exchange has settled or been closed by the counterparty (terminal).
    Completed,
}

impl ExchangeStatus {
    /// Builds a status from a stage and outcome pair.
    #[inline]
    #[must_use]
    pub const fn new(stage: Stage, outcome: StageOutcome) -> Self {
        match stage {
            Stage::Rfq => Self::Rfq(outcome),
            Stage::Quote => Self::Quote(outcome),
            Stage::Order => Self::Order(outcome),
            Stage::Close => Self::Close(outcome),
        }
    }

    /// Returns the lifecycle stage, or `None` for `EXCHANGE_COMPLETED`.
    #[inline]
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Rfq(_) => Some(Stage::Rfq),
            Self::Quote(_) => Some(Stage::Quote),
            Self::Order(_) => Some(Stage::Order),
            Self::Close(_) => Some(Stage::Close),
            Self::Completed => None,
        }
    }

    /// Returns the stage outcome, or `None` for `EXCHANGE_COMPLETED`.
    #[inline]
    #[must_use]
    pub const fn outcome(&self) -> Option<StageOutcome> {
        match self {
            Self::Rfq(o) | Self::Quote(o) | Self::Order(o) | Self::Close(o) => Some(*o),
            Self::Completed => None,
        }
    }

    /// Returns true if this is a terminal state.
    ///
    /// Terminal states cannot transition to any other state.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, StageOutcome};
    ///
    /// assert!(ExchangeStatus::Completed.is_terminal());
    /// assert!(ExchangeStatus::Rfq(StageOutcome::Failed).is_terminal());
    /// assert!(!ExchangeStatus::Rfq(StageOutcome::Pending).is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed
                | Self::Rfq(StageOutcome::Failed)
                | Self::Quote(StageOutcome::Failed)
                | Self::Order(StageOutcome::Failed)
                | Self::Close(StageOutcome::Failed)
        )
    }

    /// Returns true if this is an active (non-terminal) state.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Returns true if a local submission for this status's stage is in flight.
    #[inline]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(
            self,
            Self::Rfq(StageOutcome::Pending)
                | Self::Quote(StageOutcome::Pending)
                | Self::Order(StageOutcome::Pending)
                | Self::Close(StageOutcome::Pending)
        )
    }

    /// Returns true if the exchange is waiting on counterparty messages.
    ///
    /// This is the set the reconciliation sweep polls: a local submission has
    /// completed and the next move belongs to the remote side. Pending states
    /// are excluded because their outcome is not known yet, and terminal
    /// states need no further polling.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, StageOutcome};
    ///
    /// assert!(ExchangeStatus::Rfq(StageOutcome::Completed).is_awaiting_counterparty());
    /// assert!(!ExchangeStatus::Quote(StageOutcome::Completed).is_awaiting_counterparty());
    /// assert!(!ExchangeStatus::Completed.is_awaiting_counterparty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_awaiting_counterparty(&self) -> bool {
        matches!(
            self,
            Self::Rfq(StageOutcome::Completed)
                | Self::Order(StageOutcome::Completed)
                | Self::Close(StageOutcome::Completed)
        )
    }

    /// Returns true if a counterparty quote has been received and recorded.
    ///
    /// True from `QUOTE_CREATION_COMPLETED` onwards.
    #[inline]
    #[must_use]
    pub const fn quote_received(&self) -> bool {
        matches!(
            self,
            Self::Quote(StageOutcome::Completed) | Self::Order(_) | Self::Close(_) | Self::Completed
        )
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// Enforces the lifecycle graph:
    /// - `RFQ_CREATION_PENDING` → `RFQ_CREATION_{COMPLETED,FAILED}`
    /// - `RFQ_CREATION_COMPLETED` → `QUOTE_CREATION_COMPLETED`, `EXCHANGE_COMPLETED`
    /// - `QUOTE_CREATION_PENDING` → `QUOTE_CREATION_{COMPLETED,FAILED}`
    /// - `QUOTE_CREATION_COMPLETED` → `{ORDER,CLOSE}_CREATION_PENDING`
    /// - `ORDER_CREATION_PENDING` → `ORDER_CREATION_{COMPLETED,FAILED}`
    /// - `ORDER_CREATION_COMPLETED` → `EXCHANGE_COMPLETED`
    /// - `CLOSE_CREATION_PENDING` → `CLOSE_CREATION_{COMPLETED,FAILED}`
    /// - `CLOSE_CREATION_COMPLETED` → `EXCHANGE_COMPLETED`
    /// - terminal states → (none)
    ///
    /// # Arguments
    ///
    /// * `target` - The target state to transition to
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, StageOutcome};
    ///
    /// let settled = ExchangeStatus::Quote(StageOutcome::Completed);
    /// assert!(settled.can_transition_to(ExchangeStatus::Order(StageOutcome::Pending)));
    /// assert!(settled.can_transition_to(ExchangeStatus::Close(StageOutcome::Pending)));
    /// assert!(!settled.can_transition_to(ExchangeStatus::Rfq(StageOutcome::Pending)));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            // From RFQ_CREATION_PENDING
            (
                Self::Rfq(StageOutcome::Pending),
                Self::Rfq(StageOutcome::Completed) | Self::Rfq(StageOutcome::Failed),
            )
                // From RFQ_CREATION_COMPLETED: quote adopted, or a close was
                // observed while waiting for one
                | (
                    Self::Rfq(StageOutcome::Completed),
                    Self::Quote(StageOutcome::Completed) | Self::Completed,
                )
                // From QUOTE_CREATION_PENDING (representable; quote creation
                // happens on the counterparty side, so never produced locally)
                | (
                    Self::Quote(StageOutcome::Pending),
                    Self::Quote(StageOutcome::Completed) | Self::Quote(StageOutcome::Failed),
                )
                // From QUOTE_CREATION_COMPLETED: the caller decides
                | (
                    Self::Quote(StageOutcome::Completed),
                    Self::Order(StageOutcome::Pending) | Self::Close(StageOutcome::Pending),
                )
                // From ORDER_CREATION_PENDING
                | (
                    Self::Order(StageOutcome::Pending),
                    Self::Order(StageOutcome::Completed) | Self::Order(StageOutcome::Failed),
                )
                // From ORDER_CREATION_COMPLETED: success status or close observed
                | (Self::Order(StageOutcome::Completed), Self::Completed)
                // From CLOSE_CREATION_PENDING
                | (
                    Self::Close(StageOutcome::Pending),
                    Self::Close(StageOutcome::Completed) | Self::Close(StageOutcome::Failed),
                )
                // From CLOSE_CREATION_COMPLETED: close confirmed by the remote history
                | (Self::Close(StageOutcome::Completed), Self::Completed)
        )
    }

    /// Returns the valid next states from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::exchange_status::{ExchangeStatus, StageOutcome};
    ///
    /// let next = ExchangeStatus::Rfq(StageOutcome::Completed).valid_transitions();
    /// assert!(next.contains(&ExchangeStatus::Quote(StageOutcome::Completed)));
    /// assert!(next.contains(&ExchangeStatus::Completed));
    /// ```
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        Self::all()
            .into_iter()
            .filter(|target| self.can_transition_to(*target))
            .collect()
    }

    /// Returns every representable status, pending states first within each
    /// stage, in lifecycle order.
    #[must_use]
    pub fn all() -> [Self; 13] {
        [
            Self::Rfq(StageOutcome::Pending),
            Self::Rfq(StageOutcome::Failed),
            Self::Rfq(StageOutcome::Completed),
            Self::Quote(StageOutcome::Pending),
            Self::Quote(StageOutcome::Failed),
            Self::Quote(StageOutcome::Completed),
            Self::Order(StageOutcome::Pending),
            Self::Order(StageOutcome::Failed),
            Self::Order(StageOutcome::Completed),
            Self::Close(StageOutcome::Pending),
            Self::Close(StageOutcome::Failed),
            Self::Close(StageOutcome::Completed),
            Self::Completed,
        ]
    }
}

impl Default for ExchangeStatus {
    /// The opening status of a freshly created exchange.
    fn default() -> Self {
        Self::Rfq(StageOutcome::Pending)
    }
}

impl fmt::Display for ExchangeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rfq(o) => write!(f, "RFQ_CREATION_{}", o.as_str()),
            Self::Quote(o) => write!(f, "QUOTE_CREATION_{}", o.as_str()),
            Self::Order(o) => write!(f, "ORDER_CREATION_{}", o.as_str()),
            Self::Close(o) => write!(f, "CLOSE_CREATION_{}", o.as_str()),
            Self::Completed => write!(f, "EXCHANGE_COMPLETED"),
        }
    }
}

impl FromStr for ExchangeStatus {
    type Err = ParseExchangeStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "RFQ_CREATION_PENDING" => Self::Rfq(StageOutcome::Pending),
            "RFQ_CREATION_FAILED" => Self::Rfq(StageOutcome::Failed),
            "RFQ_CREATION_COMPLETED" => Self::Rfq(StageOutcome::Completed),
            "QUOTE_CREATION_PENDING" => Self::Quote(StageOutcome::Pending),
            "QUOTE_CREATION_FAILED" => Self::Quote(StageOutcome::Failed),
            "QUOTE_CREATION_COMPLETED" => Self::Quote(StageOutcome::Completed),
            "ORDER_CREATION_PENDING" => Self::Order(StageOutcome::Pending),
            "ORDER_CREATION_FAILED" => Self::Order(StageOutcome::Failed),
            "ORDER_CREATION_COMPLETED" => Self::Order(StageOutcome::Completed),
            "CLOSE_CREATION_PENDING" => Self::Close(StageOutcome::Pending),
            "CLOSE_CREATION_FAILED" => Self::Close(StageOutcome::Failed),
            "CLOSE_CREATION_COMPLETED" => Self::Close(StageOutcome::Completed),
            "EXCHANGE_COMPLETED" => Self::Completed,
            other => return Err(ParseExchangeStatusError(other.to_owned())),
        };
        Ok(status)
    }
}

impl Serialize for ExchangeStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ExchangeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error returned when parsing an unrecognized exchange status name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseExchangeStatusError(pub String);

impl fmt::Display for ParseExchangeStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized exchange status: {}", self.0)
    }
}

impl std::error::Error for ParseExchangeStatusError {}
