//! # Application Services
//!
//! Services that orchestrate domain logic and infrastructure.
//!
//! - [`LifecycleEngine`]: customer-initiated exchange operations (open with
//!   an RFQ, answer a quote with an Order or a Close)
//! - [`Reconciler`]: periodic counterparty polling and history replay
//! - [`SubmissionPool`]: per-exchange ordered background submission
//! - [`RetryPolicy`]: backoff with jitter for transient gateway failures

pub mod lifecycle;
pub mod reconciler;
pub mod retry;
pub mod submission;

pub use lifecycle::LifecycleEngine;
pub use reconciler::{Reconciler, ReconcilerConfig, SweepReport};
pub use retry::{execute_with_retry, RetryError, RetryPolicy, Retryable};
pub use submission::SubmissionPool;
