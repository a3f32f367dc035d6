//! # Application Layer
//!
//! Orchestrates domain objects and infrastructure into the operations a
//! wallet exposes: opening exchanges, deciding on quotes, and keeping local
//! state reconciled with the counterparty.
//!
//! ## Services
//!
//! - [`LifecycleEngine`]: create an exchange, report quote arrival, resolve
//!   a quote with an Order or a Close
//! - [`Reconciler`]: background polling of exchanges awaiting the
//!   counterparty's move
//! - [`SubmissionPool`]: ordered, per-exchange submission lanes
//!
//! Errors from every layer surface here as [`ApplicationError`].

pub mod error;
pub mod services;

pub use error::{ApplicationError, ApplicationResult};
pub use services::{
    execute_with_retry, LifecycleEngine, Reconciler, ReconcilerConfig, RetryError, RetryPolicy,
    Retryable, SubmissionPool, SweepReport,
};
