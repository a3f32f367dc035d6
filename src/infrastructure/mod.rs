//! # Infrastructure Layer
//!
//! External adapters behind the domain's ports.
//!
//! ## Gateway
//!
//! Transport to PFI counterparties: message submission, history
//! fetching, and offering lookup over HTTP.
//!
//! ## Identity
//!
//! Credential resolution and detached signing for outbound messages.
//!
//! ## Persistence
//!
//! Exchange and quote stores. In-memory implementations ship with the
//! crate; the traits leave room for durable backends.

pub mod gateway;
pub mod identity;
pub mod persistence;
