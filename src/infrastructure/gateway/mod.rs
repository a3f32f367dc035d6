//! # Message Gateway
//!
//! Transport to PFI counterparties: submitting signed protocol
//! messages, fetching exchange histories, and resolving offerings.
//!
//! The [`MessageGateway`] and [`OfferingLookup`] traits are the ports;
//! [`HttpMessageGateway`] is the production transport over the PFI's
//! HTTP API, and [`StaticOfferingLookup`] serves fixed catalogs in
//! tests and configuration-driven deployments.

pub mod error;
pub mod http;
pub mod offerings;
pub mod traits;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpMessageGateway;
pub use offerings::{
    Offering, OfferingError, OfferingLookup, OfferingResult, StaticOfferingLookup,
};
pub use traits::{MessageGateway, SubmissionAck};
