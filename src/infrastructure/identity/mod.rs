//! # Identity and Message Signing
//!
//! Credential resolution and detached signing for outbound protocol
//! messages. Every message a wallet submits is signed with the
//! customer's own key material, so the submission path resolves
//! credentials per customer rather than holding a single service key.
//!
//! ```text
//! CustomerId --> IdentityProvider --> SigningCredentials
//!                                          |
//!                         Message ---------+--> SignedMessage
//! ```
//!
//! Credentials are resolved again right before each submission.
//! Credentials that disappear between opening an exchange and signing
//! its next message surface as [`IdentityError::NotFound`] at signing
//! time.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use pfi_exchange::domain::messages::Message;
//! use pfi_exchange::domain::value_objects::{
//!     CustomerId, OfferingId, PaymentSelections, PfiId,
//! };
//! use pfi_exchange::infrastructure::identity::{HmacSigner, SigningCredentials};
//! use rust_decimal::Decimal;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let credentials = SigningCredentials::new(
//!     "did:key:alice",
//!     "did:key:alice#key-1",
//!     Arc::new(HmacSigner::new(b"demo-secret")),
//! );
//!
//! let selections = PaymentSelections::new(Decimal::new(100, 0), "BANK_TRANSFER", "WALLET")?;
//! let message = Message::rfq(
//!     &CustomerId::from("did:key:alice"),
//!     &PfiId::from("did:key:pfi"),
//!     OfferingId::from("offering_usd_mxn"),
//!     &selections,
//! );
//!
//! let signed = credentials.sign(&message)?;
//! assert_eq!(signed.key_id, "did:key:alice#key-1");
//! # Ok(())
//! # }
//! ```

pub mod credentials;
pub mod error;
pub mod provider;
pub mod signer;

pub use credentials::SigningCredentials;
pub use error::{IdentityError, IdentityResult};
pub use provider::{IdentityProvider, StaticIdentityProvider};
pub use signer::{HmacSigner, MessageSigner};
