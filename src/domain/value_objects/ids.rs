//! # Identity Value Objects
//!
//! Type-safe identity wrappers for domain identifiers.
//!
//! All identifiers in the exchange protocol are opaque strings: exchange and
//! message identifiers are minted as part of message construction, while
//! customer, PFI and offering identifiers are references into external identity
//! and resource systems. Newtype wrappers prevent accidental mixing.
//!
//! - [`ExchangeId`] - Exchange identifier, protocol-scoped
//! - [`MessageId`] - Protocol message identifier
//! - [`CustomerId`] - Customer identity reference
//! - [`PfiId`] - Participating financial institution identity reference
//! - [`OfferingId`] - Offering resource identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Exchange identifier.
///
/// Identifies one exchange across both parties. The value is minted when the
/// opening RFQ message is constructed and is carried on every subsequent
/// message of the exchange; the engine never generates one on its own.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::ids::ExchangeId;
///
/// let id = ExchangeId::new("exchange-7c2f");
/// assert_eq!(id.as_str(), "exchange-7c2f");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeId(String);

impl ExchangeId {
    /// Creates an Exchange ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh Exchange ID. Used only during RFQ message construction.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the exchange ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the ExchangeId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ExchangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExchangeId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ExchangeId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for ExchangeId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Protocol message identifier.
///
/// Minted when a message is constructed, unique within an exchange.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::ids::MessageId;
///
/// let id1 = MessageId::generate();
/// let id2 = MessageId::generate();
/// assert_ne!(id1, id2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    /// Creates a Message ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a fresh Message ID.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the message ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the MessageId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MessageId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MessageId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for MessageId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Customer identity reference.
///
/// Opaque reference resolved to signing credentials by the identity provider.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::ids::CustomerId;
///
/// let customer = CustomerId::new("did:ex:customer-1");
/// assert_eq!(customer.as_str(), "did:ex:customer-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Creates a Customer ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the customer ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the CustomerId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CustomerId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CustomerId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for CustomerId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Participating financial institution identity reference.
///
/// Identifies the counterparty side of an exchange.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::ids::PfiId;
///
/// let pfi = PfiId::new("did:ex:pfi-acme");
/// assert_eq!(pfi.to_string(), "did:ex:pfi-acme");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PfiId(String);

impl PfiId {
    /// Creates a PFI ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the PFI ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the PfiId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PfiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PfiId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PfiId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for PfiId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Offering resource identifier.
///
/// References an offering published by a PFI; an exchange is always opened
/// against exactly one offering.
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::ids::OfferingId;
///
/// let offering = OfferingId::new("offering-usd-kes-01");
/// assert_eq!(offering.as_str(), "offering-usd-kes-01");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferingId(String);

impl OfferingId {
    /// Creates an Offering ID from a string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the offering ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the OfferingId and returns the inner String.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for OfferingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OfferingId {
    #[inline]
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OfferingId {
    #[inline]
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl AsRef<str> for OfferingId {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    mod exchange_id {
        use super::*;

        #[test]
        fn generate_produces_unique_ids() {
            let id1 = ExchangeId::generate();
            let id2 = ExchangeId::generate();
            assert_ne!(id1, id2);
        }

        #[test]
        fn new_from_str() {
            let id = ExchangeId::new("exchange-001");
            assert_eq!(id.as_str(), "exchange-001");
        }

        #[test]
        fn display_formats_correctly() {
            let id = ExchangeId::new("exchange-xyz");
            assert_eq!(id.to_string(), "exchange-xyz");
        }

        #[test]
        fn serde_roundtrip() {
            let id = ExchangeId::generate();
            let json = serde_json::to_string(&id).unwrap();
            let deserialized: ExchangeId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, deserialized);
        }

        #[test]
        fn hash_equality() {
            use std::collections::HashSet;
            let id1 = ExchangeId::new("exchange-abc");
            let id2 = ExchangeId::new("exchange-abc");

            let mut set = HashSet::new();
            set.insert(id1);
            assert!(set.contains(&id2));
        }

        #[test]
        fn into_inner() {
            let id = ExchangeId::new("exchange-x");
            assert_eq!(id.into_inner(), "exchange-x");
        }
    }

    mod message_id {
        use super::*;

        #[test]
        fn generate_produces_unique_ids() {
            let id1 = MessageId::generate();
            let id2 = MessageId::generate();
            assert_ne!(id1, id2);
        }

        #[test]
        fn serde_roundtrip() {
            let id = MessageId::generate();
            let json = serde_json::to_string(&id).unwrap();
            let deserialized: MessageId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, deserialized);
        }
    }

    mod customer_id {
        use super::*;

        #[test]
        fn new_from_str() {
            let customer = CustomerId::new("did:ex:alice");
            assert_eq!(customer.as_str(), "did:ex:alice");
        }

        #[test]
        fn from_str_impl() {
            let customer: CustomerId = "did:ex:bob".into();
            assert_eq!(customer.as_str(), "did:ex:bob");
        }

        #[test]
        fn serde_roundtrip() {
            let customer = CustomerId::new("did:ex:carol");
            let json = serde_json::to_string(&customer).unwrap();
            let deserialized: CustomerId = serde_json::from_str(&json).unwrap();
            assert_eq!(customer, deserialized);
        }
    }

    mod pfi_id {
        use super::*;

        #[test]
        fn new_from_string() {
            let pfi = PfiId::new(String::from("did:ex:pfi-one"));
            assert_eq!(pfi.as_str(), "did:ex:pfi-one");
        }

        #[test]
        fn display_formats_correctly() {
            let pfi = PfiId::new("did:ex:pfi-two");
            assert_eq!(pfi.to_string(), "did:ex:pfi-two");
        }
    }

    mod offering_id {
        use super::*;

        #[test]
        fn new_from_str() {
            let offering = OfferingId::new("offering-1");
            assert_eq!(offering.as_str(), "offering-1");
        }

        #[test]
        fn hash_equality() {
            use std::collections::HashSet;
            let id1 = OfferingId::new("offering-2");
            let id2 = OfferingId::new("offering-2");

            let mut set = HashSet::new();
            set.insert(id1);
            assert!(set.contains(&id2));
        }
    }
}
