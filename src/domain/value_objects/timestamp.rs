//! # Timestamp Value Object
//!
//! DateTime wrapper with domain-specific methods.
//!
//! This module provides the [`Timestamp`] type used for message creation
//! times, quote expiry deadlines and record audit fields.
//!
//! # Examples
//!
//! ```
//! use pfi_exchange::domain::value_objects::timestamp::Timestamp;
//!
//! let now = Timestamp::now();
//! let expiry = now.add_secs(60);
//!
//! assert!(expiry.is_after(&now));
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// A UTC timestamp.
///
/// Wraps `chrono::DateTime<Utc>` with the operations the exchange lifecycle
/// needs: expiry checks against quote deadlines and chronological ordering of
/// protocol messages.
///
/// # Invariants
///
/// - Always in UTC timezone
///
/// # Examples
///
/// ```
/// use pfi_exchange::domain::value_objects::timestamp::Timestamp;
///
/// let quote_expiry = Timestamp::now().add_secs(120);
/// assert!(!quote_expiry.is_expired());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// # Arguments
    ///
    /// * `millis` - Milliseconds since Unix epoch
    ///
    /// # Returns
    ///
    /// `Some(Timestamp)` if the value is valid, `None` otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_millis(1704067200000).unwrap();
    /// assert!(ts.to_iso8601().starts_with("2024-01-01"));
    /// ```
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Creates a timestamp from Unix seconds.
    ///
    /// # Arguments
    ///
    /// * `secs` - Seconds since Unix epoch
    ///
    /// # Returns
    ///
    /// `Some(Timestamp)` if the value is valid, `None` otherwise.
    #[must_use]
    pub fn from_secs(secs: i64) -> Option<Self> {
        Utc.timestamp_opt(secs, 0).single().map(Self)
    }

    /// Adds seconds to the timestamp.
    ///
    /// # Arguments
    ///
    /// * `secs` - Number of seconds to add (can be negative)
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1000).unwrap();
    /// assert_eq!(ts.add_secs(60), Timestamp::from_secs(1060).unwrap());
    /// ```
    #[must_use]
    pub fn add_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Subtracts seconds from the timestamp.
    ///
    /// # Arguments
    ///
    /// * `secs` - Number of seconds to subtract
    #[must_use]
    pub fn sub_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Returns true if this timestamp is in the past.
    ///
    /// Quote expiry is evaluated with this check.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::timestamp::Timestamp;
    ///
    /// let past = Timestamp::from_secs(0).unwrap();
    /// assert!(past.is_expired());
    ///
    /// let future = Timestamp::now().add_secs(3600);
    /// assert!(!future.is_expired());
    /// ```
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.0 < Utc::now()
    }

    /// Returns true if this timestamp is before another.
    ///
    /// # Arguments
    ///
    /// * `other` - The timestamp to compare against
    #[inline]
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.0 < other.0
    }

    /// Returns true if this timestamp is after another.
    ///
    /// # Arguments
    ///
    /// * `other` - The timestamp to compare against
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Formats the timestamp as ISO 8601.
    ///
    /// # Examples
    ///
    /// ```
    /// use pfi_exchange::domain::value_objects::timestamp::Timestamp;
    ///
    /// let ts = Timestamp::from_secs(1704067200).unwrap();
    /// let iso = ts.to_iso8601();
    /// assert!(iso.contains("2024-01-01"));
    /// ```
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl From<Timestamp> for DateTime<Utc> {
    fn from(ts: Timestamp) -> Self {
        ts.0
    }
}

impl Add<std::time::Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 + Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

impl Sub<std::time::Duration> for Timestamp {
    type Output = Self;

    fn sub(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 - Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

impl Sub<Timestamp> for Timestamp {
    type Output = std::time::Duration;

    fn sub(self, rhs: Timestamp) -> Self::Output {
        (self.0 - rhs.0)
            .to_std()
            .unwrap_or(std::time::Duration::ZERO)
    }
}
