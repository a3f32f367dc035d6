//! # Domain Errors
//!
//! Error types for the domain layer.
//!
//! This module provides [`DomainError`] with numeric error codes and the
//! [`DomainResult`] alias used throughout the domain layer.

pub mod domain_error;

pub use domain_error::DomainError;

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
