//! Errors raised by catalog, cart and checkout rules.

use thiserror::Error;

pub type DomainResult<T> = Result<T, DomainError>;

/// A storefront rule was broken.
///
/// Only deterministic failures live here; decoding and file access errors are
/// wrapped by the callers that perform them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Bad input: blank name, zero quantity, unknown promo code.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The command is not allowed in the current state.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Duplicate product id or slug, promo already applied, variant mismatch.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
