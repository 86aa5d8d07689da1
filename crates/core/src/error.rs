//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every failure the aggregator, the status lifecycle and the typed document
/// readers can produce. Transport mapping lives in the API crate.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A line item cannot be priced (negative quantity or price, overflow).
    #[error("invalid line item at index {index}: {reason}")]
    InvalidLineItem { index: usize, reason: String },

    /// A status change outside the allowed transition table.
    #[error("invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found.
    #[error("not found")]
    NotFound,

    /// The actor is not allowed to perform the operation.
    #[error("unauthorized")]
    Unauthorized,

    /// The backing store failed or could not be reached.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// A stored document does not match the expected schema.
    #[error("schema mismatch in '{collection}': {reason}")]
    SchemaMismatch { collection: String, reason: String },
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_line_item(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidLineItem {
            index,
            reason: reason.into(),
        }
    }

    pub fn invalid_transition(from: impl core::fmt::Display, to: impl core::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::UpstreamUnavailable(msg.into())
    }

    pub fn schema_mismatch(collection: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            collection: collection.into(),
            reason: reason.into(),
        }
    }
}
