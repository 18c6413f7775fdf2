//! Error types for the position identifier codec.

use thiserror::Error;

use crate::crdt::types::StoreId;

/// Result type alias using [`IdError`].
pub type Result<T> = std::result::Result<T, IdError>;

/// Errors raised when an identifier cannot be minted, decoded or looked up.
#[derive(Error, Debug)]
pub enum IdError {
    /// A numeric field does not fit its bit budget.
    #[error("{field} {value} exceeds maximum {max}")]
    OutOfRange {
        field: &'static str,
        value: u64,
        max: u64,
    },

    /// A string or code-unit run that was not produced by this codec.
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// Both bounds were supplied but `lower` does not sort before `upper`.
    #[error("Invalid bounds: lower bound must sort strictly before upper bound")]
    InvalidBounds,

    /// The version clock has no 48-bit value left to hand out.
    #[error("Version clock exhausted for store {0}")]
    ClockExhausted(StoreId),

    /// Configuration or replication payload could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A list position past the visible length.
    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// No element carries the requested identifier.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IdError {
    /// Create an invalid identifier error
    pub fn invalid(msg: impl Into<String>) -> Self {
        IdError::InvalidIdentifier(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        IdError::NotFound(msg.into())
    }
}
