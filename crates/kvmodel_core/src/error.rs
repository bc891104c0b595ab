//! Error types for kvmodel core.

use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in kvmodel core operations.
///
/// Store failures propagate unchanged; there is no local retry or
/// backoff. Consistency faults on the derived index (rename or delete
/// of a key that no longer exists) are logged and recovered from, not
/// surfaced here - the hash record is the source of truth.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Store client error.
    #[error("store error: {0}")]
    Store(#[from] kvmodel_store::StoreError),

    /// Entity not found.
    ///
    /// Raised only by the or-fail read variant and by mutations of a
    /// missing record; plain reads return an absent result instead.
    #[error("{kind} {id} not found in database")]
    NotFound {
        /// The entity kind searched.
        kind: String,
        /// The id that was not found.
        id: u64,
    },

    /// Malformed caller input.
    #[error("invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem.
        message: String,
    },

    /// Schema misconfiguration, surfaced when the schema is built.
    #[error("schema contract violation: {message}")]
    Contract {
        /// Description of the violation.
        message: String,
    },

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl CoreError {
    /// Creates a not-found error.
    pub fn not_found(kind: impl Into<String>, id: u64) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id,
        }
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a schema contract error.
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract {
            message: message.into(),
        }
    }
}
