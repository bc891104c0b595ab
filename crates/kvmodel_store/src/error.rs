//! Error types for store operations.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur when talking to the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named key does not exist.
    ///
    /// Only operations that require an existing source key raise this
    /// (e.g. `rename`); plain reads return an absent value instead.
    #[error("no such key: {key}")]
    NoSuchKey {
        /// The key that was expected to exist.
        key: String,
    },

    /// A hash operation was issued against a plain key, or vice versa.
    #[error("wrong value type for key: {key}")]
    WrongType {
        /// The key holding a value of the unexpected type.
        key: String,
    },

    /// The counter value at a key is not an integer.
    #[error("value at {key} is not an integer")]
    NotAnInteger {
        /// The key holding the non-numeric value.
        key: String,
    },

    /// An I/O error from the transport.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The connection to the store is closed.
    #[error("store connection is closed")]
    Closed,
}

impl StoreError {
    /// Creates a no-such-key error.
    pub fn no_such_key(key: impl Into<String>) -> Self {
        Self::NoSuchKey { key: key.into() }
    }

    /// Creates a wrong-type error.
    pub fn wrong_type(key: impl Into<String>) -> Self {
        Self::WrongType { key: key.into() }
    }
}
