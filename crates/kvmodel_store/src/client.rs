//! Store client trait definition.

use crate::error::StoreResult;

/// One step of a cursor-based keyspace scan.
///
/// A scan is complete when `cursor` is 0 on return. Batches are bounded
/// but may be empty even when the scan is not yet complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanPage {
    /// Cursor to pass to the next `scan` call; 0 means the scan is done.
    pub cursor: u64,
    /// Keys matching the pattern in this batch.
    pub keys: Vec<String>,
}

/// A remote key-value store as seen by the entity layer.
///
/// Implementations map these operations onto whatever wire protocol the
/// actual store speaks. All values are strings at this boundary.
///
/// # Invariants
///
/// - `hash_get` returns one slot per requested field, in request order;
///   a missing field (or a missing hash) yields `None` in its slot
/// - `rename` requires the source key to exist and overwrites the
///   destination
/// - `incr` is atomic: concurrent callers never observe the same value
/// - `scan` visits every key that exists for the whole duration of the
///   scan at least once; keys created or deleted mid-scan may be missed
///   or returned twice (no snapshot isolation)
///
/// There are no multi-key transactions. Sequences of calls are exactly
/// as atomic as the individual calls.
///
/// # Implementors
///
/// - [`super::InMemoryStore`] - for testing and ephemeral data
pub trait StoreClient: Send + Sync {
    /// Reads multiple fields from the hash at `key`.
    ///
    /// Returns one `Option<String>` per requested field, in request
    /// order. Absent fields and absent hashes both read as `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-hash value or the
    /// transport fails.
    fn hash_get(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>>;

    /// Writes multiple fields into the hash at `key`.
    ///
    /// Creates the hash if it does not exist. Only the listed fields are
    /// touched; other fields keep their values.
    ///
    /// # Errors
    ///
    /// Returns an error if `key` holds a non-hash value or the
    /// transport fails.
    fn hash_set(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<()>;

    /// Reads the plain string value at `key`, if any.
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Sets the plain string value at `key`, overwriting any previous
    /// value (of any type).
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes `key` of any type.
    ///
    /// Returns `true` if the key existed.
    fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Renames `src` to `dst`, overwriting `dst` if present.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoSuchKey`](crate::StoreError::NoSuchKey)
    /// if `src` does not exist.
    fn rename(&self, src: &str, dst: &str) -> StoreResult<()>;

    /// Atomically increments the integer at `key` by one and returns
    /// the new value.
    ///
    /// A missing key counts as 0, so the first increment returns 1.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing value is not an integer.
    fn incr(&self, key: &str) -> StoreResult<u64>;

    /// Performs one step of a cursor-based scan for keys matching the
    /// glob `pattern`.
    ///
    /// `count` is a hint for how many keys to examine in this step, not
    /// a bound on the result size or a correctness parameter. Start
    /// with cursor 0 and repeat with the returned cursor until it is 0
    /// again.
    fn scan(&self, cursor: u64, pattern: &str, count: usize) -> StoreResult<ScanPage>;
}
