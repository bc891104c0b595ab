//! Index key codec.
//!
//! Derives every key the system writes or scans for, as a pure function
//! of schema and field values. Encoding is stable across process
//! restarts: no randomness, no locale dependence.
//!
//! Key layout on the wire:
//!
//! ```text
//! {kind}:{id}                          hash record
//! {kind}:{id}:{encoded index values}   index entry (value = id)
//! {kind}s                              per-kind id counter
//! ```

use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;
use std::collections::BTreeMap;

/// Wildcard handling when building a search pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wildcard {
    /// Literal `*` characters in supplied values pass through to the
    /// pattern (wildcard search).
    Allow,
    /// Literal `*` characters are stripped from supplied values before
    /// encoding (exact search).
    Strip,
}

/// Encodes one indexed field value into its index-key component.
///
/// Lower-cases the value and replaces spaces with `+`. Absent values
/// encode as the empty string.
#[must_use]
pub fn encode_component(value: &str) -> String {
    value.to_lowercase().replace(' ', "+")
}

/// Returns the hash-record key for an entity: `{kind}:{id}`.
#[must_use]
pub fn hash_key(kind: &str, id: u64) -> String {
    format!("{kind}:{id}")
}

/// Returns the id-counter key for a kind: `{kind}s`.
#[must_use]
pub fn counter_key(kind: &str) -> String {
    format!("{kind}s")
}

/// Builds the canonical index key for an entity.
///
/// For each indexed field in declared order, the current value (empty
/// when absent) is encoded and the components are joined with `_`,
/// prefixed with `{kind}:{id}:`.
#[must_use]
pub fn index_key(schema: &Schema, id: u64, values: &BTreeMap<String, Option<String>>) -> String {
    let encoded: Vec<String> = schema
        .indexed_fields()
        .iter()
        .map(|field| {
            values
                .get(field)
                .and_then(|v| v.as_deref())
                .map(encode_component)
                .unwrap_or_default()
        })
        .collect();

    format!("{}:{}", hash_key(schema.kind(), id), encoded.join("_"))
}

/// Builds a scan pattern matching index keys for the given criteria.
///
/// Indexed fields absent from `criteria` become the wildcard token `*`;
/// supplied fields are encoded like index-key components. Whether
/// literal `*` characters in supplied values survive depends on
/// `wildcard`, which is what distinguishes exact from wildcard search.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] when a criteria field is not
/// an indexed field of the schema.
pub fn search_pattern(
    schema: &Schema,
    criteria: &BTreeMap<String, String>,
    wildcard: Wildcard,
) -> CoreResult<String> {
    for field in criteria.keys() {
        if !schema.is_indexed(field) {
            return Err(CoreError::invalid_argument(format!(
                "field '{field}' is not indexed on kind '{}'",
                schema.kind()
            )));
        }
    }

    let tokens: Vec<String> = schema
        .indexed_fields()
        .iter()
        .map(|field| match criteria.get(field) {
            Some(value) => {
                let value = match wildcard {
                    Wildcard::Allow => value.clone(),
                    Wildcard::Strip => value.replace('*', ""),
                };
                encode_component(&value)
            }
            None => "*".to_string(),
        })
        .collect();

    Ok(format!("{}:*{}", schema.kind(), tokens.join("_")))
}

/// Parses the entity id out of an index key (`{kind}:{id}:{values}`).
///
/// Returns `None` when the key does not have the expected shape. This
/// avoids the extra round trip of reading the index entry's value.
#[must_use]
pub fn id_from_index_key(key: &str) -> Option<u64> {
    let mut parts = key.splitn(3, ':');
    let _kind = parts.next()?;
    let id = parts.next()?;
    parts.next()?;
    id.parse().ok()
}
