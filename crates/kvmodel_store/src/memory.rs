//! In-memory store client for testing.

use crate::client::{ScanPage, StoreClient};
use crate::error::{StoreError, StoreResult};
use crate::pattern::glob_match;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// A value held by the in-memory store.
#[derive(Debug, Clone)]
enum Value {
    /// A plain string value (index entries, counters).
    Str(String),
    /// A field map (entity hash records).
    Hash(BTreeMap<String, String>),
}

/// An in-memory store client.
///
/// Holds all keys in process memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral data that does not need a real store
///
/// # Thread Safety
///
/// The store is thread-safe and can be shared across threads. Individual
/// operations are atomic; sequences of operations are not.
///
/// # Scan Semantics
///
/// The scan cursor is a position into the key set in sorted order. Each
/// step examines up to `count` keys and returns the matching subset.
/// Like a real store, there is no snapshot isolation: keys inserted or
/// removed between steps may be missed or returned twice.
///
/// # Example
///
/// ```rust
/// use kvmodel_store::{InMemoryStore, StoreClient};
///
/// let store = InMemoryStore::new();
/// store.hash_set("user:1", &[("name".into(), "Kenyon".into())]).unwrap();
/// let values = store.hash_get("user:1", &["name".to_string()]).unwrap();
/// assert_eq!(values[0].as_deref(), Some("Kenyon"));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: RwLock<BTreeMap<String, Value>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all keys currently in the store, in sorted order.
    ///
    /// Useful for tests and debugging.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.data.read().keys().cloned().collect()
    }

    /// Returns the number of keys in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Returns `true` if the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }

    /// Removes all keys from the store.
    pub fn clear(&self) {
        self.data.write().clear();
    }
}

impl StoreClient for InMemoryStore {
    fn hash_get(&self, key: &str, fields: &[String]) -> StoreResult<Vec<Option<String>>> {
        let data = self.data.read();
        match data.get(key) {
            None => Ok(vec![None; fields.len()]),
            Some(Value::Hash(map)) => Ok(fields.iter().map(|f| map.get(f).cloned()).collect()),
            Some(Value::Str(_)) => Err(StoreError::wrong_type(key)),
        }
    }

    fn hash_set(&self, key: &str, pairs: &[(String, String)]) -> StoreResult<()> {
        let mut data = self.data.write();
        let entry = data
            .entry(key.to_string())
            .or_insert_with(|| Value::Hash(BTreeMap::new()));
        match entry {
            Value::Hash(map) => {
                for (field, value) in pairs {
                    map.insert(field.clone(), value.clone());
                }
                Ok(())
            }
            Value::Str(_) => Err(StoreError::wrong_type(key)),
        }
    }

    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let data = self.data.read();
        match data.get(key) {
            None => Ok(None),
            Some(Value::Str(value)) => Ok(Some(value.clone())),
            Some(Value::Hash(_)) => Err(StoreError::wrong_type(key)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.data
            .write()
            .insert(key.to_string(), Value::Str(value.to_string()));
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<bool> {
        Ok(self.data.write().remove(key).is_some())
    }

    fn rename(&self, src: &str, dst: &str) -> StoreResult<()> {
        let mut data = self.data.write();
        match data.remove(src) {
            Some(value) => {
                data.insert(dst.to_string(), value);
                Ok(())
            }
            None => Err(StoreError::no_such_key(src)),
        }
    }

    fn incr(&self, key: &str) -> StoreResult<u64> {
        let mut data = self.data.write();
        let current = match data.get(key) {
            None => 0,
            Some(Value::Str(value)) => value
                .parse::<u64>()
                .map_err(|_| StoreError::NotAnInteger { key: key.to_string() })?,
            Some(Value::Hash(_)) => return Err(StoreError::wrong_type(key)),
        };
        let next = current + 1;
        data.insert(key.to_string(), Value::Str(next.to_string()));
        Ok(next)
    }

    fn scan(&self, cursor: u64, pattern: &str, count: usize) -> StoreResult<ScanPage> {
        let data = self.data.read();
        let count = count.max(1);
        let offset = cursor as usize;

        let keys: Vec<String> = data
            .keys()
            .skip(offset)
            .take(count)
            .filter(|k| glob_match(pattern, k))
            .cloned()
            .collect();

        let examined = data.keys().skip(offset).take(count).count();
        let next = offset + examined;
        let cursor = if next >= data.len() { 0 } else { next as u64 };

        Ok(ScanPage { cursor, keys })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_roundtrip() {
        let store = InMemoryStore::new();
        store
            .hash_set(
                "user:1",
                &[
                    ("id".into(), "1".into()),
                    ("name".into(), "Kenyon Haliwell".into()),
                ],
            )
            .unwrap();

        let values = store
            .hash_get("user:1", &["id".to_string(), "name".to_string(), "email".to_string()])
            .unwrap();
        assert_eq!(values[0].as_deref(), Some("1"));
        assert_eq!(values[1].as_deref(), Some("Kenyon Haliwell"));
        assert_eq!(values[2], None);
    }

    #[test]
    fn hash_get_missing_hash_is_all_none() {
        let store = InMemoryStore::new();
        let values = store
            .hash_get("user:99", &["id".to_string(), "name".to_string()])
            .unwrap();
        assert_eq!(values, vec![None, None]);
    }

    #[test]
    fn hash_set_preserves_unlisted_fields() {
        let store = InMemoryStore::new();
        store
            .hash_set("user:1", &[("a".into(), "1".into()), ("b".into(), "2".into())])
            .unwrap();
        store.hash_set("user:1", &[("a".into(), "9".into())]).unwrap();

        let values = store
            .hash_get("user:1", &["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(values[0].as_deref(), Some("9"));
        assert_eq!(values[1].as_deref(), Some("2"));
    }

    #[test]
    fn wrong_type_errors() {
        let store = InMemoryStore::new();
        store.set("counter", "5").unwrap();
        assert!(matches!(
            store.hash_get("counter", &["x".to_string()]),
            Err(StoreError::WrongType { .. })
        ));

        store.hash_set("user:1", &[("a".into(), "1".into())]).unwrap();
        assert!(matches!(store.get("user:1"), Err(StoreError::WrongType { .. })));
    }

    #[test]
    fn get_set_delete() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(store.delete("k").unwrap());
        assert!(!store.delete("k").unwrap());
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn rename_moves_value() {
        let store = InMemoryStore::new();
        store.set("old", "1").unwrap();
        store.rename("old", "new").unwrap();
        assert_eq!(store.get("old").unwrap(), None);
        assert_eq!(store.get("new").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn rename_missing_source_fails() {
        let store = InMemoryStore::new();
        let result = store.rename("missing", "dst");
        assert!(matches!(result, Err(StoreError::NoSuchKey { .. })));
    }

    #[test]
    fn rename_overwrites_destination() {
        let store = InMemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.rename("a", "b").unwrap();
        assert_eq!(store.get("b").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn incr_from_missing_starts_at_one() {
        let store = InMemoryStore::new();
        assert_eq!(store.incr("users").unwrap(), 1);
        assert_eq!(store.incr("users").unwrap(), 2);
        assert_eq!(store.incr("users").unwrap(), 3);
        assert_eq!(store.get("users").unwrap().as_deref(), Some("3"));
    }

    #[test]
    fn incr_non_integer_fails() {
        let store = InMemoryStore::new();
        store.set("users", "not-a-number").unwrap();
        assert!(matches!(
            store.incr("users"),
            Err(StoreError::NotAnInteger { .. })
        ));
    }

    #[test]
    fn scan_single_batch() {
        let store = InMemoryStore::new();
        store.set("user:1:1_a", "1").unwrap();
        store.set("user:2:2_b", "2").unwrap();
        store.set("account:1:1_c", "1").unwrap();

        let page = store.scan(0, "user:*", 100).unwrap();
        assert_eq!(page.cursor, 0);
        assert_eq!(page.keys.len(), 2);
    }

    #[test]
    fn scan_batched_visits_all_keys() {
        let store = InMemoryStore::new();
        for i in 0..25 {
            store.set(&format!("user:{i:02}"), "x").unwrap();
        }
        store.set("zother", "x").unwrap();

        let mut found = Vec::new();
        let mut cursor = 0;
        let mut steps = 0;
        loop {
            let page = store.scan(cursor, "user:*", 4).unwrap();
            found.extend(page.keys);
            steps += 1;
            if page.cursor == 0 {
                break;
            }
            cursor = page.cursor;
        }

        assert_eq!(found.len(), 25);
        assert!(steps > 1, "expected multiple cursor steps");
    }

    #[test]
    fn scan_empty_store_terminates() {
        let store = InMemoryStore::new();
        let page = store.scan(0, "*", 10).unwrap();
        assert_eq!(page.cursor, 0);
        assert!(page.keys.is_empty());
    }

    #[test]
    fn keys_and_clear() {
        let store = InMemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(store.len(), 2);
        store.clear();
        assert!(store.is_empty());
    }
}
