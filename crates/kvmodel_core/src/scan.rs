//! Cursor-driven key scanning.

use crate::error::CoreResult;
use kvmodel_store::StoreClient;
use std::collections::BTreeSet;
use tracing::debug;

/// Default number of keys a single cursor step examines.
///
/// A performance hint only; correctness does not depend on it.
pub const DEFAULT_SCAN_BATCH: usize = 500;

/// Scans the keyspace for keys matching `pattern`, aggregating all
/// cursor batches.
///
/// Starts at cursor 0 and repeats with each returned cursor until the
/// store reports 0 again. Under a static keyspace every matching key is
/// returned exactly once; keys inserted or removed mid-scan may be
/// missed, and cursor reuse can return a key twice - duplicates are
/// collapsed by the returned set.
///
/// # Errors
///
/// Store failures propagate unchanged.
pub fn scan_keys<C: StoreClient + ?Sized>(
    client: &C,
    pattern: &str,
    batch: usize,
) -> CoreResult<BTreeSet<String>> {
    let mut found = BTreeSet::new();
    let mut cursor = 0;
    loop {
        let page = client.scan(cursor, pattern, batch)?;
        debug!(pattern, cursor, matched = page.keys.len(), "scan step");
        found.extend(page.keys);
        if page.cursor == 0 {
            break;
        }
        cursor = page.cursor;
    }
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kvmodel_store::InMemoryStore;

    #[test]
    fn aggregates_across_batches() {
        let store = InMemoryStore::new();
        for i in 0..12 {
            store.set(&format!("user:{i}:{i}_x"), &i.to_string()).unwrap();
        }
        store.set("account:1:1_y", "1").unwrap();

        let keys = scan_keys(&store, "user:*", 3).unwrap();
        assert_eq!(keys.len(), 12);
        assert!(keys.iter().all(|k| k.starts_with("user:")));
    }

    #[test]
    fn empty_keyspace_returns_empty_set() {
        let store = InMemoryStore::new();
        let keys = scan_keys(&store, "user:*", DEFAULT_SCAN_BATCH).unwrap();
        assert!(keys.is_empty());
    }

    #[test]
    fn no_matches_returns_empty_set() {
        let store = InMemoryStore::new();
        store.set("account:1:1_y", "1").unwrap();
        let keys = scan_keys(&store, "user:*", DEFAULT_SCAN_BATCH).unwrap();
        assert!(keys.is_empty());
    }
}
