//! Test fixtures and store helpers.

use kvmodel_core::{EntityStore, Schema};
use kvmodel_store::InMemoryStore;
use std::collections::BTreeMap;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Initializes tracing output for tests, honoring `RUST_LOG`.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Builds the canonical `user` test schema.
///
/// Indexed: `id`, `email`, `name`, `password` (in index order);
/// plain: `phone_number`, `address`; hidden: `password`. The
/// `phone_number` field carries a read mutator that formats ten digits
/// as `123-123-1234`.
#[must_use]
pub fn user_schema() -> Schema {
    Schema::builder("user")
        .indexed(["id", "email", "name", "password"])
        .plain(["phone_number", "address"])
        .hidden(["password"])
        .mutator("phone_number", |v| {
            if v.len() == 10 && v.bytes().all(|b| b.is_ascii_digit()) {
                format!("{}-{}-{}", &v[..3], &v[3..6], &v[6..])
            } else {
                v.to_string()
            }
        })
        .build()
        .expect("user schema is valid")
}

/// Creates an entity store for the `user` schema over a fresh
/// in-memory store.
#[must_use]
pub fn user_store() -> EntityStore<InMemoryStore> {
    init_tracing();
    EntityStore::new(InMemoryStore::new(), user_schema())
}

/// Builds a field map for creating a user with the given name and
/// email; the other fields get fixed sample values.
#[must_use]
pub fn sample_user(name: &str, email: &str) -> BTreeMap<String, String> {
    [
        ("name".to_string(), name.to_string()),
        ("email".to_string(), email.to_string()),
        ("password".to_string(), "hunter2".to_string()),
        ("phone_number".to_string(), "1231231234".to_string()),
        ("address".to_string(), "1 Main St".to_string()),
    ]
    .into()
}
